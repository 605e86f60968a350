use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::observer::PlaybackObserver;
use crate::presence::PresencePublisher;
use crate::render::{self, AUTOSCROLL_CAP};
use crate::resolver::TrackResolver;
use crate::state::SharedState;
use crate::types::{PlayerSignal, RenderedPresence, Track};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Added to the start epoch to compensate for resolver latency.
const START_EPOCH_SKEW_SECONDS: i64 = 2;

const PAUSE_ASSET: &str = "pause";
const HIFI_ASSET: &str = "hifi";
const MASTER_ASSET: &str = "master";

/// The polling state machine. Owns the current track, drives the resolver on
/// track changes, renders the widget every tick and hands it to the
/// publisher.
pub struct PresenceSynchronizer {
    observer: Box<dyn PlaybackObserver>,
    resolver: Box<dyn TrackResolver>,
    publisher: Box<dyn PresencePublisher>,
    state: SharedState,
    track: Track,
    /// Tick counter, not wall clock: pausing the player freezes the
    /// displayed time exactly at the pause instant.
    elapsed_seconds: u64,
    marquee_window: String,
}

impl PresenceSynchronizer {
    pub fn new(
        observer: Box<dyn PlaybackObserver>,
        resolver: Box<dyn TrackResolver>,
        publisher: Box<dyn PresencePublisher>,
        state: SharedState,
    ) -> Self {
        Self {
            observer,
            resolver,
            publisher,
            state,
            track: Track::default(),
            elapsed_seconds: 0,
            marquee_window: String::new(),
        }
    }

    /// One polling cycle: sample the player, apply the state transition,
    /// then issue exactly one publish or clear call.
    pub fn tick(&mut self) {
        if !self.state.read().presence_active {
            self.reset_idle("Disabled");
            return;
        }

        match self.observer.sample() {
            PlayerSignal::Absent => self.reset_idle("Waiting for TIDAL"),
            PlayerSignal::Foreground => self.on_paused_tick(),
            PlayerSignal::Playing { title, artist } => self.on_playing_tick(title, artist),
        }
    }

    /// Polling loop at the fixed cadence. Runs until `shutdown` flips, then
    /// issues a final clear so no stale presence outlives the process.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        log::info!("Presence sync loop started");

        while !shutdown.load(Ordering::SeqCst) {
            self.tick();
            std::thread::sleep(TICK_INTERVAL);
        }

        if let Err(e) = self.publisher.clear() {
            log::error!("Failed to clear presence on shutdown: {}", e);
        }
        log::info!("Presence sync loop stopped");
    }

    fn on_playing_tick(&mut self, title: String, artist: String) {
        if !self.track.matches(&title, &artist) {
            self.start_track(title, artist);
        } else if self.track.is_paused {
            self.track.is_paused = false;
            self.publish();
            // The original flow keeps the "Paused" label for one tick after
            // resuming; the next steady tick does not touch the status.
            self.set_status(&format!("Paused {}", self.track.title));
        } else {
            self.elapsed_seconds += 1;
            self.publish();
        }
    }

    /// Replace the current track wholesale and resolve it before the first
    /// publish. Resolution failure is logged and the track stays unresolved;
    /// no retry is scheduled for this (title, artist) pair.
    fn start_track(&mut self, title: String, artist: String) {
        self.set_status(&format!("Playing {}", title));

        let mut track = Track::start(title, artist);
        match self.resolver.resolve(&track.title, &track.artist) {
            Ok(meta) => {
                track.remote_id = meta.id;
                track.runtime_seconds = meta.duration_seconds;
                track.track_number = meta.track_number;
                track.volume_number = meta.volume_number;
                track.quality = meta.quality;
            }
            Err(e) => {
                log::warn!(
                    "Metadata lookup failed for {} - {}: {}",
                    track.title,
                    track.artist,
                    e
                );
            }
        }
        track.is_resolved = true;
        track.start_epoch = unix_now() + START_EPOCH_SKEW_SECONDS;

        self.track = track;
        self.elapsed_seconds = 0;
        // Empty window re-seeds on the first publish, so the fresh track
        // shows its full text.
        self.marquee_window.clear();
        self.publish();
    }

    fn on_paused_tick(&mut self) {
        self.track.is_paused = true;
        self.track.paused_accum_seconds += 1;
        self.set_status(&format!("Paused {}", self.track.title));
        self.publish();
    }

    fn reset_idle(&mut self, status: &str) {
        self.track = Track::default();
        self.elapsed_seconds = 0;
        self.marquee_window.clear();
        self.set_status(status);
        self.clear();
    }

    /// Recompute the rendered widget from the current track and counters,
    /// then hand it off. An idle track maps to a clear instead.
    fn publish(&mut self) {
        if self.track.is_idle() {
            self.clear();
            return;
        }

        self.marquee_window = render::render_marquee(
            &self.track.full_text(),
            &self.marquee_window,
            AUTOSCROLL_CAP,
        );

        let (small_image, small_text) = if self.track.is_paused {
            (Some(PAUSE_ASSET.to_string()), Some("Paused".to_string()))
        } else {
            (None, None)
        };
        let (large_image, large_text) = if self.track.is_high_res() {
            (MASTER_ASSET.to_string(), "Playing High-Res Audio".to_string())
        } else {
            (HIFI_ASSET.to_string(), String::new())
        };

        let presence = RenderedPresence {
            details: self.marquee_window.clone(),
            state_line: render::render_progress_bar(
                self.elapsed_seconds,
                self.track.runtime_seconds,
            ),
            small_image,
            small_text,
            large_image,
            large_text,
        };

        if let Err(e) = self.publisher.publish(&presence) {
            log::error!("Failed to publish presence: {}", e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.publisher.clear() {
            log::error!("Failed to clear presence: {}", e);
        }
    }

    fn set_status(&self, status: &str) {
        let mut state_guard = self.state.write();
        state_guard.status = status.to_string();
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
