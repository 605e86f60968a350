use serde::Serialize;

/// Coarse audio-quality tier reported by the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QualityTier {
    HiRes,
    Lossless,
    #[default]
    Standard,
}

impl QualityTier {
    /// Map the catalog's `audioQuality` field onto a tier.
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "HI_RES" => Self::HiRes,
            "LOSSLESS" => Self::Lossless,
            _ => Self::Standard,
        }
    }

    pub fn is_high_res(self) -> bool {
        matches!(self, Self::HiRes)
    }

    /// Hi-quality tiers win the resolver tie-break.
    pub fn is_high_quality(self) -> bool {
        matches!(self, Self::HiRes | Self::Lossless)
    }
}

/// Coarse per-tick signal from the playback observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSignal {
    /// Player is not running.
    Absent,
    /// Player is running but not actively playing.
    Foreground,
    /// Player is playing the given track.
    Playing { title: String, artist: String },
}

/// The track currently mirrored to the presence channel.
///
/// Owned exclusively by the synchronizer. The (title, artist) pair is
/// immutable for the track's lifetime; any change replaces the whole value,
/// resetting runtime, counters, id and quality to defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Catalog id, empty until resolved.
    pub remote_id: String,
    /// Unix seconds when the track was (re)confirmed playing.
    pub start_epoch: i64,
    /// Authoritative duration in seconds, 0 until resolved.
    pub runtime_seconds: u64,
    /// Number of ticks spent paused.
    pub paused_accum_seconds: u64,
    pub track_number: u32,
    pub volume_number: u32,
    pub quality: QualityTier,
    pub is_paused: bool,
    /// True once a metadata lookup has completed (successfully or not)
    /// for this (title, artist) pair.
    pub is_resolved: bool,
}

impl Track {
    /// Fresh, unresolved track for a newly observed (title, artist) pair.
    pub fn start(title: String, artist: String) -> Self {
        Self {
            title,
            artist,
            ..Self::default()
        }
    }

    pub fn matches(&self, title: &str, artist: &str) -> bool {
        self.title == title && self.artist == artist
    }

    /// An idle track carries no text and maps to a presence clear.
    pub fn is_idle(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty()
    }

    /// The full marquee source string.
    pub fn full_text(&self) -> String {
        format!("{} - {} - {}", self.title, self.artist, self.album)
    }

    pub fn is_high_res(&self) -> bool {
        self.quality.is_high_res()
    }
}

/// Payload pushed to the presence channel on every publish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPresence {
    /// Scrolling marquee line.
    pub details: String,
    /// Fixed-layout progress bar and clock.
    pub state_line: String,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    pub large_image: String,
    pub large_text: String,
}
