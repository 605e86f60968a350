use std::collections::HashMap;

use anyhow::{Context, Result};
use zbus::blocking::{fdo::DBusProxy, Connection, Proxy};
use zvariant::OwnedValue;

use crate::types::PlayerSignal;

const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";
const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";
const PLAYER_IFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Samples the player once per tick.
pub trait PlaybackObserver {
    fn sample(&self) -> PlayerSignal;
}

/// Fallback observer used when the session bus is unavailable; the
/// synchronizer stays in the "waiting for player" state.
pub struct NoPlayer;

impl PlaybackObserver for NoPlayer {
    fn sample(&self) -> PlayerSignal {
        PlayerSignal::Absent
    }
}

/// Watches the player over MPRIS on the D-Bus session bus.
///
/// Bus names are matched case-insensitively against a configured fragment
/// (e.g. "tidal" matches `org.mpris.MediaPlayer2.tidal-hifi`).
pub struct MprisObserver {
    connection: Connection,
    name_fragment: String,
}

impl MprisObserver {
    pub fn connect(name_fragment: &str) -> Result<Self> {
        let connection =
            Connection::session().context("failed to connect to the D-Bus session bus")?;
        Ok(Self {
            connection,
            name_fragment: name_fragment.to_ascii_lowercase(),
        })
    }

    fn find_player(&self) -> zbus::Result<Option<String>> {
        let dbus = DBusProxy::new(&self.connection)?;
        for name in dbus.list_names()? {
            let name = name.to_string();
            if name.starts_with(MPRIS_PREFIX)
                && name.to_ascii_lowercase().contains(&self.name_fragment)
            {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    fn sample_player(&self, bus_name: &str) -> zbus::Result<PlayerSignal> {
        let proxy = Proxy::new(&self.connection, bus_name, MPRIS_PATH, PLAYER_IFACE)?;

        let status: String = proxy.get_property("PlaybackStatus")?;
        if status != "Playing" {
            return Ok(PlayerSignal::Foreground);
        }

        let metadata: HashMap<String, OwnedValue> = proxy.get_property("Metadata")?;
        let title = string_field(&metadata, "xesam:title");
        if title.is_empty() {
            // Playing but no track text yet; treat like a foreground player.
            return Ok(PlayerSignal::Foreground);
        }

        Ok(PlayerSignal::Playing {
            title,
            artist: artist_field(&metadata),
        })
    }
}

impl PlaybackObserver for MprisObserver {
    fn sample(&self) -> PlayerSignal {
        match self.find_player() {
            Ok(Some(bus_name)) => match self.sample_player(&bus_name) {
                Ok(signal) => signal,
                Err(e) => {
                    log::debug!("MPRIS query failed for {}: {}", bus_name, e);
                    PlayerSignal::Absent
                }
            },
            Ok(None) => PlayerSignal::Absent,
            Err(e) => {
                log::debug!("D-Bus name listing failed: {}", e);
                PlayerSignal::Absent
            }
        }
    }
}

fn string_field(metadata: &HashMap<String, OwnedValue>, key: &str) -> String {
    metadata
        .get(key)
        .and_then(|value| String::try_from(value.clone()).ok())
        .unwrap_or_default()
}

fn artist_field(metadata: &HashMap<String, OwnedValue>) -> String {
    let Some(value) = metadata.get("xesam:artist") else {
        return String::new();
    };

    // MPRIS reports artists as a string list; some players send a plain string.
    if let Ok(artists) = <Vec<String>>::try_from(value.clone()) {
        return artists.join(", ");
    }
    String::try_from(value.clone()).unwrap_or_default()
}
