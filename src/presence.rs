use anyhow::Result;

use crate::types::RenderedPresence;

/// Push side of the presence channel. A real SDK binding plugs in here; the
/// core only ever publishes one payload or clears per tick.
pub trait PresencePublisher {
    fn publish(&self, presence: &RenderedPresence) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Publisher that emits each payload through the logger as JSON.
///
/// Stands in for the wire SDK, which is out of scope; useful on its own for
/// piping the widget into status bars or debugging the tick loop.
pub struct LogPublisher;

impl LogPublisher {
    /// Startup must abort if the presence channel cannot be initialized,
    /// hence the fallible constructor even though logging cannot fail here.
    pub fn connect() -> Result<Self> {
        log::info!("Presence channel ready");
        Ok(Self)
    }
}

impl PresencePublisher for LogPublisher {
    fn publish(&self, presence: &RenderedPresence) -> Result<()> {
        let payload = serde_json::to_string(presence)?;
        log::info!("presence update: {}", payload);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        log::info!("presence cleared");
        Ok(())
    }
}
