use std::sync::Arc;

use parking_lot::RwLock;

/// State shared between the sync loop and the control surface.
///
/// The sync loop writes the status line once per tick; the control surface
/// reads it on demand and flips the active flag.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Whether presence publishing is enabled (the tray toggle of the
    /// original app).
    pub presence_active: bool,
    /// Human-readable status line ("Playing ...", "Paused ...", ...).
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            presence_active: true,
            status: "Waiting for TIDAL".to_string(),
        }
    }
}

pub type SharedState = Arc<RwLock<AppState>>;

pub fn create_state() -> SharedState {
    Arc::new(RwLock::new(AppState::default()))
}
