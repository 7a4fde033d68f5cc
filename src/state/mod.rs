//! Application state management.
//!
//! The UI only writes these structures; terrain work happens in the app
//! based on what changed.

mod overlay;
mod viz;

pub use overlay::OverlayState;
pub use viz::ViewState;

use crate::config::OverlayConfig;

/// Progress of the DEM fetch and decode, shown in the top bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DemStatus {
    #[default]
    NotLoaded,
    Loading,
    Ready { width: usize, height: usize },
    Failed(String),
}

impl DemStatus {
    pub fn label(&self) -> String {
        match self {
            DemStatus::NotLoaded => "DEM not loaded".to_string(),
            DemStatus::Loading => "Loading DEM...".to_string(),
            DemStatus::Ready { width, height } => format!("DEM {}x{}", width, height),
            DemStatus::Failed(e) => format!("DEM error: {}", e),
        }
    }
}

/// Root application state containing all sub-states.
#[derive(Debug, Default)]
pub struct AppState {
    /// Overlay kind and opacity
    pub overlay_state: OverlayState,

    /// Map zoom/pan
    pub view_state: ViewState,

    /// DEM loading progress
    pub dem_status: DemStatus,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl AppState {
    pub fn new(config: &OverlayConfig) -> Self {
        let [lng, lat] = config.map_center;
        Self {
            overlay_state: OverlayState::new(config.initial_kind, config.initial_opacity),
            view_state: ViewState::new(lng, lat, config.map_zoom),
            status_message: "Ready".to_string(),
            ..Default::default()
        }
    }
}
