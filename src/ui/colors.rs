//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// In-progress indicator.
    pub const PENDING: Color32 = Color32::from_rgb(255, 180, 50);
    /// Failure indicator.
    pub const ERROR: Color32 = Color32::from_rgb(255, 80, 80);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background color.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
    /// Overlay bounding box outline.
    pub const BOUNDS: Color32 = Color32::from_rgb(180, 180, 200);
    /// Coordinate readout text.
    pub const READOUT: Color32 = Color32::from_rgb(200, 200, 220);

    /// Graticule line color - requires alpha, use function.
    pub fn graticule() -> Color32 {
        Color32::from_rgba_unmultiplied(60, 80, 60, 120)
    }
}

/// Swatch color for a legend entry.
pub fn legend_swatch(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}
