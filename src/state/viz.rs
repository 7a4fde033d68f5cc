//! Map view state (zoom/pan).

use eframe::egui::Vec2;

/// View controls for the map canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Web Mercator zoom level
    pub zoom: f64,

    /// Current pan offset from center, in screen pixels
    pub pan_offset: Vec2,

    /// Initial center longitude
    pub center_lon: f64,

    /// Initial center latitude
    pub center_lat: f64,

    /// Zoom restored by a double-click
    pub home_zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(-121.53, 40.46, 12.0)
    }
}

impl ViewState {
    pub const MIN_ZOOM: f64 = 3.0;
    pub const MAX_ZOOM: f64 = 18.0;

    pub fn new(center_lon: f64, center_lat: f64, zoom: f64) -> Self {
        let zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        Self {
            zoom,
            pan_offset: Vec2::ZERO,
            center_lon,
            center_lat,
            home_zoom: zoom,
        }
    }

    /// Zooms by `delta` levels keeping the point `cursor` (relative to the
    /// canvas center, in pixels) fixed on screen.
    pub fn zoom_about(&mut self, delta: f64, cursor: Vec2) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom + delta).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        let factor = 2f64.powf(self.zoom - old_zoom) as f32;
        self.pan_offset = cursor - (cursor - self.pan_offset) * factor;
    }

    pub fn reset(&mut self) {
        self.zoom = self.home_zoom;
        self.pan_offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ViewState::default();
        view.zoom_about(100.0, Vec2::ZERO);
        assert_eq!(view.zoom, ViewState::MAX_ZOOM);
        view.zoom_about(-100.0, Vec2::ZERO);
        assert_eq!(view.zoom, ViewState::MIN_ZOOM);
    }

    #[test]
    fn test_zoom_about_center_keeps_pan() {
        let mut view = ViewState::default();
        view.pan_offset = Vec2::new(10.0, -4.0);
        view.zoom_about(1.0, Vec2::new(10.0, -4.0));
        assert!((view.pan_offset - Vec2::new(10.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_zoom_in_doubles_distance_from_cursor() {
        let mut view = ViewState::default();
        view.zoom_about(1.0, Vec2::new(100.0, 0.0));
        // the map center was 100 px left of the cursor, now 200 px
        assert!((view.pan_offset - Vec2::new(-100.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_reset_restores_home() {
        let mut view = ViewState::new(-121.53, 40.46, 13.0);
        view.zoom_about(2.0, Vec2::new(5.0, 5.0));
        view.reset();
        assert_eq!(view.zoom, 13.0);
        assert_eq!(view.pan_offset, Vec2::ZERO);
    }
}
