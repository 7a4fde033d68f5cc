//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon), the
//! Web Mercator plane the overlay mesh lives in, and screen coordinates
//! for the map canvas.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use glam::{DMat4, DVec2, DVec3, Mat4};
use std::f64::consts::PI;

/// Pixel size of the whole Mercator world at zoom level 0.
const TILE_SIZE: f64 = 512.0;

/// Converts geographic coordinates into the host map's projected plane.
pub trait PlaneProjection {
    fn project(&self, coord: Coord<f64>) -> DVec2;
}

/// Web Mercator normalized to the unit square: (0, 0) is the north-west
/// corner of the world, (1, 1) the south-east corner.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebMercator;

impl WebMercator {
    pub fn from_lng_lat(coord: Coord<f64>) -> DVec2 {
        let x = (180.0 + coord.x) / 360.0;
        let y = (180.0 - (180.0 / PI) * (PI / 4.0 + coord.y * PI / 360.0).tan().ln()) / 360.0;
        DVec2::new(x, y)
    }

    pub fn to_lng_lat(point: DVec2) -> Coord<f64> {
        let lng = point.x * 360.0 - 180.0;
        let y2 = 180.0 - point.y * 360.0;
        let lat = 360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0;
        Coord { x: lng, y: lat }
    }
}

impl PlaneProjection for WebMercator {
    fn project(&self, coord: Coord<f64>) -> DVec2 {
        Self::from_lng_lat(coord)
    }
}

/// Map camera for converting geographic coordinates to the screen and to
/// clip space.
#[derive(Debug, Clone)]
pub struct MapCamera {
    /// Center latitude of the view
    pub center_lat: f64,
    /// Center longitude of the view
    pub center_lon: f64,
    /// Zoom level (the world is `512 * 2^zoom` pixels wide)
    pub zoom: f64,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapCamera {
    fn default() -> Self {
        Self {
            // Lassen Volcanic National Park
            center_lat: 40.46,
            center_lon: -121.53,
            zoom: 12.0,
            pan_offset: Vec2::ZERO,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapCamera {
    pub fn new(center_lat: f64, center_lon: f64, zoom: f64) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom,
            ..Default::default()
        }
    }

    /// Updates the camera with current view state.
    pub fn update(&mut self, zoom: f64, pan_offset: Vec2, screen_rect: Rect) {
        self.zoom = zoom;
        self.pan_offset = pan_offset;
        self.screen_rect = screen_rect;
    }

    /// Width of the whole Mercator world in screen pixels.
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Mercator point under the center of the canvas, pan included.
    pub fn center_mercator(&self) -> DVec2 {
        let base = WebMercator::from_lng_lat(Coord {
            x: self.center_lon,
            y: self.center_lat,
        });
        let pan = DVec2::new(self.pan_offset.x as f64, self.pan_offset.y as f64);
        base - pan / self.world_size()
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let rel = (WebMercator::from_lng_lat(coord) - self.center_mercator()) * self.world_size();
        let center = self.screen_rect.center();
        Pos2::new(center.x + rel.x as f32, center.y + rel.y as f32)
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let center = self.screen_rect.center();
        let rel = DVec2::new((pos.x - center.x) as f64, (pos.y - center.y) as f64);
        WebMercator::to_lng_lat(self.center_mercator() + rel / self.world_size())
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }

    /// View-projection matrix taking Mercator plane coordinates to clip space
    /// for a viewport covering `screen_rect`.
    ///
    /// Built in double precision and narrowed at the end; Mercator units at
    /// high zoom are too small to translate accurately in `f32`.
    pub fn view_projection(&self) -> Mat4 {
        let world = self.world_size();
        let width = self.screen_rect.width().max(1.0) as f64;
        let height = self.screen_rect.height().max(1.0) as f64;
        let center = self.center_mercator();

        let scale = DMat4::from_scale(DVec3::new(
            2.0 * world / width,
            -2.0 * world / height,
            1.0,
        ));
        let translate = DMat4::from_translation(DVec3::new(-center.x, -center.y, 0.0));
        (scale * translate).as_mat4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_origin_and_corners() {
        let origin = WebMercator::from_lng_lat(Coord { x: 0.0, y: 0.0 });
        assert!((origin.x - 0.5).abs() < 1e-12);
        assert!((origin.y - 0.5).abs() < 1e-12);

        let west = WebMercator::from_lng_lat(Coord { x: -180.0, y: 0.0 });
        assert!(west.x.abs() < 1e-12);
    }

    #[test]
    fn test_mercator_round_trip() {
        let coord = Coord {
            x: -121.53,
            y: 40.46,
        };
        let back = WebMercator::to_lng_lat(WebMercator::from_lng_lat(coord));
        assert!((back.x - coord.x).abs() < 1e-9);
        assert!((back.y - coord.y).abs() < 1e-9);
    }

    #[test]
    fn test_view_center_maps_to_clip_origin() {
        let camera = MapCamera::new(40.46, -121.53, 12.0);
        let center = camera.center_mercator();
        let clip = camera
            .view_projection()
            .project_point3(glam::Vec3::new(center.x as f32, center.y as f32, 0.0));
        assert!(clip.x.abs() < 1e-2);
        assert!(clip.y.abs() < 1e-2);
    }

    #[test]
    fn test_north_is_up_on_screen() {
        let camera = MapCamera::new(40.46, -121.53, 12.0);
        let south = camera.geo_to_screen(Coord {
            x: -121.53,
            y: 40.45,
        });
        let north = camera.geo_to_screen(Coord {
            x: -121.53,
            y: 40.47,
        });
        assert!(north.y < south.y);
    }

    #[test]
    fn test_screen_geo_round_trip() {
        let mut camera = MapCamera::new(40.46, -121.53, 12.0);
        camera.update(12.5, Vec2::new(30.0, -12.0), camera.screen_rect);
        let coord = Coord {
            x: -121.5,
            y: 40.48,
        };
        let back = camera.screen_to_geo(camera.geo_to_screen(coord));
        assert!((back.x - coord.x).abs() < 1e-4);
        assert!((back.y - coord.y).abs() < 1e-4);
    }
}
