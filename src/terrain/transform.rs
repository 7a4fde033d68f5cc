//! Affine mapping between geographic coordinates and raster pixels.

use crate::error::TerrainError;

/// Pixel coordinates within this distance of an integer are taken as that
/// integer, absorbing the round-off of non-representable pixel scales.
const PIXEL_SNAP_EPSILON: f64 = 1e-6;

/// Snaps `v` onto the nearest integer when it is within round-off of it.
pub(crate) fn snap_to_pixel(v: f64) -> f64 {
    let nearest = v.round();
    if (v - nearest).abs() < PIXEL_SNAP_EPSILON {
        nearest
    } else {
        v
    }
}

/// Geographic -> pixel affine transform derived from GeoTIFF georeferencing.
///
/// `x = m0 + m1 * lng + m2 * lat`, `y = m3 + m4 * lng + m5 * lat`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    m: [f64; 6],
}

impl CoordinateTransform {
    /// Builds the transform from `ModelPixelScale` `[sx, sy, sz]` and
    /// `ModelTiepoint` `[px, py, k, gx, gy, gz]`.
    ///
    /// Raster rows run south while latitude runs north, so the vertical
    /// scale is negated before inverting.
    pub fn from_raster_metadata(
        pixel_scale: [f64; 3],
        tie_point: [f64; 6],
    ) -> Result<Self, TerrainError> {
        let [sx, sy, _sz] = pixel_scale;
        let [_px, _py, _k, gx, gy, _gz] = tie_point;

        if sx == 0.0 || !sx.is_finite() {
            return Err(TerrainError::InvalidMetadata(format!(
                "horizontal pixel scale must be non-zero, got {}",
                sx
            )));
        }
        if sy == 0.0 || !sy.is_finite() {
            return Err(TerrainError::InvalidMetadata(format!(
                "vertical pixel scale must be non-zero, got {}",
                sy
            )));
        }

        let sy = -sy;
        Ok(Self {
            m: [-gx / sx, 1.0 / sx, 0.0, -gy / sy, 0.0, 1.0 / sy],
        })
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.m
    }

    /// Floating-point pixel coordinates for a geographic point. Not rounded.
    pub fn to_pixel(&self, lng: f64, lat: f64) -> (f64, f64) {
        let m = &self.m;
        (
            m[0] + m[1] * lng + m[2] * lat,
            m[3] + m[4] * lng + m[5] * lat,
        )
    }

    /// Integer pixel coordinates, truncated toward zero.
    ///
    /// This is the nearest-sample fast path; it deliberately does not round
    /// to the nearest pixel, so points just left of or above the raster
    /// origin truncate onto row/column 0. Coordinates within round-off of a
    /// whole pixel are snapped onto it first.
    pub fn to_pixel_int(&self, lng: f64, lat: f64) -> (i64, i64) {
        let (x, y) = self.to_pixel(lng, lat);
        (snap_to_pixel(x).trunc() as i64, snap_to_pixel(y).trunc() as i64)
    }

    /// Inverse map from pixel coordinates back to (lng, lat).
    pub fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let det = m[1] * m[5] - m[2] * m[4];
        let dx = x - m[0];
        let dy = y - m[3];
        ((m[5] * dx - m[2] * dy) / det, (m[1] * dy - m[4] * dx) / det)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lassen_transform() -> CoordinateTransform {
        // 1/3 arc-second DEM tile anchored at its north-west corner
        let scale = 1.0 / 10800.0;
        CoordinateTransform::from_raster_metadata(
            [scale, scale, 0.0],
            [0.0, 0.0, 0.0, -121.7, 40.6, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_coefficients_flip_vertical_scale() {
        let t = CoordinateTransform::from_raster_metadata(
            [2.0, 4.0, 0.0],
            [0.0, 0.0, 0.0, 10.0, 20.0, 0.0],
        )
        .unwrap();
        assert_eq!(t.coefficients(), [-5.0, 0.5, 0.0, 5.0, 0.0, -0.25]);
    }

    #[test]
    fn test_zero_scale_is_invalid_metadata() {
        let err = CoordinateTransform::from_raster_metadata([0.0, 1.0, 0.0], [0.0; 6]);
        assert!(matches!(err, Err(TerrainError::InvalidMetadata(_))));

        let err = CoordinateTransform::from_raster_metadata([1.0, 0.0, 0.0], [0.0; 6]);
        assert!(matches!(err, Err(TerrainError::InvalidMetadata(_))));
    }

    #[test]
    fn test_unit_raster_pixel_mapping() {
        let t = CoordinateTransform::from_raster_metadata([1.0, 1.0, 0.0], [0.0; 6]).unwrap();
        let (x, y) = t.to_pixel(1.5, -1.5);
        assert!((x - 1.5).abs() < 1e-12);
        assert!((y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_to_pixel_int_truncates_toward_zero() {
        let t = CoordinateTransform::from_raster_metadata([1.0, 1.0, 0.0], [0.0; 6]).unwrap();
        assert_eq!(t.to_pixel_int(2.9, -1.99), (2, 1));
        // -0.5 truncates to 0 rather than flooring to -1
        assert_eq!(t.to_pixel_int(-0.5, 0.5), (0, 0));
    }

    #[test]
    fn test_to_pixel_int_at_fractional_scale_pixel_origins() {
        let t = lassen_transform();
        for (px, py) in [(0, 0), (1, 3), (17, 29), (63, 47), (3239, 2159)] {
            let (lng, lat) = t.to_geographic(px as f64, py as f64);
            assert_eq!(t.to_pixel_int(lng, lat), (px, py));
        }
    }

    #[test]
    fn test_snap_only_within_round_off() {
        assert_eq!(snap_to_pixel(3.0 - 1e-12), 3.0);
        assert_eq!(snap_to_pixel(3.0 + 1e-9), 3.0);
        assert_eq!(snap_to_pixel(2.999), 2.999);
        assert_eq!(snap_to_pixel(-0.5), -0.5);
    }

    #[test]
    fn test_round_trip_inside_extent() {
        let t = lassen_transform();
        let width = 3240;
        let height = 2160;
        for (px, py) in [(0.5, 0.5), (100.25, 2000.75), (3239.5, 1.0), (1620.0, 1080.0)] {
            assert!(px < width as f64 && py < height as f64);
            let (lng, lat) = t.to_geographic(px, py);
            let (x, y) = t.to_pixel(lng, lat);
            assert!((x - px).abs() < 1e-6, "x {} != {}", x, px);
            assert!((y - py).abs() < 1e-6, "y {} != {}", y, py);
        }
    }

    #[test]
    fn test_latitude_increases_toward_row_zero() {
        let t = lassen_transform();
        let (_, north_row) = t.to_pixel(-121.5, 40.55);
        let (_, south_row) = t.to_pixel(-121.5, 40.45);
        assert!(north_row < south_row);
    }
}
