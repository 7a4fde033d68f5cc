//! Geographic extent and sampling step of an overlay build.

use crate::error::TerrainError;
use geo_types::Coord;

/// Geographic region sampled by an overlay, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Coord<f64>,
    max: Coord<f64>,
}

impl BoundingBox {
    /// Creates a bounding box from its south-west and north-east corners.
    pub fn new(min: Coord<f64>, max: Coord<f64>) -> Result<Self, TerrainError> {
        let finite = [min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite());
        if !finite {
            return Err(TerrainError::InvalidBounds(format!(
                "corners must be finite, got ({}, {})-({}, {})",
                min.x, min.y, max.x, max.y
            )));
        }
        if min.x > max.x || min.y > max.y {
            return Err(TerrainError::InvalidBounds(format!(
                "minimum corner ({}, {}) exceeds maximum corner ({}, {})",
                min.x, min.y, max.x, max.y
            )));
        }
        Ok(Self { min, max })
    }

    /// Convenience constructor from (min_lng, min_lat, max_lng, max_lat).
    pub fn from_extent(
        min_lng: f64,
        min_lat: f64,
        max_lng: f64,
        max_lat: f64,
    ) -> Result<Self, TerrainError> {
        Self::new(
            Coord {
                x: min_lng,
                y: min_lat,
            },
            Coord {
                x: max_lng,
                y: max_lat,
            },
        )
    }

    pub fn min(&self) -> Coord<f64> {
        self.min
    }

    pub fn max(&self) -> Coord<f64> {
        self.max
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }
}

/// Step between grid nodes in degrees, shared by both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing(f64);

impl GridSpacing {
    pub fn new(degrees: f64) -> Result<Self, TerrainError> {
        if degrees.is_finite() && degrees > 0.0 {
            Ok(Self(degrees))
        } else {
            Err(TerrainError::InvalidGridSpacing(degrees))
        }
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Number of grid nodes needed to cover `span` degrees, both ends included.
    ///
    /// `None` when the count does not fit in a `u32`.
    pub fn node_count(&self, span: f64) -> Option<usize> {
        let steps = (span / self.0).ceil();
        if steps.is_finite() && steps >= 0.0 && steps < u32::MAX as f64 {
            usize::try_from(steps as u64 + 1).ok()
        } else {
            None
        }
    }
}
