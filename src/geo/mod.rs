//! Geographic primitives shared by the terrain sampler, the overlay mesh
//! and the host map canvas.
//!
//! This module provides the overlay's bounding box and grid spacing, the
//! Web Mercator plane projection and the map camera.

mod bounds;
mod projection;

pub use bounds::{BoundingBox, GridSpacing};
pub use projection::{MapCamera, PlaneProjection, WebMercator};
