//! DEM decoding and elevation sampling.

mod loader;
mod raster;
mod sampler;
mod transform;

pub use loader::{DemLoadChannel, DemLoadResult};
pub use raster::Raster;
pub use sampler::{ElevationSampler, ElevationSource};
pub use transform::CoordinateTransform;
