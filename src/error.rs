//! Error types for terrain sampling and overlay rendering.
//!
//! Only [`TerrainError`] ever reaches a caller as a hard failure. Sampling
//! and GPU errors are recovered at the sampler and shader-cache boundaries
//! and never propagate into the per-frame render path.

use std::fmt;

/// Failures while decoding a DEM or validating overlay geometry.
#[derive(thiserror::Error, Debug)]
pub enum TerrainError {
    #[error("failed to decode raster: {0}")]
    Decode(String),

    #[error("invalid raster georeferencing: {0}")]
    InvalidMetadata(String),

    #[error("invalid bounding box: {0}")]
    InvalidBounds(String),

    #[error("grid spacing must be a positive number of degrees, got {0}")]
    InvalidGridSpacing(f64),

    #[error("overlay grid too large: {0}")]
    GridTooLarge(String),
}

impl From<tiff::TiffError> for TerrainError {
    fn from(err: tiff::TiffError) -> Self {
        TerrainError::Decode(err.to_string())
    }
}

/// A single elevation query that could not be answered.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    #[error("elevation data not ready yet")]
    NotReady,

    #[error("pixel coordinates ({x}, {y}) for ({lng}, {lat}) out of bounds for elevation data")]
    OutOfBounds { lng: f64, lat: f64, x: f64, y: f64 },
}

/// Shader stage, used to label compile diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// GPU object creation failures reported by the backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GlError {
    #[error("{stage} shader compilation error: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program linking error: {0}")]
    ShaderLink(String),

    #[error("failed to allocate GPU object: {0}")]
    Allocation(String),
}
