//! Terrain overlay: mesh generation, shader programs and GPU rendering.
//!
//! The pipeline runs in three stages:
//! 1. [`OverlayMeshBuilder`] samples the DEM on a grid over the overlay's
//!    bounding box and produces vertex streams.
//! 2. [`OverlayRenderable`] uploads those streams and draws them with the
//!    program [`ShaderProgramCache`] compiled for the overlay kind.
//! 3. [`OverlayLayer`] ties both to the host map's lifecycle.

mod gl;
mod kind;
mod layer;
mod mesh;
mod renderable;
mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub use gl::{GlBackend, SHADER_VERSION};
pub use kind::{LegendEntry, OverlayKind};
pub use layer::{BuildJob, BuiltMesh, OverlayLayer};
pub use mesh::{
    ElevationGrid, GridMetrics, OverlayMesh, OverlayMeshBuilder, MAX_VERTICES, VERTICES_PER_CELL,
};
pub use renderable::{OverlayRenderable, RenderableStatus};
pub use shader::{AttributeLocations, ShaderProgram, ShaderProgramCache, UniformLocations};
