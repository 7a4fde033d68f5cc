//! Procedural grid mesh annotated with elevation data.
//!
//! The bounding box is sampled on a regular grid; every node becomes a small
//! quad (two triangles) in the projected plane. Each vertex carries the
//! node's elevation and the elevations of its +i (east) and +j (north)
//! neighbors so the vertex stage can compute slope and aspect.

use crate::error::TerrainError;
use crate::geo::{BoundingBox, GridSpacing, PlaneProjection};
use crate::terrain::ElevationSource;
use geo_types::Coord;
use glam::DVec2;

/// Vertices per grid cell (two triangles).
pub const VERTICES_PER_CELL: usize = 6;

/// Largest mesh the builder accepts. Keeps every stream's byte length and
/// the draw count inside `i32`, on 32-bit targets too.
pub const MAX_VERTICES: usize = 1 << 26;

/// Node counts along longitude and latitude for `bounds` at `spacing`.
fn grid_dimensions(
    bounds: &BoundingBox,
    spacing: GridSpacing,
) -> Result<(usize, usize), TerrainError> {
    let too_large = || {
        TerrainError::GridTooLarge(format!(
            "{} degree spacing over {:.4} x {:.4} degrees",
            spacing.degrees(),
            bounds.width(),
            bounds.height()
        ))
    };

    let width = spacing.node_count(bounds.width()).ok_or_else(too_large)?;
    let height = spacing.node_count(bounds.height()).ok_or_else(too_large)?;
    let vertices = width
        .checked_mul(height)
        .and_then(|nodes| nodes.checked_mul(VERTICES_PER_CELL))
        .ok_or_else(too_large)?;

    if vertices > MAX_VERTICES {
        return Err(TerrainError::GridTooLarge(format!(
            "{}x{} nodes need {} vertices, the limit is {}",
            width, height, vertices, MAX_VERTICES
        )));
    }
    Ok((width, height))
}

/// Dense elevation samples, `i` along longitude and `j` along latitude.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl ElevationGrid {
    /// Samples `source` at `min + index * spacing` for every node; longitude
    /// outer, latitude inner.
    pub fn sample(
        bounds: &BoundingBox,
        spacing: GridSpacing,
        source: &dyn ElevationSource,
    ) -> Result<Self, TerrainError> {
        let (width, height) = grid_dimensions(bounds, spacing)?;
        Ok(Self::fill(bounds, spacing, width, height, source))
    }

    fn fill(
        bounds: &BoundingBox,
        spacing: GridSpacing,
        width: usize,
        height: usize,
        source: &dyn ElevationSource,
    ) -> Self {
        let step = spacing.degrees();
        let min = bounds.min();

        let mut values = Vec::with_capacity(width * height);
        for i in 0..width {
            let lng = min.x + i as f64 * step;
            for j in 0..height {
                let lat = min.y + j as f64 * step;
                values.push(source.elevation(lng, lat));
            }
        }

        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.height + j]
    }

    /// Elevation at the +i neighbor, or the node itself on the last column.
    pub fn neighbor_x(&self, i: usize, j: usize) -> f32 {
        if i + 1 < self.width {
            self.get(i + 1, j)
        } else {
            self.get(i, j)
        }
    }

    /// Elevation at the +j neighbor, or the node itself on the last row.
    pub fn neighbor_z(&self, i: usize, j: usize) -> f32 {
        if j + 1 < self.height {
            self.get(i, j + 1)
        } else {
            self.get(i, j)
        }
    }
}

/// Vertex streams ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayMesh {
    /// Two floats per vertex, projected-plane units.
    pub positions: Vec<f32>,
    pub elevations: Vec<f32>,
    pub elevations_nx: Vec<f32>,
    pub elevations_nz: Vec<f32>,
}

impl OverlayMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Ground size of one grid step, read by the slope and aspect stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Step in degrees along both axes.
    pub spacing_deg: f64,
    /// Length of a degree of longitude relative to a degree of latitude,
    /// `cos` of the box's center latitude.
    pub lng_scale: f64,
}

/// Tessellates a bounding box into the overlay mesh.
#[derive(Debug, Clone, Copy)]
pub struct OverlayMeshBuilder {
    bounds: BoundingBox,
    spacing: GridSpacing,
    half_extent: DVec2,
    width: usize,
    height: usize,
}

impl OverlayMeshBuilder {
    /// Builder with the cell half extent derived from the box's center
    /// latitude.
    ///
    /// Fails with [`TerrainError::GridTooLarge`] when the grid would exceed
    /// [`MAX_VERTICES`].
    pub fn new(bounds: BoundingBox, spacing: GridSpacing) -> Result<Self, TerrainError> {
        let (width, height) = grid_dimensions(&bounds, spacing)?;
        let half_extent = derived_half_extent(&bounds, spacing);
        Ok(Self {
            bounds,
            spacing,
            half_extent,
            width,
            height,
        })
    }

    /// Overrides the per-axis half extent of a cell, in projected units.
    pub fn with_half_extent(mut self, half_extent: DVec2) -> Self {
        self.half_extent = half_extent;
        self
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn spacing(&self) -> GridSpacing {
        self.spacing
    }

    pub fn half_extent(&self) -> DVec2 {
        self.half_extent
    }

    pub fn metrics(&self) -> GridMetrics {
        GridMetrics {
            spacing_deg: self.spacing.degrees(),
            lng_scale: self.bounds.center().y.to_radians().cos(),
        }
    }

    /// Vertices [`build`](Self::build) will produce.
    pub fn vertex_count(&self) -> usize {
        self.width * self.height * VERTICES_PER_CELL
    }

    pub fn build(&self, source: &dyn ElevationSource, projection: &dyn PlaneProjection) -> OverlayMesh {
        if !source.is_ready() {
            log::warn!("Elevation data not loaded yet, building a flat overlay");
        }

        let grid = ElevationGrid::fill(&self.bounds, self.spacing, self.width, self.height, source);
        let vertex_count = self.vertex_count();
        let mut mesh = OverlayMesh {
            positions: Vec::with_capacity(vertex_count * 2),
            elevations: Vec::with_capacity(vertex_count),
            elevations_nx: Vec::with_capacity(vertex_count),
            elevations_nz: Vec::with_capacity(vertex_count),
        };

        let step = self.spacing.degrees();
        let min = self.bounds.min();
        let h = self.half_extent;

        for i in 0..grid.width() {
            for j in 0..grid.height() {
                let node = projection.project(Coord {
                    x: min.x + i as f64 * step,
                    y: min.y + j as f64 * step,
                });

                // projected y grows southward, so "top" is y - h
                let top_left = DVec2::new(node.x - h.x, node.y - h.y);
                let top_right = DVec2::new(node.x + h.x, node.y - h.y);
                let bottom_left = DVec2::new(node.x - h.x, node.y + h.y);
                let bottom_right = DVec2::new(node.x + h.x, node.y + h.y);

                for corner in [
                    top_left,
                    bottom_left,
                    bottom_right,
                    top_left,
                    bottom_right,
                    top_right,
                ] {
                    mesh.positions.push(corner.x as f32);
                    mesh.positions.push(corner.y as f32);
                }

                let elevation = grid.get(i, j);
                let nx = grid.neighbor_x(i, j);
                let nz = grid.neighbor_z(i, j);
                for _ in 0..VERTICES_PER_CELL {
                    mesh.elevations.push(elevation);
                    mesh.elevations_nx.push(nx);
                    mesh.elevations_nz.push(nz);
                }
            }
        }

        log::debug!(
            "Built overlay mesh: {}x{} nodes, {} vertices",
            grid.width(),
            grid.height(),
            mesh.vertex_count()
        );
        mesh
    }
}

/// Half a grid step in projected units at the box's center latitude.
///
/// The projected plane spans 360 degrees of longitude per unit, and
/// Mercator stretches latitude by `1 / cos(lat)`.
fn derived_half_extent(bounds: &BoundingBox, spacing: GridSpacing) -> DVec2 {
    let step = spacing.degrees();
    let center_lat = bounds.center().y.to_radians();
    DVec2::new(step / 720.0, step / (720.0 * center_lat.cos()))
}
