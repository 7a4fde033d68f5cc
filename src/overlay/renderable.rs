//! GPU-resident overlay for a single kind.

use super::gl::GlBackend;
use super::kind::OverlayKind;
use super::mesh::{GridMetrics, OverlayMesh};
use super::shader::ShaderProgramCache;
use crate::error::GlError;
use glam::Mat4;

/// Lifecycle of a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderableStatus {
    Unbuilt,
    Building,
    Ready,
    /// Nothing to draw: the kind is `None` or its program is unavailable.
    Disabled,
}

impl RenderableStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RenderableStatus::Unbuilt => "Not built",
            RenderableStatus::Building => "Building",
            RenderableStatus::Ready => "Ready",
            RenderableStatus::Disabled => "Disabled",
        }
    }
}

struct MeshBuffers<G: GlBackend> {
    vertex_array: G::VertexArray,
    position: G::Buffer,
    elevation: G::Buffer,
    elevation_nx: G::Buffer,
    elevation_nz: G::Buffer,
}

impl<G: GlBackend> MeshBuffers<G> {
    fn upload(gl: &G, mesh: &OverlayMesh) -> Result<Self, GlError> {
        let vertex_array = gl.create_vertex_array()?;
        let mut created = Vec::with_capacity(4);
        for data in [
            &mesh.positions,
            &mesh.elevations,
            &mesh.elevations_nx,
            &mesh.elevations_nz,
        ] {
            match gl.create_buffer(data) {
                Ok(buffer) => created.push(buffer),
                Err(e) => {
                    for buffer in created {
                        gl.delete_buffer(buffer);
                    }
                    gl.delete_vertex_array(vertex_array);
                    return Err(e);
                }
            }
        }

        Ok(Self {
            vertex_array,
            position: created[0],
            elevation: created[1],
            elevation_nx: created[2],
            elevation_nz: created[3],
        })
    }

    fn release(self, gl: &G) {
        for buffer in [
            self.position,
            self.elevation,
            self.elevation_nx,
            self.elevation_nz,
        ] {
            gl.delete_buffer(buffer);
        }
        gl.delete_vertex_array(self.vertex_array);
    }
}

/// Mesh buffers for one overlay kind plus the state needed to draw them.
///
/// Owns its buffers; programs stay with the shared [`ShaderProgramCache`].
pub struct OverlayRenderable<G: GlBackend> {
    kind: OverlayKind,
    status: RenderableStatus,
    buffers: Option<MeshBuffers<G>>,
    vertex_count: i32,
    grid_spacing: f32,
    lng_scale: f32,
}

impl<G: GlBackend> OverlayRenderable<G> {
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            status: RenderableStatus::Unbuilt,
            buffers: None,
            vertex_count: 0,
            grid_spacing: 0.0,
            lng_scale: 1.0,
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn status(&self) -> RenderableStatus {
        self.status
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }

    /// Acquires the program for this kind. Returns `false` (and disables the
    /// renderable) when there is nothing to draw.
    pub fn begin_build(&mut self, gl: &G, shaders: &mut ShaderProgramCache<G>) -> bool {
        if shaders.get_program(gl, self.kind).is_none() {
            self.status = RenderableStatus::Disabled;
            return false;
        }
        self.status = RenderableStatus::Building;
        true
    }

    /// Uploads the mesh streams. Only valid while `Building`.
    pub fn upload(&mut self, gl: &G, mesh: &OverlayMesh, metrics: GridMetrics) {
        if self.status != RenderableStatus::Building {
            log::warn!(
                "Ignoring mesh upload for {} overlay in state {:?}",
                self.kind.label(),
                self.status
            );
            return;
        }

        let Ok(vertex_count) = i32::try_from(mesh.vertex_count()) else {
            log::error!(
                "{} overlay mesh has {} vertices, more than one draw call takes",
                self.kind.label(),
                mesh.vertex_count()
            );
            self.status = RenderableStatus::Disabled;
            return;
        };

        if let Some(old) = self.buffers.take() {
            old.release(gl);
        }

        match MeshBuffers::upload(gl, mesh) {
            Ok(buffers) => {
                self.buffers = Some(buffers);
                self.vertex_count = vertex_count;
                self.grid_spacing = metrics.spacing_deg as f32;
                self.lng_scale = metrics.lng_scale as f32;
                self.status = RenderableStatus::Ready;
                log::info!(
                    "{} overlay ready ({} vertices)",
                    self.kind.label(),
                    self.vertex_count
                );
            }
            Err(e) => {
                log::error!("Failed to upload {} overlay: {}", self.kind.label(), e);
                self.status = RenderableStatus::Disabled;
            }
        }
    }

    /// Draws the overlay. No-op unless `Ready`.
    pub fn render(&self, gl: &G, shaders: &ShaderProgramCache<G>, matrix: &Mat4, opacity: f32) {
        if self.status != RenderableStatus::Ready || self.vertex_count == 0 {
            return;
        }
        let (Some(buffers), Some(program)) = (self.buffers.as_ref(), shaders.cached(self.kind))
        else {
            return;
        };

        gl.use_program(Some(program.program));
        gl.bind_vertex_array(Some(buffers.vertex_array));

        let uniforms = &program.uniforms;
        if let Some(location) = &uniforms.matrix {
            gl.set_uniform_mat4(location, &matrix.to_cols_array());
        }
        if let Some(location) = &uniforms.grid_spacing {
            gl.set_uniform_f32(location, self.grid_spacing);
        }
        if let Some(location) = &uniforms.lng_scale {
            gl.set_uniform_f32(location, self.lng_scale);
        }
        if let Some(location) = &uniforms.opacity {
            gl.set_uniform_f32(location, opacity);
        }

        let attributes = &program.attributes;
        for (location, buffer, components) in [
            (attributes.position, buffers.position, 2),
            (attributes.elevation, buffers.elevation, 1),
            (attributes.elevation_nx, buffers.elevation_nx, 1),
            (attributes.elevation_nz, buffers.elevation_nz, 1),
        ] {
            if let Some(location) = location {
                gl.bind_attribute(location, buffer, components);
            }
        }

        gl.enable_alpha_blending();
        gl.draw_triangles(self.vertex_count);

        gl.bind_vertex_array(None);
        gl.use_program(None);
    }

    /// Releases the GPU buffers. The renderable cannot draw afterwards.
    pub fn destroy(&mut self, gl: &G) {
        if let Some(buffers) = self.buffers.take() {
            buffers.release(gl);
        }
        self.vertex_count = 0;
        self.status = RenderableStatus::Unbuilt;
    }
}
