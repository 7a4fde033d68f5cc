//! Custom map layer driving the overlay lifecycle.
//!
//! The host calls `on_add` once a GL context exists, `render` every frame and
//! `on_remove` at teardown. Kind changes replace the renderable; builds are
//! numbered so a finished mesh for a superseded request is dropped.

use super::gl::GlBackend;
use super::kind::OverlayKind;
use super::mesh::{GridMetrics, OverlayMesh, OverlayMeshBuilder};
use super::renderable::{OverlayRenderable, RenderableStatus};
use super::shader::ShaderProgramCache;
use crate::geo::PlaneProjection;
use crate::terrain::ElevationSource;
use glam::Mat4;

/// A requested build whose mesh still has to be produced.
#[derive(Debug, Clone, Copy)]
pub struct BuildJob {
    seq: u64,
    kind: OverlayKind,
    builder: OverlayMeshBuilder,
}

impl BuildJob {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn run(&self, source: &dyn ElevationSource, projection: &dyn PlaneProjection) -> BuiltMesh {
        BuiltMesh {
            seq: self.seq,
            kind: self.kind,
            mesh: self.builder.build(source, projection),
            metrics: self.builder.metrics(),
        }
    }
}

/// Mesh produced by a [`BuildJob`], waiting to be uploaded.
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    seq: u64,
    kind: OverlayKind,
    mesh: OverlayMesh,
    metrics: GridMetrics,
}

impl BuiltMesh {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn mesh(&self) -> &OverlayMesh {
        &self.mesh
    }

    pub fn metrics(&self) -> GridMetrics {
        self.metrics
    }
}

pub struct OverlayLayer<G: GlBackend> {
    shaders: ShaderProgramCache<G>,
    renderable: Option<OverlayRenderable<G>>,
    builder: OverlayMeshBuilder,
    kind: OverlayKind,
    latest_seq: u64,
    attached: bool,
}

impl<G: GlBackend> OverlayLayer<G> {
    pub fn new(builder: OverlayMeshBuilder, kind: OverlayKind) -> Self {
        Self {
            shaders: ShaderProgramCache::new(),
            renderable: None,
            builder,
            kind,
            latest_seq: 0,
            attached: false,
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Status of the current renderable, `None` before the first build.
    pub fn status(&self) -> Option<RenderableStatus> {
        self.renderable.as_ref().map(|r| r.status())
    }

    pub fn on_add(&mut self, gl: &G, source: &dyn ElevationSource, projection: &dyn PlaneProjection) {
        log::info!("Initializing overlay ({})", self.kind.label());
        self.attached = true;
        self.build(gl, self.kind, source, projection);
    }

    /// Switches to `kind`, replacing the current renderable.
    pub fn set_kind(
        &mut self,
        gl: &G,
        kind: OverlayKind,
        source: &dyn ElevationSource,
        projection: &dyn PlaneProjection,
    ) {
        if kind == self.kind && self.renderable.is_some() {
            return;
        }
        log::info!("Overlay kind changed: {} -> {}", self.kind.label(), kind.label());
        self.kind = kind;
        if self.attached {
            self.build(gl, kind, source, projection);
        }
    }

    /// Re-runs the build for the current kind, e.g. once the DEM has loaded.
    pub fn rebuild(&mut self, gl: &G, source: &dyn ElevationSource, projection: &dyn PlaneProjection) {
        if self.attached {
            self.build(gl, self.kind, source, projection);
        }
    }

    fn build(
        &mut self,
        gl: &G,
        kind: OverlayKind,
        source: &dyn ElevationSource,
        projection: &dyn PlaneProjection,
    ) {
        if let Some(job) = self.begin_build(gl, kind) {
            let built = job.run(source, projection);
            self.finish_build(gl, built);
        }
    }

    /// Replaces the current renderable with a fresh one for `kind`.
    ///
    /// Returns the job that produces its mesh, or `None` when the kind has
    /// nothing to draw.
    pub fn begin_build(&mut self, gl: &G, kind: OverlayKind) -> Option<BuildJob> {
        self.latest_seq += 1;
        self.kind = kind;

        if let Some(mut old) = self.renderable.take() {
            old.destroy(gl);
        }

        let mut renderable = OverlayRenderable::new(kind);
        let buildable = renderable.begin_build(gl, &mut self.shaders);
        self.renderable = Some(renderable);

        if !buildable {
            log::info!("{} overlay has nothing to draw", kind.label());
            return None;
        }

        Some(BuildJob {
            seq: self.latest_seq,
            kind,
            builder: self.builder,
        })
    }

    /// Uploads a finished mesh if it belongs to the latest request.
    ///
    /// Returns `false` when the mesh was superseded and dropped.
    pub fn finish_build(&mut self, gl: &G, built: BuiltMesh) -> bool {
        if built.seq != self.latest_seq {
            log::warn!(
                "Discarding superseded {} overlay build #{} (latest #{})",
                built.kind.label(),
                built.seq,
                self.latest_seq
            );
            return false;
        }

        match self.renderable.as_mut() {
            Some(renderable) if renderable.kind() == built.kind => {
                renderable.upload(gl, &built.mesh, built.metrics);
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, gl: &G, matrix: &Mat4, opacity: f32) {
        if let Some(renderable) = &self.renderable {
            renderable.render(gl, &self.shaders, matrix, opacity);
        }
    }

    /// Releases every buffer and program the layer created.
    pub fn on_remove(&mut self, gl: &G) {
        log::info!("Removing overlay");
        if let Some(mut renderable) = self.renderable.take() {
            renderable.destroy(gl);
        }
        self.shaders.clear(gl);
        self.attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{BoundingBox, GridSpacing, WebMercator};
    use crate::overlay::testing::{GlCall, RecordingGl};

    struct Constant(f32, bool);

    impl ElevationSource for Constant {
        fn elevation(&self, _lng: f64, _lat: f64) -> f32 {
            self.0
        }

        fn is_ready(&self) -> bool {
            self.1
        }
    }

    fn layer(kind: OverlayKind) -> OverlayLayer<RecordingGl> {
        // binary-exact extent so the node count is 3 x 2
        let bounds = BoundingBox::from_extent(-121.625, 40.375, -121.5, 40.4375).unwrap();
        let builder = OverlayMeshBuilder::new(bounds, GridSpacing::new(0.0625).unwrap()).unwrap();
        OverlayLayer::new(builder, kind)
    }

    #[test]
    fn test_on_add_builds_ready_overlay() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        assert_eq!(layer.status(), None);

        layer.on_add(&gl, &Constant(2000.0, true), &WebMercator);
        assert!(layer.is_attached());
        assert_eq!(layer.status(), Some(RenderableStatus::Ready));
        assert_eq!(gl.live_buffer_count(), 4);

        layer.render(&gl, &Mat4::IDENTITY, 0.2);
        assert!(gl.calls().contains(&GlCall::DrawTriangles(6 * 3 * 2)));
    }

    #[test]
    fn test_kind_change_releases_previous_buffers() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        let source = Constant(2000.0, true);
        layer.on_add(&gl, &source, &WebMercator);

        layer.set_kind(&gl, OverlayKind::Slope, &source, &WebMercator);
        assert_eq!(layer.kind(), OverlayKind::Slope);
        assert_eq!(layer.status(), Some(RenderableStatus::Ready));
        assert_eq!(gl.deleted_buffers().len(), 4);
        assert_eq!(gl.live_buffer_count(), 4);
    }

    #[test]
    fn test_same_kind_does_not_rebuild() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Aspect);
        let source = Constant(2000.0, true);
        layer.on_add(&gl, &source, &WebMercator);

        layer.set_kind(&gl, OverlayKind::Aspect, &source, &WebMercator);
        assert!(gl.deleted_buffers().is_empty());
    }

    #[test]
    fn test_switch_to_none_disables() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        let source = Constant(2000.0, true);
        layer.on_add(&gl, &source, &WebMercator);

        layer.set_kind(&gl, OverlayKind::None, &source, &WebMercator);
        assert_eq!(layer.status(), Some(RenderableStatus::Disabled));
        assert_eq!(gl.live_buffer_count(), 0);

        gl.clear_calls();
        layer.render(&gl, &Mat4::IDENTITY, 1.0);
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_kind_set_before_attach_is_used_by_on_add() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        let source = Constant(2000.0, true);

        layer.set_kind(&gl, OverlayKind::Slope, &source, &WebMercator);
        assert_eq!(gl.compile_count(), 0);

        layer.on_add(&gl, &source, &WebMercator);
        assert_eq!(layer.kind(), OverlayKind::Slope);
        assert_eq!(layer.status(), Some(RenderableStatus::Ready));
    }

    #[test]
    fn test_superseded_build_is_discarded() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        let source = Constant(2000.0, true);

        let first = layer.begin_build(&gl, OverlayKind::Elevation).unwrap();
        let second = layer.begin_build(&gl, OverlayKind::Slope).unwrap();
        assert!(second.seq() > first.seq());

        let stale = first.run(&source, &WebMercator);
        assert_eq!(stale.mesh().vertex_count(), 6 * 3 * 2);
        assert!(!layer.finish_build(&gl, stale));
        assert_eq!(gl.live_buffer_count(), 0);

        let built = second.run(&source, &WebMercator);
        assert_eq!(built.metrics().spacing_deg, 0.0625);
        assert!(layer.finish_build(&gl, built));
        assert_eq!(layer.status(), Some(RenderableStatus::Ready));
        assert_eq!(layer.kind(), OverlayKind::Slope);
    }

    #[test]
    fn test_rebuild_after_dem_loads() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        layer.on_add(&gl, &Constant(0.0, false), &WebMercator);
        assert_eq!(layer.status(), Some(RenderableStatus::Ready));

        layer.rebuild(&gl, &Constant(2500.0, true), &WebMercator);
        assert_eq!(layer.status(), Some(RenderableStatus::Ready));
        assert_eq!(gl.deleted_buffers().len(), 4);
        assert_eq!(gl.live_buffer_count(), 4);
        // programs are reused across rebuilds
        assert_eq!(gl.compile_count(), 2);
    }

    #[test]
    fn test_rebuild_before_attach_does_nothing() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        layer.rebuild(&gl, &Constant(2500.0, true), &WebMercator);
        assert_eq!(layer.status(), None);
    }

    #[test]
    fn test_on_remove_releases_everything() {
        let gl = RecordingGl::new();
        let mut layer = layer(OverlayKind::Elevation);
        let source = Constant(2000.0, true);
        layer.on_add(&gl, &source, &WebMercator);
        layer.set_kind(&gl, OverlayKind::Aspect, &source, &WebMercator);
        assert_eq!(gl.program_count(), 2);

        layer.on_remove(&gl);
        assert!(!layer.is_attached());
        assert_eq!(layer.status(), None);
        assert_eq!(gl.live_buffer_count(), 0);
        assert_eq!(gl.live_vertex_array_count(), 0);
        assert_eq!(gl.program_count(), 0);
    }
}
