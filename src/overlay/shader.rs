//! Per-kind shader program compilation and caching.

use super::gl::GlBackend;
use super::kind::OverlayKind;
use crate::error::{GlError, ShaderStage};
use std::collections::HashMap;

pub const ATTR_POSITION: &str = "a_position";
pub const ATTR_ELEVATION: &str = "a_elevation";
pub const ATTR_ELEVATION_NX: &str = "a_elevation_nx";
pub const ATTR_ELEVATION_NZ: &str = "a_elevation_nz";

pub const UNIFORM_MATRIX: &str = "u_matrix";
pub const UNIFORM_GRID_SPACING: &str = "u_grid_spacing";
pub const UNIFORM_LNG_SCALE: &str = "u_lng_scale";
pub const UNIFORM_OPACITY: &str = "u_opacity";

/// Vertex attribute locations. `None` means the stage does not use the
/// attribute and the stream is not bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeLocations {
    pub position: Option<u32>,
    pub elevation: Option<u32>,
    pub elevation_nx: Option<u32>,
    pub elevation_nz: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct UniformLocations<U> {
    pub matrix: Option<U>,
    pub grid_spacing: Option<U>,
    pub lng_scale: Option<U>,
    pub opacity: Option<U>,
}

/// A linked program and its resolved locations.
pub struct ShaderProgram<G: GlBackend> {
    pub program: G::Program,
    pub attributes: AttributeLocations,
    pub uniforms: UniformLocations<G::UniformLocation>,
}

/// Lazily compiles one program per overlay kind and keeps it for the
/// lifetime of the cache.
///
/// Failed kinds are remembered as absent and never retried.
pub struct ShaderProgramCache<G: GlBackend> {
    programs: HashMap<OverlayKind, Option<ShaderProgram<G>>>,
}

impl<G: GlBackend> Default for ShaderProgramCache<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GlBackend> ShaderProgramCache<G> {
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }

    /// Returns the program for `kind`, compiling it on first request.
    pub fn get_program(&mut self, gl: &G, kind: OverlayKind) -> Option<&ShaderProgram<G>> {
        self.programs
            .entry(kind)
            .or_insert_with(|| match kind.vertex_source() {
                None => None,
                Some(vertex_source) => {
                    match create_program(gl, vertex_source, OverlayKind::fragment_source()) {
                        Ok(program) => {
                            log::info!("Shaders compiled and linked for {} overlay", kind.label());
                            Some(program)
                        }
                        Err(e) => {
                            log::error!("{} overlay unavailable: {}", kind.label(), e);
                            None
                        }
                    }
                }
            })
            .as_ref()
    }

    /// Lookup without compiling, for the render path.
    pub fn cached(&self, kind: OverlayKind) -> Option<&ShaderProgram<G>> {
        self.programs.get(&kind).and_then(Option::as_ref)
    }

    /// Whether `kind` has been requested before, successfully or not.
    pub fn contains(&self, kind: OverlayKind) -> bool {
        self.programs.contains_key(&kind)
    }

    /// Deletes every cached program.
    pub fn clear(&mut self, gl: &G) {
        for program in self.programs.drain().filter_map(|(_, program)| program) {
            gl.delete_program(program.program);
        }
    }
}

fn create_program<G: GlBackend>(
    gl: &G,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ShaderProgram<G>, GlError> {
    let vertex = gl.compile_shader(ShaderStage::Vertex, vertex_source)?;
    let fragment = match gl.compile_shader(ShaderStage::Fragment, fragment_source) {
        Ok(fragment) => fragment,
        Err(e) => {
            gl.delete_shader(vertex);
            return Err(e);
        }
    };

    let linked = gl.link_program(vertex, fragment);
    gl.delete_shader(vertex);
    gl.delete_shader(fragment);
    let program = linked?;

    let attributes = AttributeLocations {
        position: gl.attrib_location(program, ATTR_POSITION),
        elevation: gl.attrib_location(program, ATTR_ELEVATION),
        elevation_nx: gl.attrib_location(program, ATTR_ELEVATION_NX),
        elevation_nz: gl.attrib_location(program, ATTR_ELEVATION_NZ),
    };
    let uniforms = UniformLocations {
        matrix: gl.uniform_location(program, UNIFORM_MATRIX),
        grid_spacing: gl.uniform_location(program, UNIFORM_GRID_SPACING),
        lng_scale: gl.uniform_location(program, UNIFORM_LNG_SCALE),
        opacity: gl.uniform_location(program, UNIFORM_OPACITY),
    };

    Ok(ShaderProgram {
        program,
        attributes,
        uniforms,
    })
}
