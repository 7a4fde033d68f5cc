//! In-memory [`GlBackend`] that records calls instead of touching a GPU.

use super::gl::GlBackend;
use crate::error::{GlError, ShaderStage};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    UseProgram(Option<u32>),
    BindVertexArray(Option<u32>),
    BindAttribute { location: u32, buffer: u32, components: i32 },
    UniformMat4(String),
    UniformF32(String, f32),
    EnableAlphaBlending,
    DrawTriangles(i32),
}

#[derive(Default)]
struct Recorded {
    next_id: u32,
    compiled: Vec<ShaderStage>,
    shader_sources: HashMap<u32, (ShaderStage, String)>,
    live_shaders: HashSet<u32>,
    programs: HashMap<u32, String>,
    live_buffers: HashMap<u32, Vec<f32>>,
    live_vertex_arrays: HashSet<u32>,
    deleted_buffers: Vec<u32>,
    calls: Vec<GlCall>,
}

/// Recording backend.
///
/// Attribute locations resolve only when the name appears as an identifier
/// in the vertex stage; uniforms resolve when it appears in either stage.
#[derive(Default)]
pub struct RecordingGl {
    state: RefCell<Recorded>,
    /// Stage whose compilation should fail, if any.
    pub fail_stage: Option<ShaderStage>,
    pub fail_link: bool,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_compile(stage: ShaderStage) -> Self {
        Self {
            fail_stage: Some(stage),
            ..Default::default()
        }
    }

    pub fn failing_link() -> Self {
        Self {
            fail_link: true,
            ..Default::default()
        }
    }

    pub fn compile_count(&self) -> usize {
        self.state.borrow().compiled.len()
    }

    pub fn program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().live_shaders.len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.state.borrow().live_buffers.len()
    }

    pub fn live_vertex_array_count(&self) -> usize {
        self.state.borrow().live_vertex_arrays.len()
    }

    pub fn deleted_buffers(&self) -> Vec<u32> {
        self.state.borrow().deleted_buffers.clone()
    }

    pub fn buffer_data(&self, buffer: u32) -> Option<Vec<f32>> {
        self.state.borrow().live_buffers.get(&buffer).cloned()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

fn declares(source: &str, name: &str) -> bool {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| token == name)
}

impl GlBackend for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = String;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, GlError> {
        self.state.borrow_mut().compiled.push(stage);
        if self.fail_stage == Some(stage) {
            return Err(GlError::ShaderCompile {
                stage,
                log: "ERROR: 0:1: syntax error".to_string(),
            });
        }
        let id = self.next_id();
        let mut state = self.state.borrow_mut();
        state.shader_sources.insert(id, (stage, source.to_string()));
        state.live_shaders.insert(id);
        Ok(id)
    }

    fn link_program(&self, vertex: u32, fragment: u32) -> Result<u32, GlError> {
        if self.fail_link {
            return Err(GlError::ShaderLink("link failed".to_string()));
        }
        let id = self.next_id();
        let mut state = self.state.borrow_mut();
        let vertex_source = state
            .shader_sources
            .get(&vertex)
            .map(|(_, s)| s.clone())
            .unwrap_or_default();
        let fragment_source = state
            .shader_sources
            .get(&fragment)
            .map(|(_, s)| s.clone())
            .unwrap_or_default();
        state
            .programs
            .insert(id, format!("{}\n//--\n{}", vertex_source, fragment_source));
        Ok(id)
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().live_shaders.remove(&shader);
    }

    fn delete_program(&self, program: u32) {
        self.state.borrow_mut().programs.remove(&program);
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let source = state.programs.get(&program)?;
        let vertex = source.split("//--").next().unwrap_or_default();
        if !declares(vertex, name) {
            return None;
        }
        const NAMES: [&str; 4] = ["a_position", "a_elevation", "a_elevation_nx", "a_elevation_nz"];
        NAMES.iter().position(|n| *n == name).map(|p| p as u32)
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let source = state.programs.get(&program)?;
        declares(source, name).then(|| name.to_string())
    }

    fn create_vertex_array(&self) -> Result<u32, GlError> {
        let id = self.next_id();
        self.state.borrow_mut().live_vertex_arrays.insert(id);
        Ok(id)
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.state
            .borrow_mut()
            .live_vertex_arrays
            .remove(&vertex_array);
    }

    fn create_buffer(&self, data: &[f32]) -> Result<u32, GlError> {
        let id = self.next_id();
        self.state
            .borrow_mut()
            .live_buffers
            .insert(id, data.to_vec());
        Ok(id)
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.live_buffers.remove(&buffer);
        state.deleted_buffers.push(buffer);
    }

    fn use_program(&self, program: Option<u32>) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::UseProgram(program));
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::BindVertexArray(vertex_array));
    }

    fn bind_attribute(&self, location: u32, buffer: u32, components: i32) {
        self.state.borrow_mut().calls.push(GlCall::BindAttribute {
            location,
            buffer,
            components,
        });
    }

    fn set_uniform_mat4(&self, location: &String, _matrix: &[f32; 16]) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::UniformMat4(location.clone()));
    }

    fn set_uniform_f32(&self, location: &String, value: f32) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::UniformF32(location.clone(), value));
    }

    fn enable_alpha_blending(&self) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::EnableAlphaBlending);
    }

    fn draw_triangles(&self, vertex_count: i32) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::DrawTriangles(vertex_count));
    }
}
