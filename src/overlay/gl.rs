//! Narrow GPU surface used by the overlay.
//!
//! Everything the overlay needs from OpenGL / WebGL2 goes through
//! [`GlBackend`], implemented for `glow::Context`. Object creation failures
//! come back as [`GlError`]; all other calls are fire-and-forget like the
//! underlying API.

use crate::error::{GlError, ShaderStage};
use glow::HasContext;

/// GLSL version line prepended to every shader source.
#[cfg(target_arch = "wasm32")]
pub const SHADER_VERSION: &str = "#version 300 es";
#[cfg(not(target_arch = "wasm32"))]
pub const SHADER_VERSION: &str = "#version 330 core";

pub trait GlBackend {
    type Shader: Copy;
    type Program: Copy;
    type Buffer: Copy;
    type VertexArray: Copy;
    type UniformLocation: Clone;

    /// Compiles one stage; `source` must not carry a `#version` line.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, GlError>;
    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, GlError>;
    fn delete_shader(&self, shader: Self::Shader);
    fn delete_program(&self, program: Self::Program);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn create_vertex_array(&self) -> Result<Self::VertexArray, GlError>;
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    /// Creates a static array buffer holding `data`.
    fn create_buffer(&self, data: &[f32]) -> Result<Self::Buffer, GlError>;
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn use_program(&self, program: Option<Self::Program>);
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    /// Points attribute `location` at `buffer`, `components` tightly packed
    /// floats per vertex.
    fn bind_attribute(&self, location: u32, buffer: Self::Buffer, components: i32);
    fn set_uniform_mat4(&self, location: &Self::UniformLocation, matrix: &[f32; 16]);
    fn set_uniform_f32(&self, location: &Self::UniformLocation, value: f32);

    /// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending.
    fn enable_alpha_blending(&self);
    fn draw_triangles(&self, vertex_count: i32);
}

impl GlBackend for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, GlError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.create_shader(shader_type).map_err(GlError::Allocation)?;
            self.shader_source(shader, &format!("{}\n{}", SHADER_VERSION, source));
            HasContext::compile_shader(self, shader);
            if !self.get_shader_compile_status(shader) {
                let log = self.get_shader_info_log(shader);
                HasContext::delete_shader(self, shader);
                return Err(GlError::ShaderCompile { stage, log });
            }
            Ok(shader)
        }
    }

    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, GlError> {
        unsafe {
            let program = self.create_program().map_err(GlError::Allocation)?;
            self.attach_shader(program, vertex);
            self.attach_shader(program, fragment);
            HasContext::link_program(self, program);
            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(GlError::ShaderLink(log));
            }
            self.detach_shader(program, vertex);
            self.detach_shader(program, fragment);
            Ok(program)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, GlError> {
        unsafe { HasContext::create_vertex_array(self).map_err(GlError::Allocation) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn create_buffer(&self, data: &[f32]) -> Result<Self::Buffer, GlError> {
        unsafe {
            let buffer = HasContext::create_buffer(self).map_err(GlError::Allocation)?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) }
    }

    fn bind_attribute(&self, location: u32, buffer: Self::Buffer, components: i32) {
        unsafe {
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.enable_vertex_attrib_array(location);
            self.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
        }
    }

    fn set_uniform_mat4(&self, location: &Self::UniformLocation, matrix: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(location), false, matrix) }
    }

    fn set_uniform_f32(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { self.uniform_1_f32(Some(location), value) }
    }

    fn enable_alpha_blending(&self) {
        unsafe {
            self.enable(glow::BLEND);
            self.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn draw_triangles(&self, vertex_count: i32) {
        unsafe {
            self.draw_arrays(glow::TRIANGLES, 0, vertex_count);
            self.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }
}
