// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glsl-program`.
//
// `glsl-program` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glsl-program` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glsl-program`. If not, see <https://www.gnu.org/licenses/> or
// <https://www.mozilla.org/en-US/MPL/2.0/>.

//! A [`glow`] backend for [`glsl-program`].
//!
//! Wrap any [`HasContext`] in a [`GlowBackend`], put it in an [`Rc`], and build
//! [`ShaderProgram`]s from it:
//!
//! ```no_run
//! # fn load(context: glow::Context) -> Result<(), Box<dyn std::error::Error>> {
//! use glsl_program::ProgramBuilder;
//! use glsl_program_glow::GlowBackend;
//! use std::rc::Rc;
//!
//! // SAFETY: `context` is current on this thread.
//! let backend = unsafe { GlowBackend::new(context)? };
//! let builder = ProgramBuilder::new().version_header(backend.shader_header());
//! let program = builder.build_from_files(Rc::new(backend), "vshader.vs", "fshader.fs")?;
//!
//! program.activate();
//! program.set_vec4("ourColor", 0.5, 1.0, 0.5, 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! [`glow`]: https://crates.io/crates/glow
//! [`glsl-program`]: glsl_program
//! [`HasContext`]: glow::HasContext
//! [`Rc`]: std::rc::Rc
//! [`ShaderProgram`]: glsl_program::ShaderProgram

use glow::HasContext;
use glsl_program::{ShaderBackend, Stage, UniformValue};

use std::fmt;

pub use glow;
pub use glsl_program;

/// The OpenGL version that is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GlVersion {
    /// OpenGL 3.3 or higher.
    Gl33,

    /// OpenGL ES 3.0 or higher.
    Es30,
}

impl GlVersion {
    /// Pick the version family for a context, or `None` if it is too old.
    fn detect(major: u32, minor: u32, is_embedded: bool) -> Option<Self> {
        if is_embedded {
            (major >= 3).then_some(GlVersion::Es30)
        } else {
            (major >= 4 || (major == 3 && minor >= 3)).then_some(GlVersion::Gl33)
        }
    }

    fn shader_header(self) -> &'static str {
        match self {
            GlVersion::Gl33 => "#version 330 core",
            GlVersion::Es30 => "#version 300 es\nprecision mediump float;",
        }
    }
}

/// A [`ShaderBackend`] over a [`glow`] context.
///
/// [`glow`]: https://crates.io/crates/glow
pub struct GlowBackend<H: HasContext> {
    /// The OpenGL context.
    context: H,

    /// The detected version family.
    version: GlVersion,
}

impl<H: HasContext> fmt::Debug for GlowBackend<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowBackend")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<H: HasContext> GlowBackend<H> {
    /// Wrap a [`glow`] context.
    ///
    /// Fails if the context is older than OpenGL 3.3 or OpenGL ES 3.0.
    ///
    /// # Safety
    ///
    /// The context must be current while calling this function, for every method of the
    /// [`ShaderBackend`] trait, and when any program built from it is dropped.
    ///
    /// [`glow`]: https://crates.io/crates/glow
    pub unsafe fn new(context: H) -> Result<Self, GlError> {
        let version = context.version();
        tracing::debug!(
            major = version.major,
            minor = version.minor,
            embedded = version.is_embedded,
            "creating glow shader backend"
        );

        let version = GlVersion::detect(version.major, version.minor, version.is_embedded)
            .ok_or_else(|| GlError("OpenGL version 3.3 (or 3.0 ES) or higher is required".into()))?;

        Ok(Self { context, version })
    }

    /// The `#version` line (plus ES precision qualifier) that suits this context.
    ///
    /// Pass it to [`ProgramBuilder::version_header`] so shader files can leave it out.
    ///
    /// [`ProgramBuilder::version_header`]: glsl_program::ProgramBuilder::version_header
    pub fn shader_header(&self) -> &'static str {
        self.version.shader_header()
    }

    /// Whether this is an OpenGL ES context.
    pub fn is_embedded(&self) -> bool {
        matches!(self.version, GlVersion::Es30)
    }

    /// Get a reference to the underlying context.
    pub fn context(&self) -> &H {
        &self.context
    }

    /// Consume this backend and return the underlying context.
    pub fn into_inner(self) -> H {
        self.context
    }
}

/// An error reported by the OpenGL driver.
#[derive(Debug)]
pub struct GlError(String);

impl From<String> for GlError {
    fn from(s: String) -> Self {
        GlError(s)
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gl error: {}", self.0)
    }
}

impl std::error::Error for GlError {}

impl<H: HasContext> ShaderBackend for GlowBackend<H> {
    type Shader = H::Shader;
    type Program = H::Program;
    type UniformLocation = H::UniformLocation;
    type Error = GlError;

    fn create_shader(&self, stage: Stage) -> Result<Self::Shader, Self::Error> {
        let shader_type = match stage {
            Stage::Vertex => glow::VERTEX_SHADER,
            Stage::Fragment => glow::FRAGMENT_SHADER,
        };

        unsafe { self.context.create_shader(shader_type).gl_err() }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.context.shader_source(shader, source);
            self.context.compile_shader(shader);
        }

        gl_error(&self.context);
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.context.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.context.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe {
            self.context.delete_shader(shader);
        }
    }

    fn create_program(&self) -> Result<Self::Program, Self::Error> {
        unsafe { self.context.create_program().gl_err() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe {
            self.context.attach_shader(program, shader);
        }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe {
            self.context.detach_shader(program, shader);
        }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe {
            self.context.link_program(program);
        }

        gl_error(&self.context);
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.context.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.context.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe {
            self.context.delete_program(program);
        }

        gl_error(&self.context);
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe {
            self.context.use_program(program);
        }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.context.get_uniform_location(program, name) }
    }

    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue<'_>) {
        let location = Some(location);

        unsafe {
            match value {
                UniformValue::Bool(value) => self.context.uniform_1_i32(location, value as i32),
                UniformValue::Int(value) => self.context.uniform_1_i32(location, value),
                UniformValue::Float(value) => self.context.uniform_1_f32(location, value),
                UniformValue::Vec2([x, y]) => self.context.uniform_2_f32(location, x, y),
                UniformValue::Vec3([x, y, z]) => self.context.uniform_3_f32(location, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => {
                    self.context.uniform_4_f32(location, x, y, z, w)
                }
                UniformValue::Mat4(columns) => {
                    self.context
                        .uniform_matrix_4_f32_slice(location, false, columns)
                }
            }
        }

        gl_error(&self.context);
    }

    fn read_uniform_f32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        out: &mut [f32],
    ) {
        unsafe {
            self.context.get_uniform_f32(program, location, out);
        }

        gl_error(&self.context);
    }

    fn read_uniform_i32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        out: &mut [i32],
    ) {
        unsafe {
            self.context.get_uniform_i32(program, location, out);
        }

        gl_error(&self.context);
    }
}

/// Drain the GL error flag and log what was found.
fn gl_error(h: &(impl HasContext + ?Sized)) {
    let err = unsafe { h.get_error() };

    if err != glow::NO_ERROR {
        tracing::error!("GL error: {}", error_name(err))
    }
}

fn error_name(err: u32) -> &'static str {
    match err {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "Unknown GL error",
    }
}

trait ResultExt<T, E> {
    fn gl_err(self) -> Result<T, GlError>;
}

impl<T, E: Into<GlError>> ResultExt<T, E> for Result<T, E> {
    fn gl_err(self) -> Result<T, GlError> {
        self.map_err(Into::into)
    }
}
