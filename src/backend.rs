// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glsl-program`.
//
// `glsl-program` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glsl-program` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glsl-program`. If not, see <https://www.gnu.org/licenses/>.

//! Defines the graphics backend used to build shader programs.

use std::error::Error;
use std::fmt;

/// The backend for shader compilation and uniform upload.
///
/// Every method is expected to be called on the thread that owns the graphics context, with
/// that context current. Implementations are free to assume this.
pub trait ShaderBackend {
    /// The type associated with a single compiled shader stage.
    type Shader: Copy;

    /// The type associated with a linked shader program.
    type Program: Copy;

    /// The location of a uniform variable inside of a program.
    type UniformLocation: Clone;

    /// The error type associated with this backend.
    type Error: Error + Send + Sync + 'static;

    /// Create a new, empty shader object for the given stage.
    fn create_shader(&self, stage: Stage) -> Result<Self::Shader, Self::Error>;

    /// Upload the source for a shader and compile it.
    fn compile_shader(&self, shader: Self::Shader, source: &str);

    /// Whether the last compilation of this shader succeeded.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;

    /// Get the info log produced by the last compilation of this shader.
    fn shader_info_log(&self, shader: Self::Shader) -> String;

    /// Delete a shader object.
    fn delete_shader(&self, shader: Self::Shader);

    /// Create a new, empty program object.
    fn create_program(&self) -> Result<Self::Program, Self::Error>;

    /// Attach a shader to a program.
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// Detach a shader from a program.
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// Link all of the shaders attached to a program.
    fn link_program(&self, program: Self::Program);

    /// Whether the last link of this program succeeded.
    fn program_link_status(&self, program: Self::Program) -> bool;

    /// Get the info log produced by the last link of this program.
    fn program_info_log(&self, program: Self::Program) -> String;

    /// Delete a program object.
    fn delete_program(&self, program: Self::Program);

    /// Make a program current, or unbind the current program with `None`.
    fn use_program(&self, program: Option<Self::Program>);

    /// Look up the location of a uniform by name.
    ///
    /// Returns `None` if the program has no active uniform with that name.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    /// Set a uniform in the currently bound program.
    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue<'_>);

    /// Read the floating point components of a uniform back from the driver.
    fn read_uniform_f32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        out: &mut [f32],
    );

    /// Read the integer components of a uniform back from the driver.
    fn read_uniform_i32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        out: &mut [i32],
    );
}

impl<C: ShaderBackend + ?Sized> ShaderBackend for &C {
    type Shader = C::Shader;
    type Program = C::Program;
    type UniformLocation = C::UniformLocation;
    type Error = C::Error;

    fn create_shader(&self, stage: Stage) -> Result<Self::Shader, Self::Error> {
        (**self).create_shader(stage)
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) {
        (**self).compile_shader(shader, source)
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        (**self).shader_compile_status(shader)
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        (**self).shader_info_log(shader)
    }

    fn delete_shader(&self, shader: Self::Shader) {
        (**self).delete_shader(shader)
    }

    fn create_program(&self) -> Result<Self::Program, Self::Error> {
        (**self).create_program()
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        (**self).attach_shader(program, shader)
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        (**self).detach_shader(program, shader)
    }

    fn link_program(&self, program: Self::Program) {
        (**self).link_program(program)
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        (**self).program_link_status(program)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        (**self).program_info_log(program)
    }

    fn delete_program(&self, program: Self::Program) {
        (**self).delete_program(program)
    }

    fn use_program(&self, program: Option<Self::Program>) {
        (**self).use_program(program)
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        (**self).uniform_location(program, name)
    }

    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue<'_>) {
        (**self).set_uniform(location, value)
    }

    fn read_uniform_f32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        out: &mut [f32],
    ) {
        (**self).read_uniform_f32(program, location, out)
    }

    fn read_uniform_i32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        out: &mut [i32],
    ) {
        (**self).read_uniform_i32(program, location, out)
    }
}

/// A programmable stage of the pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The vertex shader.
    Vertex,

    /// The fragment shader.
    Fragment,
}

impl Stage {
    /// The lowercase name of the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value to upload into a uniform variable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue<'a> {
    /// A boolean, uploaded as the integer `0` or `1`.
    Bool(bool),

    /// A signed integer. Sampler uniforms take the texture unit this way.
    Int(i32),

    /// A single float.
    Float(f32),

    /// A `vec2`.
    Vec2([f32; 2]),

    /// A `vec3`.
    Vec3([f32; 3]),

    /// A `vec4`.
    Vec4([f32; 4]),

    /// A `mat4`, in column-major order.
    Mat4(&'a [f32; 16]),
}
