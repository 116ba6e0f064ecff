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

//! The linked shader program and its builder.

use crate::backend::{ShaderBackend, Stage, UniformValue};
use crate::error::{truncate_log, ShaderError, DEFAULT_INFO_LOG_LIMIT};
use crate::uniform::UniformCache;

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::mem;
use std::path::Path;
use std::rc::Rc;

/// Options for building a [`ShaderProgram`].
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    /// Maximum number of bytes kept from a driver info log.
    info_log_limit: usize,

    /// Line prepended to sources that lack a `#version` directive.
    version_header: Option<String>,

    /// Whether uniform locations are remembered after the first lookup.
    cache_uniform_locations: bool,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self {
            info_log_limit: DEFAULT_INFO_LOG_LIMIT,
            version_header: None,
            cache_uniform_locations: false,
        }
    }
}

impl ProgramBuilder {
    /// Create a builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the info log carried by compile and link errors at `limit` bytes.
    pub fn info_log_limit(mut self, limit: usize) -> Self {
        self.info_log_limit = limit;
        self
    }

    /// Prepend `header` to any stage source that doesn't start with its own `#version`.
    pub fn version_header(mut self, header: impl Into<String>) -> Self {
        self.version_header = Some(header.into());
        self
    }

    /// Remember uniform locations instead of asking the driver on every set.
    pub fn cache_uniform_locations(mut self, cache: bool) -> Self {
        self.cache_uniform_locations = cache;
        self
    }

    /// Read both stages from disk, then compile and link them.
    pub fn build_from_files<C: ShaderBackend>(
        &self,
        context: Rc<C>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<ShaderProgram<C>, ShaderError> {
        // Read both files before touching the driver.
        let vertex = read_source(vertex_path.as_ref())?;
        let fragment = read_source(fragment_path.as_ref())?;

        self.build_from_sources(context, &vertex, &fragment)
    }

    /// Compile and link the two stage sources.
    pub fn build_from_sources<C: ShaderBackend>(
        &self,
        context: Rc<C>,
        vertex: &str,
        fragment: &str,
    ) -> Result<ShaderProgram<C>, ShaderError> {
        let vertex = self.with_header(vertex);
        let fragment = self.with_header(fragment);

        let program = link_program(&*context, &vertex, &fragment, self.info_log_limit)?;

        Ok(ShaderProgram {
            context,
            program,
            cache: self.cache_uniform_locations.then(UniformCache::new),
        })
    }

    fn with_header<'a>(&self, source: &'a str) -> Cow<'a, str> {
        // Drivers choke on a byte order mark.
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        match &self.version_header {
            Some(header) if !has_version_directive(source) => {
                Cow::Owned(format!("{header}\n{source}"))
            }
            _ => Cow::Borrowed(source),
        }
    }
}

/// A compiled and linked shader program.
///
/// The program handle is deleted when this is dropped, so the backend's context must still be
/// current at that point.
pub struct ShaderProgram<C: ShaderBackend> {
    /// The backend that owns the program.
    context: Rc<C>,

    /// The linked program.
    program: C::Program,

    /// Location cache, if enabled.
    cache: Option<UniformCache<C::UniformLocation>>,
}

impl<C: ShaderBackend> fmt::Debug for ShaderProgram<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("cached_locations", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: ShaderBackend> ShaderProgram<C> {
    /// Build a program from a vertex and a fragment shader on disk, using default options.
    pub fn from_files(
        context: Rc<C>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        ProgramBuilder::new().build_from_files(context, vertex_path, fragment_path)
    }

    /// Build a program from in-memory sources, using default options.
    pub fn from_sources(context: Rc<C>, vertex: &str, fragment: &str) -> Result<Self, ShaderError> {
        ProgramBuilder::new().build_from_sources(context, vertex, fragment)
    }

    /// The raw program handle.
    pub fn handle(&self) -> C::Program {
        self.program
    }

    /// The backend this program was built with.
    pub fn context(&self) -> &Rc<C> {
        &self.context
    }

    /// Make this the current program for draws and uniform sets.
    pub fn activate(&self) {
        self.context.use_program(Some(self.program));
    }

    /// Look up the location of a uniform.
    pub fn uniform_location(&self, name: &str) -> Option<C::UniformLocation> {
        let lookup = || self.context.uniform_location(self.program, name);

        match &self.cache {
            Some(cache) => cache.get_or_lookup(name, lookup),
            None => lookup(),
        }
    }

    /// Set a uniform of any supported type.
    ///
    /// The program must be active. Unknown names are ignored.
    pub fn set_uniform(&self, name: &str, value: UniformValue<'_>) {
        match self.uniform_location(name) {
            Some(location) => self.context.set_uniform(&location, value),
            None => tracing::trace!("ignoring set of unknown uniform `{name}`"),
        }
    }

    /// Set a `bool` uniform.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    /// Set an `int` or sampler uniform.
    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    /// Set a `float` uniform.
    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    /// Set a `vec2` uniform.
    pub fn set_vec2(&self, name: &str, x: f32, y: f32) {
        self.set_uniform(name, UniformValue::Vec2([x, y]));
    }

    /// Set a `vec3` uniform.
    pub fn set_vec3(&self, name: &str, x: f32, y: f32, z: f32) {
        self.set_uniform(name, UniformValue::Vec3([x, y, z]));
    }

    /// Set a `vec4` uniform.
    pub fn set_vec4(&self, name: &str, x: f32, y: f32, z: f32, w: f32) {
        self.set_uniform(name, UniformValue::Vec4([x, y, z, w]));
    }

    /// Set a `mat4` uniform from 16 column-major values.
    ///
    /// [`glam::Mat4::to_cols_array`] produces exactly this layout.
    pub fn set_mat4(&self, name: &str, columns: &[f32; 16]) {
        self.set_uniform(name, UniformValue::Mat4(columns));
    }

    /// Read a float-based uniform back from the driver into `out`.
    ///
    /// Returns `false` and leaves `out` alone if the uniform doesn't exist.
    pub fn read_uniform_f32(&self, name: &str, out: &mut [f32]) -> bool {
        match self.uniform_location(name) {
            Some(location) => {
                self.context.read_uniform_f32(self.program, &location, out);
                true
            }
            None => false,
        }
    }

    /// Read an integer-based uniform back from the driver into `out`.
    ///
    /// Returns `false` and leaves `out` alone if the uniform doesn't exist.
    pub fn read_uniform_i32(&self, name: &str, out: &mut [i32]) -> bool {
        match self.uniform_location(name) {
            Some(location) => {
                self.context.read_uniform_i32(self.program, &location, out);
                true
            }
            None => false,
        }
    }
}

impl<C: ShaderBackend> Drop for ShaderProgram<C> {
    fn drop(&mut self) {
        tracing::debug!("deleting shader program");
        self.context.delete_program(self.program);
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether the first token after any comments is a `#version` directive.
fn has_version_directive(source: &str) -> bool {
    let mut rest = source.strip_prefix('\u{feff}').unwrap_or(source);

    loop {
        rest = rest.trim_start();

        if let Some(comment) = rest.strip_prefix("//") {
            rest = comment.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(comment) = rest.strip_prefix("/*") {
            match comment.split_once("*/") {
                Some((_, after)) => rest = after,
                None => return false,
            }
        } else {
            return rest.starts_with("#version");
        }
    }
}

/// The part of an info log worth reporting after a successful compile or link.
fn driver_note(log: &str) -> Option<&str> {
    let log = log.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!log.is_empty()).then_some(log)
}

fn link_program<C: ShaderBackend + ?Sized>(
    context: &C,
    vertex_source: &str,
    fragment_source: &str,
    log_limit: usize,
) -> Result<C::Program, ShaderError> {
    let vertex = compile_stage(context, Stage::Vertex, vertex_source, log_limit)?;
    let _delete_vertex = CallOnDrop(|| context.delete_shader(vertex));

    let fragment = compile_stage(context, Stage::Fragment, fragment_source, log_limit)?;
    let _delete_fragment = CallOnDrop(|| context.delete_shader(fragment));

    let program = context.create_program().map_err(ShaderError::backend)?;
    let delete_program = CallOnDrop(|| context.delete_program(program));

    context.attach_shader(program, vertex);
    context.attach_shader(program, fragment);
    let _detach_shaders = CallOnDrop(|| {
        context.detach_shader(program, vertex);
        context.detach_shader(program, fragment);
    });
    context.link_program(program);

    if !context.program_link_status(program) {
        let log = truncate_log(&context.program_info_log(program), log_limit);
        tracing::debug!("shader program failed to link: {log}");
        return Err(ShaderError::Link { log });
    }

    if let Some(note) = driver_note(&context.program_info_log(program)) {
        tracing::warn!("shader program linked with warnings: {note}");
    }

    tracing::debug!("linked shader program");
    mem::forget(delete_program);
    Ok(program)
}

fn compile_stage<C: ShaderBackend + ?Sized>(
    context: &C,
    stage: Stage,
    source: &str,
    log_limit: usize,
) -> Result<C::Shader, ShaderError> {
    let shader = context.create_shader(stage).map_err(ShaderError::backend)?;
    let delete_shader = CallOnDrop(|| context.delete_shader(shader));

    context.compile_shader(shader, source);

    if !context.shader_compile_status(shader) {
        let log = truncate_log(&context.shader_info_log(shader), log_limit);
        tracing::debug!("{stage} shader failed to compile: {log}");
        return Err(ShaderError::Compile { stage, log });
    }

    if let Some(note) = driver_note(&context.shader_info_log(shader)) {
        tracing::warn!("{stage} shader compiled with warnings: {note}");
    }

    tracing::debug!("compiled {stage} shader");
    mem::forget(delete_shader);
    Ok(shader)
}

struct CallOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}
