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

//! An in-memory driver that imitates just enough of OpenGL to exercise the program lifecycle.
//!
//! "Compiling" checks for a `main` function and balanced braces. "Linking" checks that every
//! fragment input is a vertex output, and collects `uniform` declarations from both stages.

#![allow(dead_code)]

use glsl_program::{ShaderBackend, Stage, UniformValue};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

pub const VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 view;
uniform mat4 project;
out vec2 texCoord;
void main() {
    gl_Position = project * view * model * vec4(aPos, 1.0);
    texCoord = aPos.xy;
}
";

pub const FRAGMENT: &str = "#version 330 core
in vec2 texCoord;
out vec4 FragColor;
uniform vec4 ourColor;
uniform vec2 ourGB;
uniform sampler2D texture1;
uniform bool useTexture;
uniform float mixValue;
void main() {
    FragColor = ourColor;
}
";

/// Missing the closing brace of `main`.
pub const BROKEN_VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos, 1.0);
";

/// Reads `normal`, which the vertex shader above never writes.
pub const MISMATCHED_FRAGMENT: &str = "#version 330 core
in vec3 normal;
out vec4 FragColor;
void main() {
    FragColor = vec4(normal, 1.0);
}
";

#[derive(Debug)]
pub struct FakeError(&'static str);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FakeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeLocation {
    program: u32,
    index: usize,
}

#[derive(Debug)]
struct FakeShader {
    stage: Stage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
    floats: HashMap<usize, Vec<f32>>,
    ints: HashMap<usize, Vec<i32>>,
}

#[derive(Debug, Default)]
struct DriverState {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    current: Option<u32>,
    errors: Vec<String>,
    sources: Vec<(Stage, String)>,
    allocations: usize,
    location_lookups: usize,
    fail_program_allocation: bool,
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: RefCell<DriverState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_program` call fail.
    pub fn fail_program_allocation(&self) {
        self.state.borrow_mut().fail_program_allocation = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    /// Misuse the driver noticed, like setting a uniform with no program bound.
    pub fn errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    /// Every source that was compiled, in order.
    pub fn compiled_sources(&self) -> Vec<(Stage, String)> {
        self.state.borrow().sources.clone()
    }

    /// Number of shader and program objects ever created.
    pub fn allocations(&self) -> usize {
        self.state.borrow().allocations
    }

    pub fn location_lookups(&self) -> usize {
        self.state.borrow().location_lookups
    }

    fn alloc_id(state: &mut DriverState) -> u32 {
        state.next_id += 1;
        state.allocations += 1;
        state.next_id
    }
}

/// A declaration of the form `[layout(...)] <qualifier> <type> <name>;`.
fn declarations<'a>(source: &'a str, qualifier: &str) -> Vec<&'a str> {
    source
        .lines()
        .map(str::trim)
        .map(|line| match line.strip_prefix("layout") {
            Some(rest) => rest.split_once(')').map_or(rest, |(_, decl)| decl.trim()),
            None => line,
        })
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            if tokens.next()? != qualifier {
                return None;
            }
            let _ty = tokens.next()?;
            Some(tokens.next()?.trim_end_matches(';'))
        })
        .collect()
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    for (line, text) in source.lines().enumerate() {
        for c in text.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("0:{}: error: unexpected '}}'", line + 1));
            }
        }
    }

    if depth != 0 {
        let lines = source.lines().count();
        return Err(format!("0:{lines}: error: syntax error, unexpected end of file"));
    }

    if !source.contains("void main") {
        return Err("0:1: error: function `main` is not defined".into());
    }

    Ok(())
}

impl ShaderBackend for FakeDriver {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = FakeLocation;
    type Error = FakeError;

    fn create_shader(&self, stage: Stage) -> Result<u32, FakeError> {
        let mut state = self.state.borrow_mut();
        let id = Self::alloc_id(&mut state);
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn compile_shader(&self, shader: u32, source: &str) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let stage = match state.shaders.get_mut(&shader) {
            Some(entry) => {
                entry.source = source.to_owned();
                match check_syntax(source) {
                    Ok(()) => {
                        entry.compiled = true;
                        entry.log.clear();
                    }
                    Err(log) => {
                        entry.compiled = false;
                        // Drivers pad their logs.
                        entry.log = format!("{log}\n\0");
                    }
                }
                entry.stage
            }
            None => {
                state.errors.push(format!("compile of unknown shader {shader}"));
                return;
            }
        };
        state.sources.push((stage, source.to_owned()));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_none() {
            state.errors.push(format!("double delete of shader {shader}"));
        }
    }

    fn create_program(&self) -> Result<u32, FakeError> {
        let mut state = self.state.borrow_mut();
        if state.fail_program_allocation {
            state.fail_program_allocation = false;
            return Err(FakeError("out of program objects"));
        }
        let id = Self::alloc_id(&mut state);
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.programs.get_mut(&program) {
            Some(entry) => entry.attached.push(shader),
            None => state.errors.push(format!("attach to unknown program {program}")),
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.programs.get_mut(&program) {
            Some(entry) => entry.attached.retain(|&s| s != shader),
            None => state.errors.push(format!("detach from unknown program {program}")),
        }
    }

    fn link_program(&self, program: u32) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(entry) = state.programs.get_mut(&program) else {
            state.errors.push(format!("link of unknown program {program}"));
            return;
        };

        let stage_source = |stage: Stage| {
            entry
                .attached
                .iter()
                .filter_map(|id| state.shaders.get(id))
                .find(|s| s.stage == stage && s.compiled)
                .map(|s| s.source.clone())
        };

        let (vertex, fragment) = match (stage_source(Stage::Vertex), stage_source(Stage::Fragment))
        {
            (Some(v), Some(f)) => (v, f),
            _ => {
                entry.linked = false;
                entry.log = "error: program needs a compiled vertex and fragment shader".into();
                return;
            }
        };

        let outputs = declarations(&vertex, "out");
        if let Some(missing) = declarations(&fragment, "in")
            .into_iter()
            .find(|input| !outputs.contains(input))
        {
            entry.linked = false;
            entry.log = format!(
                "error: fragment shader input `{missing}` was not written by the vertex shader\n\0"
            );
            return;
        }

        let mut uniforms: Vec<String> = Vec::new();
        for name in declarations(&vertex, "uniform")
            .into_iter()
            .chain(declarations(&fragment, "uniform"))
        {
            if !uniforms.iter().any(|u| u == name) {
                uniforms.push(name.to_owned());
            }
        }

        entry.linked = true;
        entry.log.clear();
        entry.uniforms = uniforms;
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_none() {
            state.errors.push(format!("double delete of program {program}"));
        }
        if state.current == Some(program) {
            state.current = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match program {
            Some(id) if !state.programs.get(&id).map_or(false, |p| p.linked) => {
                state.errors.push(format!("use of unlinked program {id}"));
            }
            _ => state.current = program,
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<FakeLocation> {
        let mut state = self.state.borrow_mut();
        state.location_lookups += 1;
        let index = state
            .programs
            .get(&program)?
            .uniforms
            .iter()
            .position(|u| u == name)?;
        Some(FakeLocation { program, index })
    }

    fn set_uniform(&self, location: &FakeLocation, value: UniformValue<'_>) {
        let mut state = self.state.borrow_mut();
        if state.current != Some(location.program) {
            state
                .errors
                .push("uniform location does not belong to the current program".into());
            return;
        }

        let Some(program) = state.programs.get_mut(&location.program) else {
            return;
        };

        let (floats, ints) = match value {
            UniformValue::Bool(b) => (None, Some(vec![b as i32])),
            UniformValue::Int(i) => (None, Some(vec![i])),
            UniformValue::Float(f) => (Some(vec![f]), None),
            UniformValue::Vec2(v) => (Some(v.to_vec()), None),
            UniformValue::Vec3(v) => (Some(v.to_vec()), None),
            UniformValue::Vec4(v) => (Some(v.to_vec()), None),
            UniformValue::Mat4(m) => (Some(m.to_vec()), None),
        };

        if let Some(floats) = floats {
            program.floats.insert(location.index, floats);
        }
        if let Some(ints) = ints {
            program.ints.insert(location.index, ints);
        }
    }

    fn read_uniform_f32(&self, program: u32, location: &FakeLocation, out: &mut [f32]) {
        let state = self.state.borrow();
        let Some(values) = state
            .programs
            .get(&program)
            .and_then(|p| p.floats.get(&location.index))
        else {
            return;
        };

        for (slot, value) in out.iter_mut().zip(values) {
            *slot = *value;
        }
    }

    fn read_uniform_i32(&self, program: u32, location: &FakeLocation, out: &mut [i32]) {
        let state = self.state.borrow();
        let Some(values) = state
            .programs
            .get(&program)
            .and_then(|p| p.ints.get(&location.index))
        else {
            return;
        };

        for (slot, value) in out.iter_mut().zip(values) {
            *slot = *value;
        }
    }
}
