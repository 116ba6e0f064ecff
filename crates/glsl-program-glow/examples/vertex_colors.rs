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
// Public License along with `glsl-program`. If not, see <https://www.gnu.org/licenses/>.

//! A triangle with a color per vertex, tinted by a uniform that changes over time.

include!("util/setup_context.rs");
include!("util/resources.rs");

use glsl_program::{AppState, ShaderProgram};

use resources::Mesh;
use util::{Backend, Demo};

use std::error::Error;
use std::rc::Rc;

#[rustfmt::skip]
const VERTICES: [f32; 18] = [
    // positions       // colors
     0.5, -0.5, 0.0,   1.0, 0.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 1.0, 0.0,
     0.0,  0.5, 0.0,   0.0, 0.0, 1.0,
];

struct VertexColors {
    program: ShaderProgram<Backend>,
    triangle: Mesh,
}

impl Demo for VertexColors {
    const TITLE: &'static str = "vertex colors";

    fn new(backend: Rc<Backend>, _state: &mut AppState) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            program: util::load_program(&backend, "vertex_colors")?,
            triangle: Mesh::new(&backend, &VERTICES, None, &[3, 3])?,
        })
    }

    fn draw(&mut self, state: &AppState, time: f32) {
        util::clear(self.program.context().context(), state);

        let (green, blue) = util::cycling_green_blue(time);
        self.program.activate();
        self.program.set_vec2("ourGB", green, blue);
        self.triangle.draw();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init();
    util::run::<VertexColors>()
}
