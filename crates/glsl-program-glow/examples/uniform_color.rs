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

//! A rectangle whose color comes from a uniform.
//!
//! The first frame is drawn in a known color and the pixel at the center of the window is
//! read back and compared against it.

include!("util/setup_context.rs");
include!("util/resources.rs");

use glsl_program::{AppState, ShaderProgram};
use glsl_program_glow::glow::{self, HasContext};

use resources::Mesh;
use util::{Backend, Demo};

use std::error::Error;
use std::rc::Rc;

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0,
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
    -0.5,  0.5, 0.0,
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

const PROBE_COLOR: [f32; 4] = [0.5, 1.0, 0.5, 1.0];

struct UniformColor {
    program: ShaderProgram<Backend>,
    rectangle: Mesh,
    probed: bool,
}

impl Demo for UniformColor {
    const TITLE: &'static str = "uniform color";

    fn new(backend: Rc<Backend>, _state: &mut AppState) -> Result<Self, Box<dyn Error>> {
        let program = util::load_program(&backend, "uniform_color")?;
        let rectangle = Mesh::new(&backend, &VERTICES, Some(&INDICES), &[3])?;

        Ok(Self {
            program,
            rectangle,
            probed: false,
        })
    }

    fn draw(&mut self, state: &AppState, time: f32) {
        let gl = self.program.context().context();
        util::clear(gl, state);

        let [r, g, b, a] = if self.probed {
            [0.0, time.sin() / 2.0 + 0.5, 0.0, 1.0]
        } else {
            PROBE_COLOR
        };

        self.program.activate();
        self.program.set_vec4("ourColor", r, g, b, a);
        self.rectangle.draw();

        if !self.probed {
            self.probed = true;
            probe_center(gl, state);
        }
    }
}

/// Read the pixel under the center of the rectangle and compare it to the probe color.
fn probe_center(gl: &glow::Context, state: &AppState) {
    let (width, height) = state.viewport;
    let mut pixel = [0u8; 4];

    unsafe {
        gl.read_pixels(
            width as i32 / 2,
            height as i32 / 2,
            1,
            1,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelPackData::Slice(&mut pixel),
        );
    }

    let expected = PROBE_COLOR.map(|c| (c * 255.0).round() as u8);
    let matches = pixel
        .iter()
        .zip(expected.iter())
        .all(|(&got, &want)| got.abs_diff(want) <= 1);

    if matches {
        tracing::info!(?pixel, "center pixel matches ourColor");
    } else {
        tracing::warn!(?pixel, ?expected, "center pixel does not match ourColor");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init();
    util::run::<UniformColor>()
}
