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

//! A spinning rectangle that mixes two textures.
//!
//! Pass up to two image paths to use as the textures. Without them, generated checkerboards
//! are used instead.

include!("util/setup_context.rs");
include!("util/resources.rs");

use glsl_program::glam::{Mat4, Vec3};
use glsl_program::{AppState, ShaderProgram};

use resources::{Mesh, Texture};
use util::{Backend, Demo};

use std::error::Error;
use std::rc::Rc;

#[rustfmt::skip]
const VERTICES: [f32; 32] = [
    // positions       // colors        // texture coords
     0.5,  0.5, 0.0,   1.0, 0.0, 0.0,   1.0, 1.0,
     0.5, -0.5, 0.0,   0.0, 1.0, 0.0,   1.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0,
    -0.5,  0.5, 0.0,   1.0, 1.0, 0.0,   0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Full turns per second.
const SPIN_SPEED: f32 = 0.25;

struct TexturedTransform {
    program: ShaderProgram<Backend>,
    rectangle: Mesh,
    textures: [Texture; 2],
}

impl Demo for TexturedTransform {
    const TITLE: &'static str = "textured transform";

    fn new(backend: Rc<Backend>, _state: &mut AppState) -> Result<Self, Box<dyn Error>> {
        let program = util::load_program(&backend, "textured_transform")?;
        let rectangle = Mesh::new(&backend, &VERTICES, Some(&INDICES), &[3, 3, 2])?;

        let paths = resources::texture_args();
        let textures = [
            Texture::load_or_checkerboard(&backend, paths.get(0).map(|p| p.as_path()), [200, 120, 40])?,
            Texture::load_or_checkerboard(&backend, paths.get(1).map(|p| p.as_path()), [40, 90, 200])?,
        ];

        // Sampler units only need to be set once.
        program.activate();
        program.set_int("texture1", 0);
        program.set_int("texture2", 1);

        Ok(Self {
            program,
            rectangle,
            textures,
        })
    }

    fn draw(&mut self, state: &AppState, time: f32) {
        util::clear(self.program.context().context(), state);

        for (unit, texture) in self.textures.iter().enumerate() {
            texture.bind(unit as u32);
        }

        let transform = Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0))
            * Mat4::from_scale(Vec3::splat(0.5))
            * Mat4::from_rotation_z(time * SPIN_SPEED * std::f32::consts::TAU);
        let (green, blue) = util::cycling_green_blue(time);

        self.program.activate();
        self.program.set_mat4("ourMat", &transform.to_cols_array());
        self.program.set_vec2("ourGB", green, blue);
        self.rectangle.draw();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init();
    util::run::<TexturedTransform>()
}
