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

//! Ten textured cubes viewed through a fly-through camera.
//!
//! WASD moves, the mouse looks around and the scroll wheel zooms. Pass up to two image paths
//! to use as the textures.

include!("util/setup_context.rs");
include!("util/resources.rs");

use glsl_program::glam::{Mat4, Vec3};
use glsl_program::{AppState, ShaderProgram};
use glsl_program_glow::glow::{self, HasContext};

use resources::{Mesh, Texture};
use util::{Backend, Demo};

use std::error::Error;
use std::rc::Rc;

#[rustfmt::skip]
const VERTICES: [f32; 180] = [
    // positions         // texture coords
    -0.5, -0.5, -0.5,   0.0, 0.0,
     0.5, -0.5, -0.5,   1.0, 0.0,
     0.5,  0.5, -0.5,   1.0, 1.0,
     0.5,  0.5, -0.5,   1.0, 1.0,
    -0.5,  0.5, -0.5,   0.0, 1.0,
    -0.5, -0.5, -0.5,   0.0, 0.0,

    -0.5, -0.5,  0.5,   0.0, 0.0,
     0.5, -0.5,  0.5,   1.0, 0.0,
     0.5,  0.5,  0.5,   1.0, 1.0,
     0.5,  0.5,  0.5,   1.0, 1.0,
    -0.5,  0.5,  0.5,   0.0, 1.0,
    -0.5, -0.5,  0.5,   0.0, 0.0,

    -0.5,  0.5,  0.5,   1.0, 0.0,
    -0.5,  0.5, -0.5,   1.0, 1.0,
    -0.5, -0.5, -0.5,   0.0, 1.0,
    -0.5, -0.5, -0.5,   0.0, 1.0,
    -0.5, -0.5,  0.5,   0.0, 0.0,
    -0.5,  0.5,  0.5,   1.0, 0.0,

     0.5,  0.5,  0.5,   1.0, 0.0,
     0.5,  0.5, -0.5,   1.0, 1.0,
     0.5, -0.5, -0.5,   0.0, 1.0,
     0.5, -0.5, -0.5,   0.0, 1.0,
     0.5, -0.5,  0.5,   0.0, 0.0,
     0.5,  0.5,  0.5,   1.0, 0.0,

    -0.5, -0.5, -0.5,   0.0, 1.0,
     0.5, -0.5, -0.5,   1.0, 1.0,
     0.5, -0.5,  0.5,   1.0, 0.0,
     0.5, -0.5,  0.5,   1.0, 0.0,
    -0.5, -0.5,  0.5,   0.0, 0.0,
    -0.5, -0.5, -0.5,   0.0, 1.0,

    -0.5,  0.5, -0.5,   0.0, 1.0,
     0.5,  0.5, -0.5,   1.0, 1.0,
     0.5,  0.5,  0.5,   1.0, 0.0,
     0.5,  0.5,  0.5,   1.0, 0.0,
    -0.5,  0.5,  0.5,   0.0, 0.0,
    -0.5,  0.5, -0.5,   0.0, 1.0,
];

const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

struct CameraCubes {
    program: ShaderProgram<Backend>,
    cube: Mesh,
    textures: [Texture; 2],
}

impl Demo for CameraCubes {
    const TITLE: &'static str = "camera cubes";
    const CAPTURE_MOUSE: bool = true;

    fn new(backend: Rc<Backend>, _state: &mut AppState) -> Result<Self, Box<dyn Error>> {
        // The matrices are set every frame, so cache their locations.
        let program = glsl_program::ProgramBuilder::new()
            .version_header(backend.shader_header())
            .cache_uniform_locations(true)
            .build_from_files(
                backend.clone(),
                util::shader_path("camera_cubes.vs"),
                util::shader_path("camera_cubes.fs"),
            )?;
        let cube = Mesh::new(&backend, &VERTICES, None, &[3, 2])?;

        let paths = resources::texture_args();
        let textures = [
            Texture::load_or_checkerboard(&backend, paths.get(0).map(|p| p.as_path()), [200, 120, 40])?,
            Texture::load_or_checkerboard(&backend, paths.get(1).map(|p| p.as_path()), [40, 90, 200])?,
        ];

        program.activate();
        program.set_int("texture1", 0);
        program.set_int("texture2", 1);

        unsafe {
            backend.context().enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            program,
            cube,
            textures,
        })
    }

    fn draw(&mut self, state: &AppState, time: f32) {
        util::clear(self.program.context().context(), state);

        for (unit, texture) in self.textures.iter().enumerate() {
            texture.bind(unit as u32);
        }

        let camera = &state.camera;
        let (green, blue) = util::cycling_green_blue(time);

        self.program.activate();
        self.program.set_vec2("ourGB", green, blue);
        self.program
            .set_mat4("view", &camera.view_matrix().to_cols_array());
        self.program.set_mat4(
            "project",
            &camera.projection(state.aspect_ratio()).to_cols_array(),
        );

        let axis = Vec3::new(1.0, 0.3, 0.5).normalize();
        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            let angle = (20.0 * i as f32).to_radians() * time;
            let model = Mat4::from_translation(*position) * Mat4::from_axis_angle(axis, angle);

            self.program.set_mat4("model", &model.to_cols_array());
            self.cube.draw();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init();
    util::run::<CameraCubes>()
}
