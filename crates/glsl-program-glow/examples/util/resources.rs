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

// Vertex buffers and textures shared by the demos.

#[allow(unused)]
mod resources {
    use crate::util::Backend;

    use glsl_program_glow::glow::{self, HasContext};

    use std::error::Error;
    use std::path::Path;
    use std::rc::Rc;

    /// A vertex array with its buffers.
    pub(crate) struct Mesh {
        backend: Rc<Backend>,
        vao: glow::VertexArray,
        vbo: glow::Buffer,
        ebo: Option<glow::Buffer>,
        count: i32,
    }

    impl Mesh {
        /// Upload interleaved `f32` vertices.
        ///
        /// `layout` lists the component count of each attribute, in location order.
        pub(crate) fn new(
            backend: &Rc<Backend>,
            vertices: &[f32],
            indices: Option<&[u32]>,
            layout: &[i32],
        ) -> Result<Self, Box<dyn Error>> {
            let gl = backend.context();
            let stride = vertex_stride(layout)?;

            unsafe {
                let vao = gl.create_vertex_array()?;
                let vbo = gl.create_buffer()?;

                gl.bind_vertex_array(Some(vao));
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
                gl.buffer_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    bytemuck::cast_slice(vertices),
                    glow::STATIC_DRAW,
                );

                let ebo = match indices {
                    Some(indices) => {
                        let ebo = gl.create_buffer()?;
                        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                        gl.buffer_data_u8_slice(
                            glow::ELEMENT_ARRAY_BUFFER,
                            bytemuck::cast_slice(indices),
                            glow::STATIC_DRAW,
                        );
                        Some(ebo)
                    }
                    None => None,
                };

                let float_size = std::mem::size_of::<f32>() as i32;
                let mut offset = 0;
                for (location, &components) in layout.iter().enumerate() {
                    gl.vertex_attrib_pointer_f32(
                        location as u32,
                        components,
                        glow::FLOAT,
                        false,
                        stride * float_size,
                        offset * float_size,
                    );
                    gl.enable_vertex_attrib_array(location as u32);
                    offset += components;
                }

                gl.bind_vertex_array(None);
                gl.bind_buffer(glow::ARRAY_BUFFER, None);

                let count = match indices {
                    Some(indices) => indices.len() as i32,
                    None => vertices.len() as i32 / stride,
                };

                Ok(Self {
                    backend: backend.clone(),
                    vao,
                    vbo,
                    ebo,
                    count,
                })
            }
        }

        pub(crate) fn draw(&self) {
            let gl = self.backend.context();

            unsafe {
                gl.bind_vertex_array(Some(self.vao));
                if self.ebo.is_some() {
                    gl.draw_elements(glow::TRIANGLES, self.count, glow::UNSIGNED_INT, 0);
                } else {
                    gl.draw_arrays(glow::TRIANGLES, 0, self.count);
                }
            }
        }
    }

    impl Drop for Mesh {
        fn drop(&mut self) {
            let gl = self.backend.context();

            unsafe {
                gl.delete_vertex_array(self.vao);
                gl.delete_buffer(self.vbo);
                if let Some(ebo) = self.ebo {
                    gl.delete_buffer(ebo);
                }
            }
        }
    }

    /// Number of floats per vertex for an attribute layout.
    fn vertex_stride(layout: &[i32]) -> Result<i32, Box<dyn Error>> {
        if layout.is_empty() || layout.iter().any(|&components| !(1..=4).contains(&components)) {
            return Err(format!("invalid vertex layout {layout:?}").into());
        }

        Ok(layout.iter().sum())
    }

    /// A 2D RGBA texture.
    pub(crate) struct Texture {
        backend: Rc<Backend>,
        raw: glow::Texture,
    }

    impl Texture {
        /// Load a texture from `path`, or generate a checkerboard in `tint` if there is no
        /// path or the image can't be decoded.
        pub(crate) fn load_or_checkerboard(
            backend: &Rc<Backend>,
            path: Option<&Path>,
            tint: [u8; 3],
        ) -> Result<Self, Box<dyn Error>> {
            let decoded = path.and_then(|path| match image::open(path) {
                Ok(image) => {
                    tracing::info!("loaded texture {}", path.display());
                    // Texture coordinates start at the bottom row.
                    Some(image.flipv().into_rgba8())
                }
                Err(err) => {
                    tracing::warn!("failed to load texture {}: {err}", path.display());
                    None
                }
            });

            let (width, height, pixels) = match decoded {
                Some(image) => (image.width(), image.height(), image.into_raw()),
                None => {
                    let size = 64;
                    (size, size, checkerboard(size, 8, tint))
                }
            };

            Self::from_rgba(backend, width, height, &pixels)
        }

        fn from_rgba(
            backend: &Rc<Backend>,
            width: u32,
            height: u32,
            pixels: &[u8],
        ) -> Result<Self, Box<dyn Error>> {
            let gl = backend.context();

            unsafe {
                let raw = gl.create_texture()?;
                gl.bind_texture(glow::TEXTURE_2D, Some(raw));

                gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
                gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MIN_FILTER,
                    glow::LINEAR_MIPMAP_LINEAR as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MAG_FILTER,
                    glow::NEAREST as i32,
                );

                gl.tex_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    glow::RGBA8 as i32,
                    width as i32,
                    height as i32,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    Some(pixels),
                );
                gl.generate_mipmap(glow::TEXTURE_2D);
                gl.bind_texture(glow::TEXTURE_2D, None);

                Ok(Self {
                    backend: backend.clone(),
                    raw,
                })
            }
        }

        /// Bind to texture unit `unit`.
        pub(crate) fn bind(&self, unit: u32) {
            let gl = self.backend.context();

            unsafe {
                gl.active_texture(glow::TEXTURE0 + unit);
                gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
            }
        }
    }

    impl Drop for Texture {
        fn drop(&mut self) {
            unsafe {
                self.backend.context().delete_texture(self.raw);
            }
        }
    }

    /// RGBA pixels for a `size` square checkerboard with `cell` pixel cells.
    fn checkerboard(size: u32, cell: u32, tint: [u8; 3]) -> Vec<u8> {
        let [r, g, b] = tint;

        (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .flat_map(|(x, y)| {
                if (x / cell + y / cell) % 2 == 0 {
                    [r, g, b, 255]
                } else {
                    [255, 255, 255, 255]
                }
            })
            .collect()
    }

    /// Texture paths given on the command line, in order.
    pub(crate) fn texture_args() -> Vec<std::path::PathBuf> {
        std::env::args_os().skip(1).map(Into::into).collect()
    }

}
