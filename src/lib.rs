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

//! Load, compile and link GLSL shader programs.
//!
//! The centerpiece of this crate is [`ShaderProgram`], which reads a vertex and a fragment
//! shader, compiles both, links them and then hands out typed setters for uniform variables.
//! The program handle is released when the [`ShaderProgram`] is dropped, and a stage that fails
//! to compile or link is reported as a [`ShaderError`] instead of producing a half-built
//! program.
//!
//! This crate never talks to a graphics API directly. Implement [`ShaderBackend`] for a type
//! that represents your context (the `glsl-program-glow` crate does this for [`glow`]), wrap
//! it in an [`Rc`], and pass it to [`ShaderProgram::from_files`].
//!
//! Graphics contexts are bound to a single thread, so this crate uses thread-unsafe
//! primitives throughout.
//!
//! The [`camera`] and [`state`] modules hold the small amount of logic a render loop needs on
//! top of that: a fly-through [`Camera`] and an [`AppState`] for routing window input to it.
//!
//! [`glow`]: https://crates.io/crates/glow
//! [`Rc`]: std::rc::Rc

#![forbid(unsafe_code, rust_2018_idioms)]

mod backend;
mod error;
mod program;
mod uniform;

pub mod camera;
pub mod state;

pub use glam;

pub use self::backend::{ShaderBackend, Stage, UniformValue};
pub use self::camera::{Camera, CameraMovement};
pub use self::error::{ShaderError, DEFAULT_INFO_LOG_LIMIT};
pub use self::program::{ProgramBuilder, ShaderProgram};
pub use self::state::{AppState, FrameClock, MouseTracker};
