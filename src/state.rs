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

//! State shared between input handling and rendering.
//!
//! Window callbacks get a `&mut AppState` instead of reaching for globals.

use crate::camera::{Camera, CameraMovement};

use glam::Vec3;

/// Measures the time between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last_frame: Option<f32>,
    delta: f32,
}

impl FrameClock {
    /// Create a clock that hasn't ticked yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a frame at `now` seconds and return the time since the last one.
    ///
    /// The first tick returns zero.
    pub fn tick(&mut self, now: f32) -> f32 {
        self.delta = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);
        self.delta
    }

    /// The delta computed by the latest tick.
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

/// Turns absolute cursor positions into offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseTracker {
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    /// Create a tracker that hasn't seen the cursor yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a cursor position and get the offset since the previous one.
    ///
    /// The first position only primes the tracker and yields `(0, 0)`. The Y offset is flipped,
    /// since window coordinates grow downwards.
    pub fn offset(&mut self, x: f32, y: f32) -> (f32, f32) {
        let (last_x, last_y) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));
        (x - last_x, last_y - y)
    }
}

/// Everything the render loop and the input handlers share.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The camera.
    pub camera: Camera,

    /// Cursor tracking.
    pub mouse: MouseTracker,

    /// Frame timing.
    pub clock: FrameClock,

    /// Current framebuffer size in pixels.
    pub viewport: (u32, u32),
}

impl AppState {
    /// Create state for a framebuffer of the given size, with the camera at `camera_position`.
    pub fn new(viewport: (u32, u32), camera_position: Vec3) -> Self {
        Self {
            camera: Camera::new(camera_position),
            mouse: MouseTracker::new(),
            clock: FrameClock::new(),
            viewport,
        }
    }

    /// Start a frame at `now` seconds. Returns the frame delta.
    pub fn begin_frame(&mut self, now: f32) -> f32 {
        self.clock.tick(now)
    }

    /// Apply a movement key that is held during this frame.
    pub fn key_held(&mut self, movement: CameraMovement) {
        self.camera.process_keyboard(movement, self.clock.delta());
    }

    /// Handle the cursor moving to `(x, y)`.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let (dx, dy) = self.mouse.offset(x, y);
        self.camera.process_mouse_movement(dx, dy, true);
    }

    /// Handle a vertical scroll.
    pub fn scrolled(&mut self, y_offset: f32) {
        self.camera.process_mouse_scroll(y_offset);
    }

    /// Handle the framebuffer changing size.
    pub fn resized(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Width over height, or `1.0` for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        match self.viewport {
            (_, 0) | (0, _) => 1.0,
            (width, height) => width as f32 / height as f32,
        }
    }
}
