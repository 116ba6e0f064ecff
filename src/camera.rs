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

//! A first-person camera driven by Euler angles.

use glam::{Mat4, Vec3};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_SPEED: f32 = 2.5;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// A direction the camera can be moved in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    /// Along the view direction.
    Forward,

    /// Against the view direction.
    Backward,

    /// To the left of the view direction.
    Left,

    /// To the right of the view direction.
    Right,
}

/// A fly-through camera.
///
/// Angles are stored in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,

    /// Unit vector the camera looks along.
    front: Vec3,

    /// Unit vector pointing up relative to the camera.
    up: Vec3,

    /// Unit vector pointing right relative to the camera.
    right: Vec3,

    /// The world's up direction.
    world_up: Vec3,

    /// Rotation around the world up axis.
    pub yaw: f32,

    /// Rotation above or below the horizon.
    pub pitch: f32,

    /// Units per second.
    pub movement_speed: f32,

    /// Degrees per pixel of mouse movement.
    pub mouse_sensitivity: f32,

    /// Vertical field of view, in degrees.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Create a camera at `position` looking down the negative Z axis.
    pub fn new(position: Vec3) -> Self {
        Self::with_angles(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    /// Create a camera with an explicit up vector and orientation.
    pub fn with_angles(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// The direction the camera is facing.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// The camera's up vector.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The camera's right vector.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// The view matrix for the current position and orientation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// A perspective projection using the current zoom as the vertical field of view.
    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect_ratio, NEAR_PLANE, FAR_PLANE)
    }

    /// Move the camera for a key held over `delta_time` seconds.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;

        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Turn the camera by a mouse offset in pixels.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        // Past straight up or down the look-at basis flips.
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Zoom the camera by a scroll offset.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());

        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
