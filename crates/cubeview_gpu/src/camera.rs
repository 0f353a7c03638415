//! Fixed camera looking at the origin and a drag-driven model rotation.

use glam::{Mat4, Quat, Vec3};

use crate::uniform::RotationUniform;

/// Default radians of rotation per pixel of drag.
pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.01;

const FOV_Y: f32 = std::f32::consts::FRAC_PI_2;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 10.0;
const EYE: Vec3 = Vec3::new(0.0, 0.0, -4.0);

/// Combined projection * view * model matrix for a model rotated by `rotation`.
///
/// Left-handed: the camera sits at `z = -4` and looks down `+z`.
pub fn view_projection(rotation: Quat, aspect: f32) -> RotationUniform {
    let projection = Mat4::perspective_lh(FOV_Y, aspect, Z_NEAR, Z_FAR);
    let view = Mat4::look_to_lh(EYE, Vec3::Z, Vec3::Y);
    let model = Mat4::from_quat(rotation);
    RotationUniform::from_mat4(projection * view * model)
}

/// Accumulated model rotation, driven by pointer drags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub rotation: Quat,
    pub sensitivity: f32,
}

impl Orbit {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            sensitivity,
        }
    }

    /// Apply a drag of `(dx, dy)` pixels.
    ///
    /// Horizontal motion turns around Y, vertical motion around X. The new
    /// rotation is applied in world space, on top of the existing one.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        let delta = Quat::from_rotation_y(-dx * self.sensitivity)
            * Quat::from_rotation_x(-dy * self.sensitivity);
        self.rotation = (delta * self.rotation).normalize();
    }

    pub fn reset(&mut self) {
        self.rotation = Quat::IDENTITY;
    }

    pub fn uniform(&self, aspect: f32) -> RotationUniform {
        view_projection(self.rotation, aspect)
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_SENSITIVITY)
    }
}
