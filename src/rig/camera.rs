//! Eye cameras
//!
//! One perspective camera per eye. Orientation is stored as a quaternion so
//! head tracker samples can be copied in directly.

#![allow(dead_code)]

use glam::{Mat4, Quat, Vec3};

/// Vertical field of view for each eye, degrees
pub const EYE_FOV_DEG: f32 = 75.0;
/// Near clip plane
pub const EYE_NEAR: f32 = 1.0;
/// Far clip plane
pub const EYE_FAR: f32 = 1000.0;
/// Rig distance from the panel along +Z
pub const RIG_DISTANCE: f32 = 350.0;
/// Half the interocular distance: each eye sits this far from the rig center
pub const EYE_DISTANCE: f32 = 5.0;

/// A perspective camera for one eye
#[derive(Debug, Clone)]
pub struct EyeCamera {
    position: Vec3,
    orientation: Quat,
    aspect: f32,
    fov_y: f32,
    near: f32,
    far: f32,
}

impl EyeCamera {
    /// Camera at a fixed position with identity orientation
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            aspect,
            fov_y: EYE_FOV_DEG.to_radians(),
            near: EYE_NEAR,
            far: EYE_FAR,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Replace the orientation wholesale, as the head tracker does
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_camera_has_identity_orientation() {
        let camera = EyeCamera::new(Vec3::new(-5.0, 0.0, 350.0), 1.0);
        assert_eq!(camera.orientation(), Quat::IDENTITY);
        assert_eq!(camera.position(), Vec3::new(-5.0, 0.0, 350.0));
    }

    #[test]
    fn test_view_matrix_moves_camera_to_origin() {
        let camera = EyeCamera::new(Vec3::new(1.0, 2.0, 3.0), 1.0);
        let transformed = camera.view_matrix() * glam::Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert!(transformed.truncate().length() < 1e-5);
    }

    #[test]
    fn test_projection_is_finite() {
        let camera = EyeCamera::new(Vec3::ZERO, 16.0 / 9.0);
        let matrix = camera.view_projection();
        for value in matrix.to_cols_array() {
            assert!(value.is_finite());
        }
    }
}
