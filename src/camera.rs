use crate::constants::{CAMERA_FAR, CAMERA_FOV_Y_DEG, CAMERA_NEAR};
use glam::{Mat4, Vec3, Vec4};

/// Fixed look-at camera on the +Z axis looking at the origin.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f32,
}

impl Camera {
    pub fn new(camera_z: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, camera_z),
            target: Vec3::ZERO,
            fov_y_rad: CAMERA_FOV_Y_DEG.to_radians(),
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, aspect.max(1e-3), CAMERA_NEAR, CAMERA_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }

    /// World-space ray through pixel `(sx, sy)` of a `width` x `height`
    /// backing store. Returns `(ray_origin, ray_direction)`.
    pub fn screen_ray(&self, sx: f32, sy: f32, width: f32, height: f32) -> (Vec3, Vec3) {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let ndc_x = (2.0 * sx / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * sy / height);
        let inv = self.view_proj(width / height).inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let rd = (p1 - self.eye).normalize();
        (self.eye, rd)
    }
}
