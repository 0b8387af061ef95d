use glam::{Mat4, Vec3};
use crate::types::CameraUniform;

pub const DEFAULT_FOVY: f32 = std::f32::consts::FRAC_PI_4;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Perspective look-at camera. The trackball reads eye/at/up from here and
/// hands back view matrices; the application owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    pub view_matrix: Mat4,
    /// Vertical field of view in radians
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            at,
            up,
            view_matrix: Mat4::look_at_rh(eye, at, up),
            fovy: DEFAULT_FOVY,
            aspect: 1.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    /// Adopt a view matrix produced by a trackball rotation. Eye and up are
    /// re-derived from it; `at` is the rotation pivot and stays put.
    pub fn set_view(&mut self, view: Mat4) {
        let camera_to_world = view.inverse();
        self.eye = camera_to_world.transform_point3(Vec3::ZERO);
        self.up = camera_to_world.transform_vector3(Vec3::Y).normalize();
        self.view_matrix = view;
    }

    /// Update aspect ratio from a viewport size; zero-sized (minimized)
    /// viewports are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.at)
    }

    pub fn forward(&self) -> Vec3 {
        (self.at - self.eye).normalize()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            eye: self.eye.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -40.0, 20.0), Vec3::ZERO, Vec3::Z)
    }
}
