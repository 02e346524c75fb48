use glam::{Mat4, Vec3};

use crate::bounds::Plane;

/// Whatever is looking at the scene this frame, reduced to what depth
/// ordering needs.
pub trait Viewer {
    fn eye_position(&self) -> Vec3;
    /// Unit vector from the eye into the scene.
    fn forward(&self) -> Vec3;
    /// Near clipping plane, normal pointing into the scene.
    fn frustum_near_plane(&self) -> Plane;
}

/// Simple look-at perspective camera, the crate's stock [`Viewer`].
///
/// `target` must differ from `eye`.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_radians: 60f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }
}

impl Viewer for Camera {
    fn eye_position(&self) -> Vec3 {
        self.eye
    }

    fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }

    fn frustum_near_plane(&self) -> Plane {
        let forward = self.forward();
        Plane::from_point_normal(self.eye + forward * self.near, forward)
    }
}
