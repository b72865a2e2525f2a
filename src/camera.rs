use glam::{Mat4, Vec3};

use crate::core::LINE_HEIGHT;
use crate::types::CameraUniform;

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const NEAR: f32 = 0.25;
pub const FAR: f32 = 20.0;
pub const INITIAL_POSITION: Vec3 = Vec3::new(-1.425_041_1, 1.394_980_1, -4.028_612);

pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 0.5, -0.2);
pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 10.0;
/// Radians per dragged pixel
pub const ROTATE_SPEED: f32 = 0.005;
/// Distance factor per wheel notch
pub const ZOOM_SCALE: f32 = 0.95;

/// Perspective camera looking at a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: INITIAL_POSITION,
            target: ORBIT_TARGET,
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect,
            near: NEAR,
            far: FAR,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

/// Orbit around a fixed target: drag rotates, wheel dollies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            rotate_speed: ROTATE_SPEED,
        }
    }

    /// Point the camera at the target and pull it into the allowed distance range
    pub fn attach(&self, camera: &mut Camera) {
        camera.target = self.target;
        let offset = camera.position - self.target;
        let distance = offset.length().clamp(self.min_distance, self.max_distance);
        camera.position = self.target + offset.normalize_or(Vec3::Z) * distance;
    }

    /// Rotate by a drag of `(dx, dy)` pixels. Returns whether the camera moved.
    pub fn rotate(&self, camera: &mut Camera, dx: f32, dy: f32) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta -= dx * self.rotate_speed;
        phi = (phi - dy * self.rotate_speed).clamp(1e-4, std::f32::consts::PI - 1e-4);

        camera.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        camera.target = self.target;
        true
    }

    /// Dolly by a wheel delta in pixels; positive moves away. Returns whether the camera moved.
    pub fn zoom(&self, camera: &mut Camera, delta: f32) -> bool {
        let offset = camera.position - self.target;
        let distance = offset.length();
        let factor = ZOOM_SCALE.powf(-delta / LINE_HEIGHT);
        let next = (distance * factor).clamp(self.min_distance, self.max_distance);
        if (next - distance).abs() < 1e-5 {
            return false;
        }

        camera.position = self.target + offset.normalize_or(Vec3::Z) * next;
        true
    }

    pub fn distance(&self, camera: &Camera) -> f32 {
        (camera.position - self.target).length()
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(ORBIT_TARGET)
    }
}
