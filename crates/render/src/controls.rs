use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::OrthographicCamera;

const EPS: f32 = 1e-6;

/// Damped orbit controls for an orthographic camera.
///
/// Input handlers only accumulate deltas; `update` applies them once per frame.
/// With damping enabled each update applies `damping_factor` of the pending
/// rotation and pan, and the remainder decays geometrically, so the camera
/// keeps gliding for a few frames after input stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Pending (azimuth, polar) rotation in radians.
    spherical_delta: Vec2,
    pan_offset: Vec3,
    zoom_factor: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_zoom: 0.1,
            max_zoom: 20.0,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            zoom_factor: 1.0,
        }
    }

    /// Queue a rotation from a pointer drag of `delta` pixels.
    /// Dragging the full viewport height turns the camera once around.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let per_pixel = TAU / viewport_height * self.rotate_speed;
        self.spherical_delta.x -= delta.x * per_pixel;
        self.spherical_delta.y -= delta.y * per_pixel;
    }

    /// Queue a pan from a pointer drag of `delta` pixels, moving the target in
    /// the camera's view plane so the scene follows the pointer.
    pub fn pan(&mut self, delta: Vec2, camera: &OrthographicCamera, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        let delta = delta * self.pan_speed;
        let left = delta.x * (camera.right - camera.left) / camera.zoom / viewport.x;
        let up = delta.y * (camera.top - camera.bottom) / camera.zoom / viewport.y;
        self.pan_offset += camera.right_vector() * -left + camera.up_vector() * up;
    }

    /// Queue a zoom of `steps` wheel notches; positive zooms in.
    pub fn zoom(&mut self, steps: f32) {
        let scale = 0.95_f32.powf(self.zoom_speed);
        self.zoom_factor *= scale.powf(-steps);
    }

    /// True when no queued motion remains.
    pub fn is_settled(&self) -> bool {
        self.spherical_delta.length_squared() < EPS
            && self.pan_offset.length_squared() < EPS
            && (self.zoom_factor - 1.0).abs() < EPS
    }

    /// Apply queued motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut OrthographicCamera) -> bool {
        if self.is_settled() {
            return false;
        }
        let offset = camera.position - self.target;
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let k = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.spherical_delta.x * k;
        phi += self.spherical_delta.y * k;
        phi = phi.clamp(EPS, PI - EPS);
        self.target += self.pan_offset * k;

        let previous_zoom = camera.zoom;
        camera.zoom = (camera.zoom * self.zoom_factor).clamp(self.min_zoom, self.max_zoom);
        self.zoom_factor = 1.0;

        let orbit = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let previous_position = camera.position;
        camera.position = self.target + orbit;
        camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }

        camera.position.distance_squared(previous_position) > EPS
            || (camera.zoom - previous_zoom).abs() > EPS
    }
}
