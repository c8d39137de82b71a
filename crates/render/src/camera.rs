use glam::{Mat4, Vec2, Vec3};
use peakbars_geometry::Ray;

/// Orthographic camera aimed at a target point.
///
/// The frustum is described the way window-sized charts want it: a fixed
/// vertical `frustum_size` in world units, widened by the viewport aspect.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    pub frustum_size: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new(13.0, 16.0 / 9.0, 1.0, 1000.0)
    }
}

impl OrthographicCamera {
    pub fn new(frustum_size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            near,
            far,
            zoom: 1.0,
            frustum_size,
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        };
        camera.set_aspect(aspect);
        camera
    }

    /// Recompute the projection bounds for a new viewport aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        let half_height = self.frustum_size / 2.0;
        let half_width = self.frustum_size * aspect / 2.0;
        self.left = -half_width;
        self.right = half_width;
        self.top = half_height;
        self.bottom = -half_height;
        tracing::trace!(aspect, "camera frustum updated");
    }

    pub fn aspect(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn right_vector(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Camera-space up, orthogonal to `forward` (unlike the `up` hint).
    pub fn up_vector(&self) -> Vec3 {
        self.right_vector().cross(self.forward()).normalize()
    }

    /// Projection bounds `(left, right, bottom, top)` after applying zoom.
    pub fn zoomed_bounds(&self) -> (f32, f32, f32, f32) {
        let dx = (self.right - self.left) / (2.0 * self.zoom);
        let dy = (self.top - self.bottom) / (2.0 * self.zoom);
        let cx = (self.right + self.left) / 2.0;
        let cy = (self.top + self.bottom) / 2.0;
        (cx - dx, cx + dx, cy - dy, cy + dy)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let (left, right, bottom, top) = self.zoomed_bounds();
        Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to normalized device coordinates (x, y in [-1, 1], z in [0, 1]).
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// Picking ray through an NDC position: starts on the near plane and runs
    /// parallel to the view direction.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let origin = inverse.project_point3(ndc.extend(0.0));
        Ray::new(origin, self.forward())
    }
}

/// NDC to pixel coordinates. Y flips: screens grow downward, NDC grows upward.
pub fn ndc_to_screen(ndc: Vec2, half_extent: Vec2) -> Vec2 {
    Vec2::new(
        ndc.x * half_extent.x + half_extent.x,
        -ndc.y * half_extent.y + half_extent.y,
    )
}
