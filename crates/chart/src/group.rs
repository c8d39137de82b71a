use glam::{Vec2, Vec3};
use peakbars_common::{Color, CountryRecord, Transform};
use peakbars_geometry::{Aabb, GeometryId, MeshData, Ray};
use peakbars_render::{OrthographicCamera, Primitive, Renderable, ndc_to_screen};

use crate::bar::build_bar;
use crate::error::BarError;

/// One country's bar: mesh, metadata, placement and tooltip anchors.
#[derive(Debug, Clone)]
pub struct CountryBar {
    pub country_name: String,
    pub peaks: Vec<f64>,
    pub transform: Transform,
    pub color: Color,
    mesh: MeshData,
    id: GeometryId,
    anchors: [Vec3; 2],
    bounds: Aabb,
}

impl CountryBar {
    pub fn from_record(record: &CountryRecord) -> Result<Self, BarError> {
        let bar = build_bar(&record.peaks)?;
        let bounds = bar.mesh.bounds();
        Ok(Self {
            country_name: record.country_name.clone(),
            peaks: record.peaks.clone(),
            transform: Transform::default(),
            color: Color::WHITE,
            mesh: bar.mesh,
            id: GeometryId::new(),
            anchors: bar.anchors,
            bounds,
        })
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn anchors(&self) -> [Vec3; 2] {
        self.anchors
    }

    /// Local-space bounds of the mesh.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn latest(&self) -> f64 {
        self.peaks.last().copied().unwrap_or_default()
    }

    /// Screen pixel positions of both anchors, written into `out`.
    ///
    /// Each anchor goes local → world → NDC, then to pixels around the
    /// viewport center `half_extent`.
    pub fn project_anchors(
        &self,
        camera: &OrthographicCamera,
        half_extent: Vec2,
        out: &mut [Vec2; 2],
    ) {
        let world = self.transform.matrix();
        let view_projection = camera.view_projection();
        for (slot, anchor) in out.iter_mut().zip(self.anchors) {
            let ndc = view_projection.project_point3(world.transform_point3(anchor));
            *slot = ndc_to_screen(ndc.truncate(), half_extent);
        }
    }

    /// World distance along `ray` to the nearest face of this bar.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let world = self.transform.matrix();
        let local_ray = ray.transformed(world.inverse());
        self.bounds.intersect_ray(&local_ray)?;
        let hit = self.mesh.raycast(&local_ray)?;
        Some(world.transform_point3(hit.point).distance(ray.origin))
    }
}

impl Renderable for CountryBar {
    fn name(&self) -> &str {
        &self.country_name
    }

    fn geometry_id(&self) -> GeometryId {
        self.id
    }

    fn primitive(&self) -> Primitive<'_> {
        Primitive::Triangles(&self.mesh)
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_camera() -> OrthographicCamera {
        let mut camera = OrthographicCamera::new(13.0, 16.0 / 9.0, 1.0, 1000.0);
        camera.position = Vec3::new(-1.0, 1.0, 0.75).normalize() * 12.0;
        camera.look_at(Vec3::new(0.0, 2.5, 0.0));
        camera
    }

    fn bar(peaks: Vec<f64>) -> CountryBar {
        CountryBar::from_record(&CountryRecord::new("Testland", peaks)).unwrap()
    }

    #[test]
    fn from_record_keeps_metadata() {
        let b = bar(vec![1.0, 2.0, 2.5]);
        assert_eq!(b.country_name, "Testland");
        assert_eq!(b.latest(), 2.5);
        assert_eq!(b.name(), "Testland");
        assert!(matches!(b.primitive(), Primitive::Triangles(_)));
    }

    #[test]
    fn from_record_rejects_short_series() {
        let err = CountryBar::from_record(&CountryRecord::new("Short", vec![1.0])).unwrap_err();
        assert_eq!(err, BarError::TooFewPeaks { len: 1 });
    }

    #[test]
    fn anchor_projection_matches_camera_projection() {
        let mut b = bar(vec![1.0, 2.0]);
        b.transform = Transform::from_position(Vec3::new(0.0, 0.0, 0.25));
        let camera = chart_camera();
        let half = Vec2::new(640.0, 360.0);

        let mut out = [Vec2::ZERO; 2];
        b.project_anchors(&camera, half, &mut out);

        for (screen, anchor) in out.iter().zip(b.anchors()) {
            let ndc = camera.project(anchor + Vec3::new(0.0, 0.0, 0.25));
            let expected = Vec2::new(ndc.x * 640.0 + 640.0, -ndc.y * 360.0 + 360.0);
            assert!(screen.abs_diff_eq(expected, 1e-3));
        }
        // The high anchor sits right of and above the low one on screen.
        assert!(out[1].x > out[0].x);
    }

    #[test]
    fn raycast_reports_world_distance() {
        let mut b = bar(vec![2.0, 2.0]);
        b.transform = Transform::from_position(Vec3::new(0.0, 0.0, -3.0));
        // Bar faces span z in [0.05, 0.15] locally, so [-2.95, -2.85] in world.
        let ray = Ray::new(Vec3::new(0.0, 1.0, 10.0), Vec3::NEG_Z);
        let distance = b.raycast(&ray).unwrap();
        assert!((distance - 12.85).abs() < 1e-4, "{distance}");
    }

    #[test]
    fn raycast_misses_above_the_peaks() {
        let b = bar(vec![1.0, 1.0]);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 10.0), Vec3::NEG_Z);
        assert!(b.raycast(&ray).is_none());
    }
}
