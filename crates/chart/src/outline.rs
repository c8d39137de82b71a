use peakbars_common::{Color, Transform};
use peakbars_geometry::{GeometryId, LineSegments, MeshData};
use peakbars_render::{Primitive, Renderable};

/// Crease angle in degrees above which a mesh edge is outlined.
pub const OUTLINE_THRESHOLD_DEGREES: f32 = 1.0;

/// Running count of outline geometry allocations and releases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryStats {
    pub allocated: u64,
    pub released: u64,
}

impl GeometryStats {
    /// Geometries currently alive.
    pub fn live(&self) -> u64 {
        self.allocated - self.released
    }
}

/// Edge highlight drawn over the selected bar, ignoring depth.
#[derive(Debug, Clone)]
pub struct OutlineOverlay {
    id: GeometryId,
    lines: LineSegments,
    pub transform: Transform,
    pub color: Color,
    pub visible: bool,
}

impl OutlineOverlay {
    /// Empty, hidden overlay. Counts as one allocation.
    pub fn new(color: Color, stats: &mut GeometryStats) -> Self {
        stats.allocated += 1;
        Self {
            id: GeometryId::new(),
            lines: LineSegments::default(),
            transform: Transform::default(),
            color,
            visible: false,
        }
    }

    pub fn lines(&self) -> &LineSegments {
        &self.lines
    }

    /// Replace the outline with the edges of `mesh`. The old geometry is
    /// released first and the new one gets a fresh id.
    pub fn rebuild(&mut self, mesh: &MeshData, transform: Transform, stats: &mut GeometryStats) {
        let released = self.id;
        drop(std::mem::take(&mut self.lines));
        stats.released += 1;

        self.lines = LineSegments::edges(mesh, OUTLINE_THRESHOLD_DEGREES);
        self.id = GeometryId::new();
        self.transform = transform;
        stats.allocated += 1;

        tracing::debug!(
            released = %released.short(),
            allocated = %self.id.short(),
            segments = self.lines.segment_count(),
            "outline rebuilt"
        );
    }
}

impl Renderable for OutlineOverlay {
    fn name(&self) -> &str {
        "outline"
    }

    fn geometry_id(&self) -> GeometryId {
        self.id
    }

    fn primitive(&self) -> Primitive<'_> {
        Primitive::Lines(&self.lines)
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn color(&self) -> Color {
        self.color
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn depth_tested(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{UVec3, Vec3};
    use peakbars_geometry::box_geometry;

    #[test]
    fn new_overlay_is_one_live_allocation() {
        let mut stats = GeometryStats::default();
        let overlay = OutlineOverlay::new(Color::WHITE, &mut stats);
        assert_eq!(stats, GeometryStats { allocated: 1, released: 0 });
        assert!(overlay.lines().is_empty());
        assert!(!overlay.is_visible());
        assert!(!overlay.depth_tested());
    }

    #[test]
    fn rebuild_swaps_geometry() {
        let mut stats = GeometryStats::default();
        let mut overlay = OutlineOverlay::new(Color::WHITE, &mut stats);
        let first = overlay.geometry_id();
        let mesh = box_geometry(1.0, 1.0, 1.0, UVec3::ONE).to_non_indexed();

        overlay.rebuild(&mesh, Transform::from_position(Vec3::Z), &mut stats);

        assert_ne!(overlay.geometry_id(), first);
        assert_eq!(overlay.lines().segment_count(), 12);
        assert_eq!(overlay.transform.position, Vec3::Z);
        assert_eq!(stats.live(), 1);
    }
}
