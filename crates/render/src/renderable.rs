use glam::Mat4;
use peakbars_common::{Color, Transform};
use peakbars_geometry::{GeometryId, LineSegments, MeshData};

/// Geometry a backend knows how to draw.
#[derive(Debug, Clone, Copy)]
pub enum Primitive<'a> {
    Triangles(&'a MeshData),
    Lines(&'a LineSegments),
}

impl Primitive<'_> {
    pub fn vertex_count(&self) -> usize {
        match self {
            Primitive::Triangles(mesh) => mesh.vertex_count(),
            Primitive::Lines(lines) => lines.positions.len(),
        }
    }
}

/// Anything that can be drawn: geometry, a world transform and a flat color.
///
/// `geometry_id` changes whenever the geometry is rebuilt. Backends cache GPU
/// buffers by id and treat ids missing from a frame as released.
pub trait Renderable {
    fn name(&self) -> &str;
    fn geometry_id(&self) -> GeometryId;
    fn primitive(&self) -> Primitive<'_>;
    fn transform(&self) -> &Transform;
    fn color(&self) -> Color;

    fn is_visible(&self) -> bool {
        true
    }

    fn depth_tested(&self) -> bool {
        true
    }

    fn world_matrix(&self) -> Mat4 {
        self.transform().matrix()
    }
}

/// Standalone line set, such as the floor grid.
#[derive(Debug, Clone)]
pub struct LineNode {
    pub name: String,
    pub id: GeometryId,
    pub lines: LineSegments,
    pub transform: Transform,
    pub color: Color,
    pub visible: bool,
    pub depth_test: bool,
}

impl LineNode {
    pub fn new(name: impl Into<String>, lines: LineSegments, color: Color) -> Self {
        Self {
            name: name.into(),
            id: GeometryId::new(),
            lines,
            transform: Transform::default(),
            color,
            visible: true,
            depth_test: true,
        }
    }
}

impl Renderable for LineNode {
    fn name(&self) -> &str {
        &self.name
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
        self.depth_test
    }
}
