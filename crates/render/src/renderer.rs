use std::fmt::Write as _;

use peakbars_common::Color;

use crate::camera::OrthographicCamera;
use crate::lighting::Lighting;
use crate::renderable::{Primitive, Renderable};

/// Everything a backend needs to draw one frame.
pub struct Frame<'a> {
    pub camera: &'a OrthographicCamera,
    pub lighting: &'a Lighting,
    pub background: Color,
    /// Draw order. Items with depth testing disabled draw over everything
    /// that came before them.
    pub items: Vec<&'a dyn Renderable>,
}

impl<'a> Frame<'a> {
    pub fn new(camera: &'a OrthographicCamera, lighting: &'a Lighting, background: Color) -> Self {
        Self {
            camera,
            lighting,
            background,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: &'a dyn Renderable) {
        self.items.push(item);
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &'a dyn Renderable> + '_ {
        self.items.iter().copied().filter(|item| item.is_visible())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a frame description and produces output. It never
/// mutates chart state.
pub trait Renderer {
    type Output;

    fn render(&self, frame: &Frame<'_>) -> Self::Output;
}

/// Text dump of a frame, for CLI output, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame<'_>) -> String {
        let mut out = String::new();
        let camera = frame.camera;
        let _ = writeln!(
            out,
            "=== Frame (items={}, background=#{:06x}) ===",
            frame.items.len(),
            frame.background.to_hex()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) zoom={:.2}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.zoom
        );

        for item in frame.visible_items() {
            let p = item.transform().position;
            let (kind, count) = match item.primitive() {
                Primitive::Triangles(mesh) => ("mesh", mesh.triangle_count()),
                Primitive::Lines(lines) => ("lines", lines.segment_count()),
            };
            let _ = writeln!(
                out,
                "  [{}] {} {}={} pos=({:.2}, {:.2}, {:.2}) color=#{:06x}{}",
                item.geometry_id().short(),
                item.name(),
                kind,
                count,
                p.x,
                p.y,
                p.z,
                item.color().to_hex(),
                if item.depth_tested() { "" } else { " overlay" }
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderable::LineNode;
    use peakbars_geometry::LineSegments;

    #[test]
    fn debug_renderer_empty_frame() {
        let camera = OrthographicCamera::default();
        let lighting = Lighting::default();
        let frame = Frame::new(&camera, &lighting, Color::from_hex(0xface8d));
        let output = DebugTextRenderer::new().render(&frame);

        assert!(output.contains("items=0"));
        assert!(output.contains("background=#face8d"));
        assert!(output.contains("zoom=1.00"));
    }

    #[test]
    fn debug_renderer_lists_visible_items() {
        let camera = OrthographicCamera::default();
        let lighting = Lighting::default();
        let grid = LineNode::new("grid", LineSegments::grid(10.0, 10), Color::from_hex(0x800000));
        let mut hidden = LineNode::new("hidden", LineSegments::default(), Color::WHITE);
        hidden.visible = false;
        let mut overlay = LineNode::new("outline", LineSegments::grid(1.0, 1), Color::WHITE);
        overlay.depth_test = false;

        let mut frame = Frame::new(&camera, &lighting, Color::BLACK);
        frame.push(&grid);
        frame.push(&hidden);
        frame.push(&overlay);
        let output = DebugTextRenderer::new().render(&frame);

        assert!(output.contains("items=3"));
        assert!(output.contains("grid lines=22"));
        assert!(output.contains("color=#800000"));
        assert!(!output.contains("hidden"));
        assert!(output.contains("outline lines=4"));
        assert!(output.contains(" overlay"));
    }
}
