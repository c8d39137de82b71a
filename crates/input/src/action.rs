use glam::Vec2;

/// A high-level chart interaction. Hosts translate their window events into
/// actions; the scene consumes actions, never raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartAction {
    /// Pointer moved to a client pixel position.
    PointerMoved(Vec2),
    /// Orbit the camera by a pointer drag, in pixels.
    Rotate(Vec2),
    /// Slide the camera in its view plane by a pointer drag, in pixels.
    Pan(Vec2),
    /// Wheel notches; positive zooms in.
    Zoom(f32),
    /// Viewport resized to a pixel size.
    Resize(Vec2),
}

/// Mouse buttons that start a camera drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    /// Orbit.
    Primary,
    /// Pan.
    Secondary,
}
