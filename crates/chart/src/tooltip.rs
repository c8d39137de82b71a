use glam::Vec2;

/// Room kept between a tooltip's top-left corner and the far viewport edges.
pub const TOOLTIP_MARGIN: f32 = 100.0;

/// A 2D overlay label in screen pixels, positioned by its top-left corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub position: Vec2,
    pub visible: bool,
}

impl Tooltip {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Move to `position`, clamped so the label stays inside `viewport`.
    pub fn place(&mut self, position: Vec2, viewport: Vec2) {
        self.position = clamp_to_viewport(position, viewport);
    }
}

/// Clamp each coordinate to `[0, viewport - TOOLTIP_MARGIN]`. A viewport
/// smaller than the margin pins the label to the origin.
pub fn clamp_to_viewport(position: Vec2, viewport: Vec2) -> Vec2 {
    position
        .min(viewport - Vec2::splat(TOOLTIP_MARGIN))
        .max(Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_positions_are_untouched() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(clamp_to_viewport(Vec2::new(120.0, 45.0), viewport), Vec2::new(120.0, 45.0));
    }

    #[test]
    fn positions_clamp_to_both_edges() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(clamp_to_viewport(Vec2::new(-30.0, 900.0), viewport), Vec2::new(0.0, 500.0));
        assert_eq!(clamp_to_viewport(Vec2::new(750.0, -1.0), viewport), Vec2::new(700.0, 0.0));
    }

    #[test]
    fn tiny_viewport_pins_to_origin() {
        let clamped = clamp_to_viewport(Vec2::new(40.0, 40.0), Vec2::new(80.0, 80.0));
        assert_eq!(clamped, Vec2::ZERO);
    }

    #[test]
    fn show_hide_keeps_text_and_position() {
        let mut tip = Tooltip::default();
        tip.set_text("Japan");
        tip.place(Vec2::new(10.0, 20.0), Vec2::new(800.0, 600.0));
        tip.show();
        tip.hide();
        assert!(!tip.visible);
        assert_eq!(tip.text, "Japan");
        assert_eq!(tip.position, Vec2::new(10.0, 20.0));
    }
}
