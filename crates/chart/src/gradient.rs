use peakbars_common::Color;

/// Two-stop color ramp used to tell bars apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub start: Color,
    pub end: Color,
}

impl Default for Gradient {
    fn default() -> Self {
        Self::from_hex(0xffc0cb, 0xffa500)
    }
}

impl Gradient {
    pub fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }

    pub fn from_hex(start: u32, end: u32) -> Self {
        Self::new(Color::from_hex(start), Color::from_hex(end))
    }

    pub fn at(&self, t: f32) -> Color {
        Color::lerp(self.start, self.end, t)
    }

    /// Color of item `index` out of `count`, spreading the ramp end to end.
    /// A lone item takes the start color.
    pub fn sample(&self, index: usize, count: usize) -> Color {
        if count <= 1 {
            return self.start;
        }
        self.at(index as f32 / (count - 1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let g = Gradient::default();
        assert_eq!(g.sample(0, 7), Color::from_hex(0xffc0cb));
        assert_eq!(g.sample(6, 7), Color::from_hex(0xffa500));
        assert_eq!(g.sample(0, 7).to_hex(), 0xffc0cb);
        assert_eq!(g.sample(6, 7).to_hex(), 0xffa500);
    }

    #[test]
    fn interior_is_linear() {
        let g = Gradient::new(Color::BLACK, Color::new(1.0, 0.5, 0.0));
        let mid = g.sample(2, 5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.25).abs() < 1e-6);
        assert_eq!(mid.b, 0.0);
    }

    #[test]
    fn single_item_takes_start() {
        let g = Gradient::default();
        assert_eq!(g.sample(0, 1), g.start);
    }
}
