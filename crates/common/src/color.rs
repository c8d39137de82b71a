use serde::{Deserialize, Serialize};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Decode a `0xRRGGBB` sRGB hex value into linear RGB.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Encode back to `0xRRGGBB` sRGB.
    pub fn to_hex(self) -> u32 {
        let [r, g, b] = self.to_srgb8();
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    /// Linear interpolation in linear space. Exact at `t = 0` and `t = 1`.
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        let mix = |x: f32, y: f32| x * (1.0 - t) + y * t;
        Color::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }

    pub fn scaled(self, k: f32) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    /// 8-bit sRGB channels, for UI toolkits that expect gamma-encoded colors.
    pub fn to_srgb8(self) -> [u8; 3] {
        let encode = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        [encode(self.r), encode(self.g), encode(self.b)]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_linear() {
        for hex in [0xffc0cb, 0xffa500, 0xface8d, 0x800000, 0xff0088] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn primaries_decode_exactly() {
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let a = Color::from_hex(0xffc0cb);
        let b = Color::from_hex(0xffa500);
        assert_eq!(Color::lerp(a, b, 0.0), a);
        assert_eq!(Color::lerp(a, b, 1.0), b);
    }

    #[test]
    fn lerp_midpoint_is_average() {
        let mid = Color::lerp(Color::BLACK, Color::WHITE, 0.5);
        assert_eq!(mid, Color::new(0.5, 0.5, 0.5));
    }
}
