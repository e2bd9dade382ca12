use serde::{Deserialize, Serialize};

/// 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT_BLACK: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const CORNFLOWER_BLUE: Color = Color::rgb(100, 149, 237);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend of every channel towards `other`.
    ///
    /// `factor` is clamped to [0, 1]; 0 keeps `self`, 1 yields `other`.
    pub fn faded(self, other: Color, factor: f64) -> Color {
        if factor <= 0.0 || factor.is_nan() {
            return self;
        }
        if factor >= 1.0 {
            return other;
        }

        let mix = |a: u8, b: u8| {
            let (a, b) = (a as f64, b as f64);
            (a + (b - a) * factor).round().clamp(0.0, 255.0) as u8
        };

        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Packs into `0xAARRGGBB`.
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    pub fn from_u32(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    pub fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_endpoints() {
        assert_eq!(Color::WHITE.faded(Color::BLACK, 0.0), Color::WHITE);
        assert_eq!(Color::WHITE.faded(Color::BLACK, 1.0), Color::BLACK);
        assert_eq!(Color::WHITE.faded(Color::BLACK, -3.0), Color::WHITE);
        assert_eq!(Color::WHITE.faded(Color::BLACK, 7.0), Color::BLACK);
    }

    #[test]
    fn test_faded_midpoint() {
        let mid = Color::rgb(0, 100, 200).faded(Color::rgb(100, 200, 0), 0.5);
        assert_eq!(mid, Color::rgb(50, 150, 100));
    }

    #[test]
    fn test_packing() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(color.to_u32(), 0x04010203);
        assert_eq!(Color::from_u32(color.to_u32()), color);
    }
}
