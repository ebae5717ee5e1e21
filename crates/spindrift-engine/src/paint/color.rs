/// RGBA color packed into one integer as `0xRRGGBBAA`.
///
/// The channel order in the vertex buffer is the integer's big-endian byte
/// order: `[c >> 24, c >> 16, c >> 8, c]`. Channels are written as-is; whether
/// they are premultiplied is up to the shape producer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor(0xFFFF_FFFF);
    pub const BLACK: PackedColor = PackedColor(0x0000_00FF);
    pub const TRANSPARENT: PackedColor = PackedColor(0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    /// Bytes in vertex-buffer order (R, G, B, A).
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Replaces the alpha byte with `alpha` in `[0, 1]` (clamped), keeping RGB.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).floor() as u32;
        Self((self.0 & 0xFFFF_FF00) | a)
    }
}

impl From<u32> for PackedColor {
    #[inline]
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Linear RGBA color in `[0, 1]`, used for surface clears.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<PackedColor> for Color {
    fn from(c: PackedColor) -> Self {
        let [r, g, b, a] = c.to_bytes();
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_follow_shift_order() {
        let c = PackedColor(0xf5e9_9dFF);
        assert_eq!(c.to_bytes(), [0xf5, 0xe9, 0x9d, 0xFF]);
    }

    #[test]
    fn rgba_roundtrips_through_bytes() {
        let c = PackedColor::rgba(1, 2, 3, 4);
        assert_eq!(c.0, 0x0102_0304);
        assert_eq!(c.to_bytes(), [1, 2, 3, 4]);
    }

    #[test]
    fn with_alpha_replaces_low_byte_only() {
        let c = PackedColor(0xAABB_CCFF).with_alpha(0.0);
        assert_eq!(c, PackedColor(0xAABB_CC00));
        assert_eq!(PackedColor(0xAABB_CC00).with_alpha(1.0).alpha(), 0xFF);
        assert_eq!(PackedColor(0xAABB_CC00).with_alpha(7.0).alpha(), 0xFF);
    }

    #[test]
    fn transparent_fades_in_to_black() {
        assert_eq!(PackedColor::TRANSPARENT.to_bytes(), [0, 0, 0, 0]);
        assert_eq!(PackedColor::TRANSPARENT.with_alpha(1.0), PackedColor::BLACK);
        assert_eq!(PackedColor::default(), PackedColor::TRANSPARENT);
    }

    #[test]
    fn float_color_from_packed() {
        let c: Color = PackedColor::WHITE.into();
        assert_eq!(c, Color::new(1.0, 1.0, 1.0, 1.0));
    }
}
