/// Linear straight-alpha RGBA color.
///
/// Used for buffer clears and per-vertex colors. Values are expected in
/// linear space; the sRGB surface handles encoding on write.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from sRGB bytes (`0`–`255`), converting to linear.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0)
    }

    /// Drops alpha.
    #[inline]
    pub const fn rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_endpoints_are_exact() {
        assert_eq!(Color::from_srgb_u8(0, 0, 0), Color::BLACK);
        assert_eq!(Color::from_srgb_u8(255, 255, 255), Color::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn srgb_midtone_is_darker_in_linear() {
        let c = Color::from_srgb_u8(128, 128, 128);
        assert!(c.r > 0.2 && c.r < 0.23, "{c:?}");
    }

    #[test]
    fn converts_to_wgpu_color() {
        let w: wgpu::Color = Color::new(0.25, 0.5, 0.75, 1.0).into();
        assert_eq!((w.r, w.g, w.b, w.a), (0.25, 0.5, 0.75, 1.0));
    }
}
