// File: crates/dash-core/src/types.rs
// Summary: Renderer-independent color type and the trace palette.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0..=255
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Same color with alpha scaled by `opacity` (0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS color: `#rrggbb` when opaque, `rgba(r,g,b,a)` otherwise.
    pub fn css(&self) -> String {
        if self.a == 255 {
            self.hex()
        } else {
            format!("rgba({},{},{},{:.2})", self.r, self.g, self.b, self.a as f32 / 255.0)
        }
    }
}

pub const PALETTE: [Rgba; 8] = [
    Rgba::rgb(0x1f, 0x77, 0xb4),
    Rgba::rgb(0xff, 0x7f, 0x0e),
    Rgba::rgb(0x2c, 0xa0, 0x2c),
    Rgba::rgb(0xd6, 0x27, 0x28),
    Rgba::rgb(0x94, 0x67, 0xbd),
    Rgba::rgb(0x8c, 0x56, 0x4b),
    Rgba::rgb(0xe3, 0x77, 0xc2),
    Rgba::rgb(0x7f, 0x7f, 0x7f),
];

/// Palette entry for position `i`, cycling.
pub fn palette_color(i: usize) -> Rgba {
    PALETTE[i % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_css() {
        assert_eq!(Rgba::from_hex("#1f77b4"), Some(PALETTE[0]));
        assert_eq!(Rgba::from_hex("zz77b4"), None);
        assert_eq!(PALETTE[1].css(), "#ff7f0e");
        assert_eq!(Rgba::rgba(158, 202, 225, 128).css(), "rgba(158,202,225,0.50)");
        assert_eq!(palette_color(9), PALETTE[1]);
    }
}
