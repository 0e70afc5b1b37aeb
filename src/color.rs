use eframe::egui::Color32;
use palette::{Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const GRID: Srgb<u8> = Srgb::new(0xe5, 0xe5, 0xe5);
pub const GRID_OPACITY: f32 = 0.7;
pub const MARKER_FILL: Srgb<u8> = Srgb::new(0x00, 0x77, 0xb6);
pub const TEXT: Srgb<u8> = Srgb::new(0x33, 0x33, 0x33);
pub const STATUS_TEXT: Srgb<u8> = Srgb::new(0x44, 0x44, 0x44);

/// Drop shadow under the main line: 2 px down, 3 px blur.
pub const SHADOW: Srgb<u8> = Srgb::new(0x00, 0x00, 0x00);
pub const SHADOW_OPACITY: f32 = 0.15;
pub const SHADOW_OFFSET_Y: f32 = 2.0;
pub const SHADOW_BLUR: f32 = 3.0;

/// Convert a palette colour into an egui colour.
pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Same as [`to_color32`] with an opacity in `0..=1`.
pub fn to_color32_alpha(c: Srgb<u8>, opacity: f32) -> Color32 {
    let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(c.red, c.green, c.blue, a)
}

/// `#rrggbb` for SVG attributes.
pub fn hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Two-stop horizontal gradient used for the main line and the legend swatch
// ---------------------------------------------------------------------------

/// Interpolates in gamma-encoded sRGB, the space SVG gradients use, so the
/// on-screen line and the exported file look the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub start: Srgb<u8>,
    pub end: Srgb<u8>,
}

impl Gradient {
    pub fn new(start: Srgb<u8>, end: Srgb<u8>) -> Self {
        Self { start, end }
    }

    /// Colour at `t` in `0..=1` (clamped).
    pub fn at(&self, t: f32) -> Srgb<u8> {
        let a: Srgb<f32> = self.start.into_format();
        let b: Srgb<f32> = self.end.into_format();
        a.mix(b, t.clamp(0.0, 1.0)).into_format()
    }

    pub fn color32_at(&self, t: f32) -> Color32 {
        to_color32(self.at(t))
    }
}
