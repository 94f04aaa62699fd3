// THEORY:
// The palette is a fixed, enumerated set of five drawing colors. Colors are
// resolved to RGB triples at compile time rather than looked up by name, so an
// unknown color simply cannot be expressed.
//
// Channel order is RGB everywhere in this crate, because frames travel as
// `image::RgbImage`.
//
// The legacy compositor decides "drawn or empty" from canvas brightness alone,
// which makes any palette entry darker than the cutoff invisible. Pure blue sits
// at a luma of about 29 and fails a cutoff of 50; `is_visible_under` exposes that
// check so callers (and tests) can see which entries survive threshold
// compositing. The mask compositor has no such restriction.

use crate::core_modules::pixel::pixel::{Luminance, Pixel};
use image::Rgb;
use serde::{Deserialize, Serialize};

/// One of the five drawing colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaletteColor {
    Red,
    Green,
    #[default]
    Blue,
    Yellow,
    Purple,
}

impl PaletteColor {
    /// Every palette entry, in swatch order.
    pub const ALL: [PaletteColor; 5] = [
        PaletteColor::Red,
        PaletteColor::Green,
        PaletteColor::Blue,
        PaletteColor::Yellow,
        PaletteColor::Purple,
    ];

    pub const fn pixel(self) -> Pixel {
        match self {
            PaletteColor::Red => Pixel::new(255, 0, 0),
            PaletteColor::Green => Pixel::new(0, 255, 0),
            PaletteColor::Blue => Pixel::new(0, 0, 255),
            PaletteColor::Yellow => Pixel::new(255, 255, 0),
            PaletteColor::Purple => Pixel::new(255, 0, 255),
        }
    }

    pub fn rgb(self) -> Rgb<u8> {
        self.pixel().into()
    }

    pub const fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "RED",
            PaletteColor::Green => "GREEN",
            PaletteColor::Blue => "BLUE",
            PaletteColor::Yellow => "YELLOW",
            PaletteColor::Purple => "PURPLE",
        }
    }

    pub fn luminance(self) -> Luminance {
        self.pixel().luminance()
    }

    /// Whether strokes in this color survive brightness-threshold compositing.
    pub fn is_visible_under(self, threshold: Luminance) -> bool {
        !self.pixel().is_background(threshold)
    }
}

impl std::fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
