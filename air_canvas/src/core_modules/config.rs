// Drawing constants and the tunable knobs built from them.

use crate::core_modules::palette::PaletteColor;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: PaletteColor = PaletteColor::Blue;
pub const BRUSH_THICKNESS: u32 = 8;
pub const ERASER_THICKNESS: u32 = 40;
pub const SMOOTHING_FACTOR: f64 = 0.3;
/// Canvas pixels darker than this (0..255 luma) count as empty under
/// `CompositeMode::LumaThreshold`.
pub const BACKGROUND_LUMA_THRESHOLD: f64 = 50.0;

/// How the canvas decides, per pixel, whether it covers the live frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CompositeMode {
    /// Use the canvas's explicit drawn mask. Any color, however dark, shows.
    #[default]
    Mask,
    /// Treat canvas pixels below the given luma as empty.
    LumaThreshold(f64),
}

impl CompositeMode {
    pub fn legacy() -> Self {
        CompositeMode::LumaThreshold(BACKGROUND_LUMA_THRESHOLD)
    }
}

/// Configuration for the `DrawingEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Stroke width in pixels while in draw mode.
    pub brush_thickness: u32,
    /// Stroke width in pixels while in erase mode.
    pub eraser_thickness: u32,
    /// Exponential moving average weight of the newest fingertip sample.
    pub smoothing_factor: f64,
    pub composite_mode: CompositeMode,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            brush_thickness: BRUSH_THICKNESS,
            eraser_thickness: ERASER_THICKNESS,
            smoothing_factor: SMOOTHING_FACTOR,
            composite_mode: CompositeMode::default(),
        }
    }
}
