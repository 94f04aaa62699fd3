// THEORY:
// The `DrawingEngine` is the stateful half of the gesture-to-stroke pipeline. It
// receives at most one fingertip sample per frame and turns the sequence of
// samples into strokes on a persistent canvas, then composites that canvas over
// the live frame.
//
// Key architectural principles:
// 1.  **Lazy, Fixed Canvas**: The canvas does not exist until `prepare` sees the
//     first frame, and from then on its size never changes. A frame of any other
//     size is rejected with `CanvasError::DimensionMismatch`; the canvas and all
//     strokes on it are left intact.
// 2.  **Stroke Continuity**: Each smoothed sample is connected to the previous one
//     by a segment. A pen lift (`draw(None, ..)`) forgets both the previous point
//     and the smoothing state, so the next sample starts a new, disjoint stroke
//     instead of a line across the frame from where the last stroke ended.
// 3.  **First Sample Is a Seed**: The first sample of a stroke only records where
//     the pen is. Nothing is drawn until there is a second point to connect to.
// 4.  **Mode Decides the Brush**: Draw mode paints the chosen palette color at the
//     brush thickness. Erase mode writes background at the much wider eraser
//     thickness and clears coverage, so erased pixels stop covering the frame.

use crate::core_modules::canvas::{Brush, Canvas};
use crate::core_modules::config::CanvasConfig;
use crate::core_modules::frame::validate_frame;
use crate::core_modules::gesture::Mode;
use crate::core_modules::palette::PaletteColor;
use crate::core_modules::point::Point;
use crate::core_modules::smoothing::SmoothingFilter;
use crate::error::CanvasError;
use image::RgbImage;
use tracing::debug;

/// Owns the canvas, the smoothing filter and the stroke continuity state of one session.
#[derive(Debug, Clone)]
pub struct DrawingEngine {
    config: CanvasConfig,
    canvas: Option<Canvas>,
    smoothing: SmoothingFilter,
    /// The last smoothed point that was connected into a stroke.
    stroke_last_point: Option<Point>,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl DrawingEngine {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            smoothing: SmoothingFilter::new(config.smoothing_factor),
            config,
            canvas: None,
            stroke_last_point: None,
        }
    }

    /// Creates an engine whose canvas is already sized, skipping the lazy step.
    pub fn with_dimensions(config: CanvasConfig, width: u32, height: u32) -> Self {
        let mut engine = Self::new(config);
        engine.canvas = Some(Canvas::new(width, height));
        engine
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn stroke_last_point(&self) -> Option<Point> {
        self.stroke_last_point
    }

    pub fn is_pen_down(&self) -> bool {
        self.stroke_last_point.is_some()
    }

    /// Sizes the canvas from the first frame, or checks later frames against it.
    pub fn prepare(&mut self, frame: &RgbImage) -> Result<(), CanvasError> {
        validate_frame(frame)?;
        match &self.canvas {
            Some(canvas) => Self::check_dimensions(canvas, frame),
            None => {
                debug!(width = frame.width(), height = frame.height(), "canvas created");
                self.canvas = Some(Canvas::new(frame.width(), frame.height()));
                Ok(())
            }
        }
    }

    fn check_dimensions(canvas: &Canvas, frame: &RgbImage) -> Result<(), CanvasError> {
        if canvas.dimensions() != frame.dimensions() {
            return Err(CanvasError::DimensionMismatch {
                expected: canvas.dimensions(),
                actual: frame.dimensions(),
            });
        }
        Ok(())
    }

    /// Runs `point` through the smoothing filter.
    pub fn smooth(&mut self, point: Point) -> Point {
        self.smoothing.smooth(point)
    }

    /// Breaks stroke continuity.
    pub fn lift_pen(&mut self) {
        if self.stroke_last_point.take().is_some() {
            debug!("pen lifted");
        }
        self.smoothing.reset();
    }

    /// Feeds one fingertip sample, or a pen lift when `point` is `None`.
    pub fn draw(
        &mut self,
        point: Option<Point>,
        color: PaletteColor,
        mode: Mode,
    ) -> Result<(), CanvasError> {
        let Some(point) = point else {
            self.lift_pen();
            return Ok(());
        };
        let Some(canvas) = self.canvas.as_mut() else {
            return Err(CanvasError::Uninitialized);
        };

        let smoothed = self.smoothing.smooth(point);
        let Some(previous) = self.stroke_last_point.replace(smoothed) else {
            debug!(x = smoothed.x, y = smoothed.y, mode = mode.as_str(), "stroke started");
            return Ok(());
        };

        let brush = match mode {
            Mode::Draw => Brush::Paint {
                color: color.rgb(),
                thickness: self.config.brush_thickness,
            },
            Mode::Erase => Brush::Erase {
                thickness: self.config.eraser_thickness,
            },
        };
        canvas.stroke_segment(previous, smoothed, brush);
        Ok(())
    }

    /// Wipes every stroke. A no-op before the canvas exists.
    pub fn clear(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            debug!("canvas cleared");
            canvas.clear();
        }
    }

    /// Returns a copy of `frame` with the canvas composited over it.
    pub fn overlay(&self, frame: &RgbImage) -> Result<RgbImage, CanvasError> {
        let mut composited = frame.clone();
        self.overlay_in_place(&mut composited)?;
        Ok(composited)
    }

    pub fn overlay_in_place(&self, frame: &mut RgbImage) -> Result<(), CanvasError> {
        let canvas = self.canvas.as_ref().ok_or(CanvasError::Uninitialized)?;
        Self::check_dimensions(canvas, frame)?;
        canvas.composite_onto(frame, self.config.composite_mode);
        Ok(())
    }
}
