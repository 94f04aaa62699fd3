// THEORY:
// The `pipeline` module is the top-level, per-session API of the engine. One
// `CanvasPipeline` is one drawing session: it owns the gesture state machine and
// the drawing engine, and turns (frame, hand observation) pairs into composited
// frames.
//
// Key architectural principles:
// 1.  **Session-Scoped State**: Everything that persists between frames lives in
//     the pipeline value itself. Two pipelines never share state, so a host can
//     run as many sessions as it likes.
// 2.  **Frames In, Frames Out**: The pipeline neither captures nor displays. The
//     host hands it an `RgbImage` and gets one back inside a `FrameReport`.
// 3.  **Fixed Stage Order**: mirror, size or check the canvas, draw the debug
//     skeleton, classify, clear, stroke, composite. A frame the canvas rejects
//     aborts before any session state changes.

use crate::core_modules::config::CanvasConfig;
use crate::core_modules::drawing_engine::DrawingEngine;
use crate::core_modules::frame::mirror_horizontal_in_place;
use crate::core_modules::gesture::GestureClassifier;
use crate::core_modules::hand::HandObservation;
use crate::error::CanvasError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::gesture::{Action, Mode};
pub use crate::core_modules::palette::PaletteColor;

/// Configuration for the CanvasPipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub canvas: CanvasConfig,
    /// Flip every incoming frame left to right before anything else sees it.
    /// Landmarks must already be in the mirrored coordinate space.
    pub mirror_input: bool,
    /// Paint the hand skeleton onto the output frame.
    pub draw_skeleton: bool,
}

/// The output of the pipeline for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// The live frame with the canvas composited over it.
    pub frame: RgbImage,
    pub action: Action,
    /// Mode and color after this frame was classified.
    pub mode: Mode,
    pub color: PaletteColor,
    /// Zero-based index of this frame within the session.
    pub frame_index: u64,
}

/// One drawing session.
#[derive(Debug, Clone)]
pub struct CanvasPipeline {
    config: PipelineConfig,
    classifier: GestureClassifier,
    engine: DrawingEngine,
    frames_processed: u64,
}

impl Default for CanvasPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl CanvasPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            engine: DrawingEngine::new(config.canvas.clone()),
            classifier: GestureClassifier::new(),
            config,
            frames_processed: 0,
        }
    }

    pub fn process_frame(
        &mut self,
        mut frame: RgbImage,
        observation: &HandObservation,
    ) -> Result<FrameReport, CanvasError> {
        // Stage 1: Orientation
        if self.config.mirror_input {
            mirror_horizontal_in_place(&mut frame);
        }

        // Stage 2: Canvas sizing
        if let Err(error) = self.engine.prepare(&frame) {
            warn!(frame = self.frames_processed, %error, "frame rejected");
            return Err(error);
        }

        // Stage 3: Debug overlay
        if self.config.draw_skeleton {
            if let Some(landmarks) = &observation.landmarks {
                landmarks.draw_skeleton(&mut frame);
            }
        }

        // Stage 4: Gesture classification
        let action = self.classifier.detect(&observation.fingers);
        if action == Action::Clear {
            self.engine.clear();
        }

        // Stage 5: Stroke
        let tip = if action.moves_pen() { observation.index_tip } else { None };
        self.engine
            .draw(tip, self.classifier.current_color(), self.classifier.mode())?;

        // Stage 6: Composite
        self.engine.overlay_in_place(&mut frame)?;

        let frame_index = self.frames_processed;
        self.frames_processed += 1;
        debug!(frame = frame_index, action = action.as_str(), "frame processed");

        Ok(FrameReport {
            frame,
            action,
            mode: self.classifier.mode(),
            color: self.classifier.current_color(),
            frame_index,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn engine(&self) -> &DrawingEngine {
        &self.engine
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
