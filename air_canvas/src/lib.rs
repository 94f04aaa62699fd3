// THEORY:
// This file is the main entry point for the `air_canvas` library crate. It
// defines the public API exposed to hosts that own a camera and a hand-landmark
// detector and want strokes drawn in the air composited over their video.
//
// The primary interface is `CanvasPipeline` (one drawing session) together with
// `PipelineConfig` and `FrameReport`. Hosts that serve several users at once use
// `SessionPool`, which runs each session on its own worker task. The building
// blocks in `core_modules` stay public for hosts that want to assemble their own
// loop, but most callers never need them directly.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod session_pool;
pub mod telemetry;

pub use core_modules::gesture::{Action, Mode};
pub use core_modules::hand::{HandLandmarks, HandObservation};
pub use core_modules::palette::PaletteColor;
pub use core_modules::point::Point;
pub use error::{CanvasError, SessionError};
pub use pipeline::{CanvasPipeline, FrameReport, PipelineConfig};
pub use session_pool::{SessionId, SessionPool};
