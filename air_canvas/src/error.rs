use crate::session_pool::SessionId;

/// Errors raised by the drawing engine when a frame and the canvas disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("Canvas has not been sized by a frame yet")]
    Uninitialized,
    #[error("Frame is {}x{} but the canvas is fixed at {}x{}", actual.0, actual.1, expected.0, expected.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Frame has no pixels")]
    EmptyFrame,
}

/// Errors raised when routing frames to session workers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),
    #[error("Session worker stopped before replying")]
    WorkerGone,
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
}
