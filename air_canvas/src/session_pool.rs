// THEORY:
// A host serving several users runs one drawing session per user. The
// `SessionPool` gives each session its own tokio worker task that exclusively
// owns a `CanvasPipeline`. Frames reach the worker through a bounded channel and
// results come back on a oneshot, so frames of one session are processed
// strictly in order while different sessions proceed independently.
//
// Closing a session aborts its worker and drops its canvas on the spot. Frames
// still queued for it are discarded and their callers see `WorkerGone`.

use crate::core_modules::hand::HandObservation;
use crate::error::{CanvasError, SessionError};
use crate::pipeline::{CanvasPipeline, FrameReport, PipelineConfig};
use futures::future::join_all;
use image::RgbImage;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const SESSION_QUEUE_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

struct FrameTask {
    frame: RgbImage,
    observation: HandObservation,
    result_sender: oneshot::Sender<Result<FrameReport, CanvasError>>,
}

struct SessionHandle {
    task_sender: mpsc::Sender<FrameTask>,
    worker: JoinHandle<()>,
}

/// Runs independent drawing sessions, one worker task each.
///
/// Must be used from within a tokio runtime.
pub struct SessionPool {
    config: PipelineConfig,
    sessions: HashMap<SessionId, SessionHandle>,
    next_id: u64,
}

impl SessionPool {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn open_session(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;

        let (task_sender, mut task_receiver) = mpsc::channel::<FrameTask>(SESSION_QUEUE_DEPTH);
        let mut pipeline = CanvasPipeline::new(self.config.clone());

        let worker = tokio::spawn(async move {
            while let Some(task) = task_receiver.recv().await {
                let result = pipeline.process_frame(task.frame, &task.observation);
                // The caller may have given up waiting.
                let _ = task.result_sender.send(result);
            }
            debug!(%id, frames = pipeline.frames_processed(), "session worker finished");
        });

        self.sessions.insert(id, SessionHandle { task_sender, worker });
        info!(%id, sessions = self.sessions.len(), "session opened");
        id
    }

    /// Processes one frame in session `id` and waits for its report.
    pub async fn submit(
        &self,
        id: SessionId,
        frame: RgbImage,
        observation: HandObservation,
    ) -> Result<FrameReport, SessionError> {
        let task_sender = self
            .sessions
            .get(&id)
            .map(|handle| handle.task_sender.clone())
            .ok_or(SessionError::UnknownSession(id))?;

        let (result_sender, result_receiver) = oneshot::channel();
        let task = FrameTask {
            frame,
            observation,
            result_sender,
        };

        task_sender
            .send(task)
            .await
            .map_err(|_| SessionError::WorkerGone)?;

        let report = result_receiver.await.map_err(|_| SessionError::WorkerGone)??;
        Ok(report)
    }

    /// Submits a batch concurrently. Results come back in batch order.
    pub async fn submit_many(
        &self,
        batch: Vec<(SessionId, RgbImage, HandObservation)>,
    ) -> Vec<Result<FrameReport, SessionError>> {
        join_all(
            batch
                .into_iter()
                .map(|(id, frame, observation)| self.submit(id, frame, observation)),
        )
        .await
    }

    /// Ends a session and discards its canvas without flushing queued frames.
    pub fn close_session(&mut self, id: SessionId) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .remove(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        handle.worker.abort();
        info!(%id, sessions = self.sessions.len(), "session closed");
        Ok(())
    }

    pub fn shutdown(&mut self) {
        for (id, handle) in self.sessions.drain() {
            handle.worker.abort();
            info!(%id, "session closed");
        }
    }
}

impl Drop for SessionPool {
    fn drop(&mut self) {
        for handle in self.sessions.values() {
            handle.worker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::point::Point;
    use image::Rgb;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn black() -> RgbImage {
        RgbImage::from_pixel(64, 64, BLACK)
    }

    fn pointing(x: i32, y: i32) -> HandObservation {
        HandObservation::new(vec![false, true, false, false, false], Some(Point::new(x, y)))
    }

    #[tokio::test]
    async fn sessions_do_not_share_canvases() {
        let mut pool = SessionPool::new(PipelineConfig::default());
        let drawing = pool.open_session();
        let idle = pool.open_session();
        assert_ne!(drawing, idle);
        assert_eq!(pool.session_count(), 2);

        pool.submit(drawing, black(), pointing(10, 30)).await.unwrap();
        let drawn = pool.submit(drawing, black(), pointing(10, 30)).await.unwrap();
        assert_ne!(*drawn.frame.get_pixel(10, 30), BLACK);

        let untouched = pool.submit(idle, black(), HandObservation::absent()).await.unwrap();
        assert!(untouched.frame.pixels().all(|p| *p == BLACK));
        assert_eq!(untouched.frame_index, 0);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let pool = SessionPool::new(PipelineConfig::default());
        let result = pool.submit(SessionId(7), black(), HandObservation::absent()).await;
        assert_eq!(result, Err(SessionError::UnknownSession(SessionId(7))));
    }

    #[tokio::test]
    async fn closed_session_is_gone() {
        let mut pool = SessionPool::new(PipelineConfig::default());
        let id = pool.open_session();
        pool.submit(id, black(), HandObservation::absent()).await.unwrap();

        pool.close_session(id).unwrap();
        assert_eq!(pool.session_count(), 0);
        assert!(!pool.contains(id));
        assert_eq!(
            pool.submit(id, black(), HandObservation::absent()).await,
            Err(SessionError::UnknownSession(id))
        );
        assert_eq!(pool.close_session(id), Err(SessionError::UnknownSession(id)));

        let reopened = pool.open_session();
        assert_ne!(reopened, id);
    }

    #[tokio::test]
    async fn canvas_errors_surface_per_session() {
        let mut pool = SessionPool::new(PipelineConfig::default());
        let id = pool.open_session();
        pool.submit(id, black(), HandObservation::absent()).await.unwrap();

        let result = pool.submit(id, RgbImage::new(8, 8), HandObservation::absent()).await;
        assert_eq!(
            result,
            Err(SessionError::Canvas(CanvasError::DimensionMismatch {
                expected: (64, 64),
                actual: (8, 8)
            }))
        );

        // The session survives a rejected frame.
        let next = pool.submit(id, black(), HandObservation::absent()).await.unwrap();
        assert_eq!(next.frame_index, 1);
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let mut pool = SessionPool::new(PipelineConfig::default());
        let a = pool.open_session();
        let b = pool.open_session();

        let results = pool
            .submit_many(vec![
                (a, black(), HandObservation::absent()),
                (b, RgbImage::new(32, 16), HandObservation::absent()),
                (SessionId(99), black(), HandObservation::absent()),
            ])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().frame.dimensions(), (64, 64));
        assert_eq!(results[1].as_ref().unwrap().frame.dimensions(), (32, 16));
        assert_eq!(results[2], Err(SessionError::UnknownSession(SessionId(99))));
    }

    #[tokio::test]
    async fn shutdown_closes_everything() {
        let mut pool = SessionPool::new(PipelineConfig::default());
        pool.open_session();
        pool.open_session();
        pool.shutdown();
        assert_eq!(pool.session_count(), 0);
    }
}
