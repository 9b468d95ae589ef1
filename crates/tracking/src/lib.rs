//! Contract with the external hand-tracking service.
//!
//! The service runs its own inference loop and pushes one observation per
//! video frame. [`HandTracker`] is the poll side consumed by the session
//! loop; [`observation_channel`] bridges the service's callback style onto
//! that poll loop without ever blocking the callback.

use handsign_landmarks::LandmarkPoint;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The service failed to initialize or lost its permission grant.
    /// Recoverable: the pipeline stays idle and reports status.
    #[error("tracking service unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Whole-hand pose classes the tracking service can report directly,
/// alongside the raw landmarks. Low cardinality, high precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseShape {
    ClosedFist,
    OpenPalm,
    PointingUp,
    ThumbUp,
    ThumbDown,
    Victory,
    ILoveYou,
}

/// A coarse pose with the service's own confidence score in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoarsePose {
    pub shape: PoseShape,
    pub score: f32,
}

/// Everything the service reports for one video frame.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    /// Zero or more detected hands; only the first is classified.
    pub hands: Vec<Vec<LandmarkPoint>>,
    pub coarse: Option<CoarsePose>,
    /// Wall-clock capture time in milliseconds.
    pub ts_ms: i64,
}

impl Observation {
    pub fn first_hand(&self) -> Option<&[LandmarkPoint]> {
        self.hands.first().map(|h| h.as_slice())
    }
}

/// Poll side of the tracking collaborator.
///
/// `poll` returns `Ok(None)` when no new frame has arrived since the last
/// call; the loop treats that as a no-op iteration.
pub trait HandTracker: Send {
    fn poll(&mut self) -> Result<Option<Observation>>;
}

/// Push side handed to the tracking service's frame callback.
///
/// Never blocks: when the pipeline falls behind, new observations are
/// dropped and counted rather than stalling the capture thread.
#[derive(Clone)]
pub struct ObservationSender {
    tx: crossbeam_channel::Sender<Observation>,
    dropped: Arc<AtomicU64>,
}

impl ObservationSender {
    /// Returns true if the observation was queued, false if it was dropped.
    pub fn send(&self, observation: Observation) -> bool {
        match self.tx.try_send(observation) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                // Rate-limit: only log every 10th drop to avoid spam.
                if dropped % 10 == 1 {
                    tracing::warn!(dropped, "frame channel full, dropping observations");
                }
                false
            }
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => {
                tracing::debug!("frame channel closed");
                false
            }
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Channel-backed [`HandTracker`] fed by an [`ObservationSender`].
pub struct ChannelTracker {
    rx: crossbeam_channel::Receiver<Observation>,
}

impl HandTracker for ChannelTracker {
    fn poll(&mut self) -> Result<Option<Observation>> {
        match self.rx.try_recv() {
            Ok(observation) => Ok(Some(observation)),
            Err(crossbeam_channel::TryRecvError::Empty) => Ok(None),
            Err(crossbeam_channel::TryRecvError::Disconnected) => Err(TrackerError::Unavailable(
                "frame source disconnected".to_string(),
            )),
        }
    }
}

/// Create a bounded observation channel pairing the service callback with
/// the session poll loop.
pub fn observation_channel(capacity: usize) -> (ObservationSender, ChannelTracker) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (
        ObservationSender {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        ChannelTracker { rx },
    )
}
