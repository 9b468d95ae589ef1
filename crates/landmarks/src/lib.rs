//! Hand landmark geometry: raw frames, wrist-origin normalization and
//! the geometric feature vector consumed by the classifier.
//!
//! A tracked hand arrives as 21 points in the tracking service's coordinate
//! space. Normalization makes every downstream threshold independent of
//! where the hand sits in the frame and how far it is from the camera.

mod features;

pub use features::{FeatureConfig, FeatureVector};

use serde::{Deserialize, Serialize};

/// Number of landmarks the tracking service reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Anatomical landmark indices, fixed by the tracking service.
pub mod index {
    pub const WRIST: usize = 0;
    /// Thumb base joint, used for thumb orientation.
    pub const THUMB_MCP: usize = 2;
    /// Base of the middle finger; its distance from the wrist sets the scale.
    pub const MIDDLE_MCP: usize = 9;
    /// Base of the index finger.
    pub const INDEX_MCP: usize = 5;

    /// Fingertips, thumb through pinky.
    pub const TIPS: [usize; 5] = [4, 8, 12, 16, 20];
    /// Second-to-tip joint per finger, thumb through pinky.
    pub const MID_JOINTS: [usize; 5] = [3, 6, 10, 14, 18];

    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
}

#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    BadLandmarkCount(usize),
}

pub type Result<T> = std::result::Result<T, LandmarkError>;

/// One tracked point in the service's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &LandmarkPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance from the coordinate origin.
    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One detected hand: exactly 21 landmarks, valid for a single video frame.
#[derive(Debug, Clone)]
pub struct HandFrame {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl HandFrame {
    /// Build a frame from the raw landmark slice.
    ///
    /// A slice of the wrong length is an input-shape violation; the caller
    /// skips the frame rather than recovering.
    pub fn new(points: &[LandmarkPoint]) -> Result<Self> {
        let points: [LandmarkPoint; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::BadLandmarkCount(points.len()))?;
        Ok(Self { points })
    }

    pub fn point(&self, idx: usize) -> LandmarkPoint {
        self.points[idx]
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }
}

/// A hand frame translated to wrist origin and scaled by the wrist-to-
/// middle-base distance, making thresholds position- and depth-invariant.
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl NormalizedFrame {
    pub fn from_frame(frame: &HandFrame) -> Self {
        let wrist = frame.point(index::WRIST);
        let mut points = [LandmarkPoint::default(); LANDMARK_COUNT];
        for (out, p) in points.iter_mut().zip(frame.points().iter()) {
            *out = LandmarkPoint::new(p.x - wrist.x, p.y - wrist.y, p.z - wrist.z);
        }

        // Degenerate hands (all points coincident) would otherwise divide
        // by ~0 and blow every threshold past its ceiling.
        let scale = points[index::MIDDLE_MCP].norm().max(1.0);
        for p in points.iter_mut() {
            p.x /= scale;
            p.y /= scale;
            p.z /= scale;
        }

        Self { points }
    }

    pub fn point(&self, idx: usize) -> LandmarkPoint {
        self.points[idx]
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }
}

impl From<&HandFrame> for NormalizedFrame {
    fn from(frame: &HandFrame) -> Self {
        Self::from_frame(frame)
    }
}
