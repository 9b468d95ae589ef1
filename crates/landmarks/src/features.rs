//! Geometric features derived from a normalized hand frame.
//!
//! All distances are in normalized units where the wrist-to-middle-base
//! span is 1.0, so the thresholds below hold regardless of hand size or
//! camera distance.

use crate::{index, NormalizedFrame};
use serde::{Deserialize, Serialize};

/// Tuning for the per-finger extension test.
#[derive(Debug, Clone, Copy)]
pub struct FeatureConfig {
    /// A finger counts as extended when its tip is this many times further
    /// from the wrist than its second-to-tip joint.
    pub extension_ratio: f32,
    /// The thumb is shorter and hinges differently, so it gets its own ratio.
    pub thumb_extension_ratio: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            // Calibrated against captured fingerspelling sessions; useful
            // range is roughly 1.2 to 1.6.
            extension_ratio: 1.3,
            thumb_extension_ratio: 1.2,
        }
    }
}

/// The classifier's whole view of a hand: five extension flags, four
/// tip-to-tip distances and the thumb orientation.
///
/// Derived deterministically from a [`NormalizedFrame`]; carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Per-finger extension, thumb through pinky.
    pub extended: [bool; 5],
    pub thumb_index_tip: f32,
    pub thumb_middle_tip: f32,
    pub index_middle_tip: f32,
    pub thumb_tip_index_base: f32,
    /// Thumb tip displaced more horizontally than vertically from its base.
    pub thumb_horizontal: bool,
}

impl FeatureVector {
    pub fn extract(frame: &NormalizedFrame, config: &FeatureConfig) -> Self {
        let mut extended = [false; 5];
        for finger in 0..5 {
            let tip = frame.point(index::TIPS[finger]).norm();
            let mid = frame.point(index::MID_JOINTS[finger]).norm();
            let ratio = if finger == 0 {
                config.thumb_extension_ratio
            } else {
                config.extension_ratio
            };
            extended[finger] = tip > ratio * mid;
        }

        let thumb_tip = frame.point(index::THUMB_TIP);
        let index_tip = frame.point(index::INDEX_TIP);
        let middle_tip = frame.point(index::MIDDLE_TIP);
        let index_base = frame.point(index::INDEX_MCP);
        let thumb_base = frame.point(index::THUMB_MCP);

        Self {
            extended,
            thumb_index_tip: thumb_tip.distance(&index_tip),
            thumb_middle_tip: thumb_tip.distance(&middle_tip),
            index_middle_tip: index_tip.distance(&middle_tip),
            thumb_tip_index_base: thumb_tip.distance(&index_base),
            thumb_horizontal: (thumb_tip.x - thumb_base.x).abs()
                > (thumb_tip.y - thumb_base.y).abs(),
        }
    }

    /// Exact extension pattern match, thumb through pinky.
    pub fn pattern(&self, fingers: [bool; 5]) -> bool {
        self.extended == fingers
    }

    /// Number of extended fingers.
    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|e| **e).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandFrame, LandmarkPoint, LANDMARK_COUNT};

    /// A hand with the index finger straight up and everything else curled.
    fn pointing_hand() -> NormalizedFrame {
        let mut points = vec![LandmarkPoint::default(); LANDMARK_COUNT];
        // Palm: knuckle row roughly one unit above the wrist.
        points[index::INDEX_MCP] = LandmarkPoint::new(-0.3, 1.0, 0.0);
        points[index::MIDDLE_MCP] = LandmarkPoint::new(0.0, 1.0, 0.0);
        // Index straight: joints extend away from the wrist.
        points[6] = LandmarkPoint::new(-0.3, 1.4, 0.0);
        points[index::INDEX_TIP] = LandmarkPoint::new(-0.3, 2.0, 0.0);
        // Curled fingers: tips fold back toward the palm.
        for (mid, tip) in [(10, 12), (14, 16), (18, 20)] {
            points[mid] = LandmarkPoint::new(0.1, 1.3, 0.0);
            points[tip] = LandmarkPoint::new(0.1, 0.9, 0.1);
        }
        // Thumb curled across the palm.
        points[index::THUMB_MCP] = LandmarkPoint::new(0.5, 0.4, 0.0);
        points[3] = LandmarkPoint::new(0.45, 0.7, 0.0);
        points[index::THUMB_TIP] = LandmarkPoint::new(0.35, 0.8, 0.0);

        NormalizedFrame::from_frame(&HandFrame::new(&points).unwrap())
    }

    #[test]
    fn test_index_only_extended() {
        let features = FeatureVector::extract(&pointing_hand(), &FeatureConfig::default());
        assert_eq!(features.extended, [false, true, false, false, false]);
        assert_eq!(features.extended_count(), 1);
    }

    #[test]
    fn test_thumb_orientation_vertical() {
        let features = FeatureVector::extract(&pointing_hand(), &FeatureConfig::default());
        // Thumb tip sits almost directly above its base joint here.
        assert!(!features.thumb_horizontal);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let frame = pointing_hand();
        let config = FeatureConfig::default();
        let a = FeatureVector::extract(&frame, &config);
        let b = FeatureVector::extract(&frame, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tighter_ratio_rejects_marginal_extension() {
        let frame = pointing_hand();
        let strict = FeatureConfig {
            extension_ratio: 1.6,
            ..FeatureConfig::default()
        };
        let features = FeatureVector::extract(&frame, &strict);
        // Index tip/joint ratio is ~1.43 here, under the strict ceiling.
        assert!(!features.extended[1]);
    }
}
