//! Synthetic hand geometry for tests and the replay binary.
//!
//! Coordinates are laid out so the wrist sits at the origin and the middle
//! finger base one unit above it, which keeps the normalized frame equal to
//! the raw one and makes the expected features easy to read off.

use handsign_landmarks::{index, LandmarkPoint, LANDMARK_COUNT};
use handsign_tracking::Observation;

/// Flat hand, four fingers straight up, thumb folded across the palm.
pub fn flat_hand() -> Vec<LandmarkPoint> {
    let mut points = vec![LandmarkPoint::default(); LANDMARK_COUNT];
    points[index::WRIST] = LandmarkPoint::new(0.0, 0.0, 0.0);
    points[index::MIDDLE_MCP] = LandmarkPoint::new(0.0, 1.0, 0.0);

    // Finger columns: base at the knuckle row, second-to-tip joint and tip
    // continuing away from the wrist.
    let columns = [
        (-0.3, index::INDEX_MCP, 6, index::INDEX_TIP),
        (0.0, index::MIDDLE_MCP, 10, index::MIDDLE_TIP),
        (0.3, 13, 14, 16),
        (0.6, 17, 18, 20),
    ];
    for (x, mcp, pip, tip) in columns {
        points[mcp] = LandmarkPoint::new(x, 1.0, 0.0);
        points[pip] = LandmarkPoint::new(x, 1.4, 0.0);
        points[tip] = LandmarkPoint::new(x, 2.0, 0.0);
    }

    // Thumb tucked: tip barely further out than its second joint.
    points[index::THUMB_MCP] = LandmarkPoint::new(-0.5, 0.4, 0.0);
    points[3] = LandmarkPoint::new(-0.45, 0.7, 0.0);
    points[index::THUMB_TIP] = LandmarkPoint::new(-0.3, 0.9, 0.1);

    points
}

/// Index finger straight up, everything else curled.
pub fn pointing_hand() -> Vec<LandmarkPoint> {
    let mut points = vec![LandmarkPoint::default(); LANDMARK_COUNT];
    points[index::WRIST] = LandmarkPoint::new(0.0, 0.0, 0.0);
    points[index::MIDDLE_MCP] = LandmarkPoint::new(0.0, 1.0, 0.0);

    points[index::INDEX_MCP] = LandmarkPoint::new(-0.3, 1.0, 0.0);
    points[6] = LandmarkPoint::new(-0.3, 1.4, 0.0);
    points[index::INDEX_TIP] = LandmarkPoint::new(-0.3, 2.0, 0.0);

    // Curled fingers fold back toward the palm.
    for (pip, tip) in [(10, 12), (14, 16), (18, 20)] {
        points[pip] = LandmarkPoint::new(0.1, 1.3, 0.0);
        points[tip] = LandmarkPoint::new(0.1, 0.9, 0.1);
    }

    // Thumb wrapped over the curled fingers.
    points[index::THUMB_MCP] = LandmarkPoint::new(0.5, 0.4, 0.0);
    points[3] = LandmarkPoint::new(0.45, 0.7, 0.0);
    points[index::THUMB_TIP] = LandmarkPoint::new(0.3, 0.8, 0.1);

    points
}

/// Wrap landmark points into a single-hand observation.
pub fn observation(points: Vec<LandmarkPoint>, ts_ms: i64) -> Observation {
    Observation {
        hands: vec![points],
        coarse: None,
        ts_ms,
    }
}

/// An observation with no hands detected.
pub fn empty_observation(ts_ms: i64) -> Observation {
    Observation {
        hands: Vec::new(),
        coarse: None,
        ts_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsign_classify::{ClassifyInput, Classifier, Label};
    use handsign_landmarks::{FeatureConfig, FeatureVector, HandFrame, NormalizedFrame};

    fn classify(points: Vec<LandmarkPoint>) -> Option<Label> {
        let frame = HandFrame::new(&points).unwrap();
        let normalized = NormalizedFrame::from_frame(&frame);
        let features = FeatureVector::extract(&normalized, &FeatureConfig::default());
        Classifier::default().classify(&ClassifyInput {
            features,
            coarse: None,
        })
    }

    #[test]
    fn test_flat_hand_reads_as_b() {
        assert_eq!(classify(flat_hand()), Some(Label::Letter('B')));
    }

    #[test]
    fn test_pointing_hand_reads_as_d() {
        assert_eq!(classify(pointing_hand()), Some(Label::Letter('D')));
    }
}
