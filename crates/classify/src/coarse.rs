//! Coarse pose override: the tracking service's own whole-hand classifier.
//!
//! When the service is confident, its answer is more precise than the
//! geometric rules, so it bypasses them entirely. The vocabulary is fixed
//! and translated once through the table below.

use crate::{ClassifyInput, ClassifyStrategy, Label};
use handsign_tracking::PoseShape;

/// Translation from service vocabulary to committed labels.
fn translate(shape: PoseShape) -> Label {
    match shape {
        PoseShape::OpenPalm => Label::Word("hello"),
        PoseShape::ClosedFist => Label::Word("yes"),
        PoseShape::ThumbUp => Label::Word("good"),
        PoseShape::ThumbDown => Label::Word("bad"),
        PoseShape::PointingUp => Label::Word("you"),
        PoseShape::ILoveYou => Label::Word("love"),
        // Victory is geometrically the letter V; keep the letter so the
        // pose stays usable while fingerspelling.
        PoseShape::Victory => Label::Letter('V'),
    }
}

pub struct CoarseOverride {
    min_score: f32,
}

impl CoarseOverride {
    pub fn new(min_score: f32) -> Self {
        Self { min_score }
    }
}

impl ClassifyStrategy for CoarseOverride {
    fn name(&self) -> &'static str {
        "coarse"
    }

    fn classify(&self, input: &ClassifyInput) -> Option<Label> {
        let pose = input.coarse?;
        if pose.score < self.min_score {
            return None;
        }
        Some(translate(pose.shape))
    }
}
