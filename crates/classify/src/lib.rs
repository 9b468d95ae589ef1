//! Frame label classification.
//!
//! Two strategies decide the label for a frame, tried in rank order:
//! the coarse pose reported by the tracking service (high precision, tiny
//! vocabulary) and the ordered geometric rule set over the feature vector.
//! Both are pure: identical input always yields the identical label.

mod coarse;
mod rules;

pub use coarse::CoarseOverride;
pub use rules::{GeometricRules, Rule, RULES};

use handsign_landmarks::FeatureVector;
use handsign_tracking::CoarsePose;
use std::fmt;

/// A committed symbolic token: one letter, a whole word, or a control token.
///
/// Absence of a confident classification is `Option<Label>::None`, not a
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Letter(char),
    Word(&'static str),
    /// Word boundary: force-flush the current word.
    Space,
    /// Remove the most recently appended unit.
    Delete,
    /// Sentence punctuation, attached without a preceding space.
    Period,
}

impl Label {
    /// Text form used by the ledger and event payloads.
    pub fn as_text(&self) -> String {
        match self {
            Label::Letter(c) => c.to_string(),
            Label::Word(w) => (*w).to_string(),
            Label::Space => "space".to_string(),
            Label::Delete => "delete".to_string(),
            Label::Period => ".".to_string(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Everything a strategy may look at for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput {
    pub features: FeatureVector,
    pub coarse: Option<CoarsePose>,
}

/// One way of turning a frame into a label. Strategies are ranked; the
/// first one that answers wins.
pub trait ClassifyStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, input: &ClassifyInput) -> Option<Label>;
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Minimum service confidence before a coarse pose bypasses the rules.
    pub coarse_min_score: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            coarse_min_score: 0.8,
        }
    }
}

/// Ranked strategy list: coarse override first, geometric rules second.
pub struct Classifier {
    strategies: Vec<Box<dyn ClassifyStrategy>>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            strategies: vec![
                Box::new(CoarseOverride::new(config.coarse_min_score)),
                Box::new(GeometricRules),
            ],
        }
    }

    pub fn classify(&self, input: &ClassifyInput) -> Option<Label> {
        for strategy in &self.strategies {
            if let Some(label) = strategy.classify(input) {
                tracing::trace!(strategy = strategy.name(), %label, "frame classified");
                return Some(label);
            }
        }
        None
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use handsign_landmarks::FeatureVector;

    /// Feature vector with the given extension pattern and neutral distances.
    pub fn features(extended: [bool; 5]) -> FeatureVector {
        FeatureVector {
            extended,
            thumb_index_tip: 1.0,
            thumb_middle_tip: 1.0,
            index_middle_tip: 0.25,
            thumb_tip_index_base: 1.0,
            thumb_horizontal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::features;
    use super::*;
    use handsign_tracking::{CoarsePose, PoseShape};

    #[test]
    fn test_coarse_override_wins_over_rules() {
        let classifier = Classifier::default();
        // Geometry says B (four fingers up), service says open palm.
        let input = ClassifyInput {
            features: features([false, true, true, true, true]),
            coarse: Some(CoarsePose {
                shape: PoseShape::OpenPalm,
                score: 0.95,
            }),
        };
        assert_eq!(classifier.classify(&input), Some(Label::Word("hello")));
    }

    #[test]
    fn test_low_confidence_coarse_falls_through() {
        let classifier = Classifier::default();
        let input = ClassifyInput {
            features: features([false, true, true, true, true]),
            coarse: Some(CoarsePose {
                shape: PoseShape::OpenPalm,
                score: 0.4,
            }),
        };
        assert_eq!(classifier.classify(&input), Some(Label::Letter('B')));
    }

    #[test]
    fn test_no_match_is_none() {
        let classifier = Classifier::default();
        // Thumb+index+middle+ring with pinky down matches no rule.
        let input = ClassifyInput {
            features: features([true, true, true, true, false]),
            coarse: None,
        };
        assert_eq!(classifier.classify(&input), None);
    }

    #[test]
    fn test_classifier_is_deterministic() {
        let classifier = Classifier::default();
        let input = ClassifyInput {
            features: features([false, true, true, false, false]),
            coarse: None,
        };
        let first = classifier.classify(&input);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&input), first);
        }
    }

    #[test]
    fn test_label_text_forms() {
        assert_eq!(Label::Letter('Q').as_text(), "Q");
        assert_eq!(Label::Word("hello").as_text(), "hello");
        assert_eq!(Label::Period.as_text(), ".");
        assert_eq!(Label::Space.to_string(), "space");
    }
}
