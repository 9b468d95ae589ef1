//! Ordered geometric rules for the static fingerspelling alphabet.
//!
//! One flat list of (predicate, label) pairs, evaluated top to bottom.
//! Shapes that share an extension pattern are listed most-specific-first:
//! the refined cases (a distance or orientation check) come before the
//! pattern's catch-all, so priority is explicit and each rule can be
//! tested in isolation.
//!
//! Not covered, by design:
//! - J and Z are motion signs; a single frame cannot express them.
//! - P and Q need palm orientation the feature vector does not carry.
//! - H collapses into U: both are index+middle extended and the vector
//!   has no per-finger direction. A known misclassification source.

use crate::{ClassifyInput, ClassifyStrategy, Label};
use handsign_landmarks::FeatureVector;

/// Tips touching (thumb pad on a fingertip).
const TOUCH_DIST: f32 = 0.25;
/// Thumb pinched against the index base (T).
const PINCH_DIST: f32 = 0.3;
/// Index and middle tips crossed or pressed together (R).
const CROSSED_DIST: f32 = 0.15;
/// Index and middle tips clearly spread (V).
const SPREAD_DIST: f32 = 0.45;
/// Hooked index standing off the curled middle finger (X).
const HOOK_GAP: f32 = 0.4;
/// Thumb tip buried under the first two fingers (N).
const TUCKED_NEAR: f32 = 0.3;
/// Thumb tip buried under three fingers (M).
const TUCKED_FAR: f32 = 0.5;
/// Open curve between thumb and index (C).
const CURVE_GAP_MIN: f32 = 0.45;
const CURVE_GAP_MAX: f32 = 0.95;
/// Thumb lying alongside the index (G, versus sticking out for L).
const ALONGSIDE_DIST: f32 = 0.55;

const FIST: [bool; 5] = [false; 5];

/// One prioritized rule: first predicate to match wins.
pub struct Rule {
    pub label: Label,
    pub matches: fn(&FeatureVector) -> bool,
}

// Three and four fingers up.

/// Index, middle and ring up, pinky and thumb down.
fn is_w(f: &FeatureVector) -> bool {
    f.pattern([false, true, true, true, false])
}

/// Four fingers up, thumb folded across the palm.
fn is_b(f: &FeatureVector) -> bool {
    f.pattern([false, true, true, true, true])
}

/// Index curled onto the thumb, remaining three fingers up.
fn is_f(f: &FeatureVector) -> bool {
    f.pattern([false, false, true, true, true])
}

/// Index and middle up with the thumb raised between them.
fn is_k(f: &FeatureVector) -> bool {
    f.pattern([true, true, true, false, false])
}

// Index + middle pair. R before V before the U catch-all.

/// Index and middle crossed: tips pressed together.
fn is_r(f: &FeatureVector) -> bool {
    f.pattern([false, true, true, false, false]) && f.index_middle_tip < CROSSED_DIST
}

/// Index and middle spread apart.
fn is_v(f: &FeatureVector) -> bool {
    f.pattern([false, true, true, false, false]) && f.index_middle_tip > SPREAD_DIST
}

/// Index and middle together, upright. H shares this pattern and resolves
/// here too; see the module notes.
fn is_u(f: &FeatureVector) -> bool {
    f.pattern([false, true, true, false, false])
}

// Thumb + index pair. G's thumb lies along the index; L's sticks out.

fn is_g(f: &FeatureVector) -> bool {
    f.pattern([true, true, false, false, false]) && f.thumb_tip_index_base < ALONGSIDE_DIST
}

fn is_l(f: &FeatureVector) -> bool {
    f.pattern([true, true, false, false, false])
}

// Single extended finger.

/// Index up, other fingertips resting on the thumb.
fn is_d(f: &FeatureVector) -> bool {
    f.pattern([false, true, false, false, false])
}

/// Thumb and pinky out.
fn is_y(f: &FeatureVector) -> bool {
    f.pattern([true, false, false, false, true])
}

/// Pinky up alone.
fn is_i(f: &FeatureVector) -> bool {
    f.pattern([false, false, false, false, true])
}

// Thumb-only group: T's thumb is pinched between index and middle, so the
// tip sits at the index base; A's rests beside the fist.

fn is_t(f: &FeatureVector) -> bool {
    f.pattern([true, false, false, false, false]) && f.thumb_tip_index_base < PINCH_DIST
}

fn is_a(f: &FeatureVector) -> bool {
    f.pattern([true, false, false, false, false])
}

// Closed-fist group, narrowing from the most distinctive refinement down
// to the S catch-all.

/// Hooked index: curled enough to fail the extension test but still
/// standing off the fully-curled middle finger.
fn is_x(f: &FeatureVector) -> bool {
    f.pattern(FIST) && f.index_middle_tip > HOOK_GAP
}

/// Fingertips on the thumb with the thumb lying across the palm.
fn is_e(f: &FeatureVector) -> bool {
    f.pattern(FIST) && f.thumb_index_tip < TOUCH_DIST && f.thumb_horizontal
}

/// Fingertips meeting the thumb tip in a ring.
fn is_o(f: &FeatureVector) -> bool {
    f.pattern(FIST) && f.thumb_index_tip < TOUCH_DIST
}

/// Open curve: thumb and index held apart without touching.
fn is_c(f: &FeatureVector) -> bool {
    f.pattern(FIST)
        && f.thumb_index_tip > CURVE_GAP_MIN
        && f.thumb_index_tip < CURVE_GAP_MAX
}

/// Thumb tucked under index and middle.
fn is_n(f: &FeatureVector) -> bool {
    f.pattern(FIST) && f.thumb_middle_tip < TUCKED_NEAR
}

/// Thumb tucked under three fingers, emerging past the middle.
fn is_m(f: &FeatureVector) -> bool {
    f.pattern(FIST) && f.thumb_middle_tip < TUCKED_FAR
}

/// Plain fist, thumb wrapped over the front.
fn is_s(f: &FeatureVector) -> bool {
    f.pattern(FIST)
}

/// The prioritized rule list. Order is semantics: do not sort.
pub static RULES: &[Rule] = &[
    Rule { label: Label::Letter('W'), matches: is_w },
    Rule { label: Label::Letter('B'), matches: is_b },
    Rule { label: Label::Letter('F'), matches: is_f },
    Rule { label: Label::Letter('K'), matches: is_k },
    Rule { label: Label::Letter('R'), matches: is_r },
    Rule { label: Label::Letter('V'), matches: is_v },
    Rule { label: Label::Letter('U'), matches: is_u },
    Rule { label: Label::Letter('G'), matches: is_g },
    Rule { label: Label::Letter('L'), matches: is_l },
    Rule { label: Label::Letter('D'), matches: is_d },
    Rule { label: Label::Letter('Y'), matches: is_y },
    Rule { label: Label::Letter('I'), matches: is_i },
    Rule { label: Label::Letter('T'), matches: is_t },
    Rule { label: Label::Letter('A'), matches: is_a },
    Rule { label: Label::Letter('X'), matches: is_x },
    Rule { label: Label::Letter('E'), matches: is_e },
    Rule { label: Label::Letter('O'), matches: is_o },
    Rule { label: Label::Letter('C'), matches: is_c },
    Rule { label: Label::Letter('N'), matches: is_n },
    Rule { label: Label::Letter('M'), matches: is_m },
    Rule { label: Label::Letter('S'), matches: is_s },
];

/// Geometric rule strategy: first matching rule wins, no match is none.
pub struct GeometricRules;

impl ClassifyStrategy for GeometricRules {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn classify(&self, input: &ClassifyInput) -> Option<Label> {
        RULES
            .iter()
            .find(|rule| (rule.matches)(&input.features))
            .map(|rule| rule.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::features;
    use handsign_landmarks::FeatureVector;

    fn classify(f: &FeatureVector) -> Option<Label> {
        let input = ClassifyInput {
            features: *f,
            coarse: None,
        };
        GeometricRules.classify(&input)
    }

    fn letter_of(f: &FeatureVector) -> char {
        match classify(f) {
            Some(Label::Letter(c)) => c,
            other => panic!("expected a letter, got {other:?}"),
        }
    }

    #[test]
    fn test_extension_patterns() {
        assert_eq!(letter_of(&features([false, true, true, true, false])), 'W');
        assert_eq!(letter_of(&features([false, true, true, true, true])), 'B');
        assert_eq!(letter_of(&features([false, false, true, true, true])), 'F');
        assert_eq!(letter_of(&features([true, true, true, false, false])), 'K');
        assert_eq!(letter_of(&features([false, true, false, false, false])), 'D');
        assert_eq!(letter_of(&features([true, false, false, false, true])), 'Y');
        assert_eq!(letter_of(&features([false, false, false, false, true])), 'I');
    }

    #[test]
    fn test_index_middle_pair_resolves_by_gap() {
        let mut f = features([false, true, true, false, false]);

        f.index_middle_tip = 0.1;
        assert_eq!(letter_of(&f), 'R');

        f.index_middle_tip = 0.6;
        assert_eq!(letter_of(&f), 'V');

        f.index_middle_tip = 0.25;
        assert_eq!(letter_of(&f), 'U');
    }

    #[test]
    fn test_thumb_index_pair_resolves_by_thumb_position() {
        let mut f = features([true, true, false, false, false]);

        f.thumb_tip_index_base = 0.4;
        assert_eq!(letter_of(&f), 'G');

        f.thumb_tip_index_base = 0.9;
        assert_eq!(letter_of(&f), 'L');
    }

    #[test]
    fn test_thumb_only_resolves_t_before_a() {
        let mut f = features([true, false, false, false, false]);

        f.thumb_tip_index_base = 0.2;
        assert_eq!(letter_of(&f), 'T');

        f.thumb_tip_index_base = 0.8;
        assert_eq!(letter_of(&f), 'A');
    }

    #[test]
    fn test_fist_group_priority_chain() {
        let mut f = features([false; 5]);
        f.index_middle_tip = 0.2;

        // Hooked index wins first.
        f.index_middle_tip = 0.5;
        assert_eq!(letter_of(&f), 'X');
        f.index_middle_tip = 0.2;

        // Ring on the thumb tip: O, or E when the thumb lies flat.
        f.thumb_index_tip = 0.2;
        assert_eq!(letter_of(&f), 'O');
        f.thumb_horizontal = true;
        assert_eq!(letter_of(&f), 'E');
        f.thumb_horizontal = false;

        // Wide open curve.
        f.thumb_index_tip = 0.6;
        f.thumb_middle_tip = 0.7;
        assert_eq!(letter_of(&f), 'C');

        // Thumb tucked under the fingers.
        f.thumb_index_tip = 0.35;
        f.thumb_middle_tip = 0.25;
        assert_eq!(letter_of(&f), 'N');
        f.thumb_middle_tip = 0.45;
        assert_eq!(letter_of(&f), 'M');

        // Nothing more specific: plain fist.
        f.thumb_middle_tip = 0.9;
        assert_eq!(letter_of(&f), 'S');
    }

    #[test]
    fn test_unmatched_patterns_are_none() {
        // Middle finger alone has no letter.
        assert_eq!(classify(&features([false, false, true, false, false])), None);
        // Four fingers plus pinky-down-thumb-up has no letter.
        assert_eq!(classify(&features([true, true, true, true, false])), None);
    }

    #[test]
    fn test_rule_order_is_stable() {
        // W must outrank B's near-pattern and sits at the top of the list.
        assert_eq!(RULES[0].label, Label::Letter('W'));
        // S is the fist catch-all and must stay last.
        assert_eq!(RULES[RULES.len() - 1].label, Label::Letter('S'));
    }
}
