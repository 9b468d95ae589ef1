//! Word and sentence assembly from committed labels.
//!
//! One assembler covers both granularities: in letter mode commits build
//! a word that flushes into the sentence when the hand disappears for the
//! word-gap timeout (or on an explicit space); in word mode committed
//! tokens join the sentence directly. Punctuation attaches to the previous
//! token without a separating space. Clearing is always an explicit
//! action, never automatic.

use handsign_classify::Label;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Commits are characters accumulating into a word buffer.
    Letters,
    /// Commits are whole tokens appended straight to the sentence.
    Words,
}

#[derive(Debug, Clone, Copy)]
pub struct AssemblerConfig {
    pub granularity: Granularity,
    /// No hand present for this long finalizes the current word.
    pub word_gap: Duration,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Letters,
            word_gap: Duration::from_millis(2500),
        }
    }
}

pub struct Assembler {
    config: AssemblerConfig,
    word: String,
    sentence: Vec<String>,
    last_hand_seen: Option<Instant>,
}

impl Assembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            config,
            word: String::new(),
            sentence: Vec::new(),
            last_hand_seen: None,
        }
    }

    /// Apply one committed label.
    pub fn apply(&mut self, label: Label) {
        match (label, self.config.granularity) {
            (Label::Letter(c), Granularity::Letters) => self.word.push(c),
            (Label::Letter(c), Granularity::Words) => self.push_token(c.to_string()),
            (Label::Word(w), Granularity::Letters) => {
                // A confident whole-word commit mid-spelling finalizes the
                // partial word first so the two never merge.
                self.flush();
                self.push_token(w.to_string());
            }
            (Label::Word(w), Granularity::Words) => self.push_token(w.to_string()),
            (Label::Space, _) => self.flush(),
            (Label::Delete, _) => self.delete_last(),
            (Label::Period, _) => {
                self.flush();
                self.push_token(".".to_string());
            }
        }
    }

    /// Append an externally produced token (transcript mode shares the
    /// sentence through this path).
    pub fn push_token(&mut self, token: String) {
        if !token.is_empty() {
            self.sentence.push(token);
        }
    }

    /// Record that a hand was visible this frame.
    pub fn note_hand_seen(&mut self, now: Instant) {
        self.last_hand_seen = Some(now);
    }

    /// Check the word-gap timeout. Returns true when a flush happened;
    /// fires at most once per lapse.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.word.is_empty() {
            return false;
        }
        let Some(seen) = self.last_hand_seen else {
            return false;
        };
        if now.duration_since(seen) < self.config.word_gap {
            return false;
        }
        self.last_hand_seen = None;
        self.flush();
        tracing::debug!(sentence = %self.sentence_text(), "word flushed on hand gap");
        true
    }

    /// Finalize the current word into the sentence.
    pub fn flush(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            self.sentence.push(word);
        }
    }

    /// Remove the most recently appended unit: the last buffered character
    /// when one exists, otherwise the last sentence token.
    pub fn delete_last(&mut self) {
        if self.word.pop().is_none() {
            self.sentence.pop();
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn sentence_tokens(&self) -> &[String] {
        &self.sentence
    }

    /// The sentence as display text: tokens joined by spaces, punctuation
    /// attached to its predecessor.
    pub fn sentence_text(&self) -> String {
        let mut text = String::new();
        for token in &self.sentence {
            let is_punctuation = token.chars().all(|c| c.is_ascii_punctuation());
            if !text.is_empty() && !is_punctuation {
                text.push(' ');
            }
            text.push_str(token);
        }
        text
    }

    /// Reset the word buffer only.
    pub fn clear_word(&mut self) {
        self.word.clear();
    }

    /// Reset everything.
    pub fn clear_all(&mut self) {
        self.word.clear();
        self.sentence.clear();
        self.last_hand_seen = None;
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(AssemblerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Assembler {
        Assembler::default()
    }

    fn words() -> Assembler {
        Assembler::new(AssemblerConfig {
            granularity: Granularity::Words,
            ..AssemblerConfig::default()
        })
    }

    #[test]
    fn test_letters_build_a_word() {
        let mut a = letters();
        for c in ['H', 'E', 'Y'] {
            a.apply(Label::Letter(c));
        }
        assert_eq!(a.word(), "HEY");
        assert_eq!(a.sentence_text(), "");
    }

    #[test]
    fn test_space_flushes_word() {
        let mut a = letters();
        a.apply(Label::Letter('H'));
        a.apply(Label::Letter('I'));
        a.apply(Label::Space);
        assert_eq!(a.word(), "");
        assert_eq!(a.sentence_text(), "HI");
    }

    #[test]
    fn test_gap_timeout_flushes_once() {
        let mut a = letters();
        let t0 = Instant::now();
        a.apply(Label::Letter('O'));
        a.apply(Label::Letter('K'));
        a.note_hand_seen(t0);

        assert!(!a.tick(t0 + Duration::from_millis(2000)));
        assert!(a.tick(t0 + Duration::from_millis(2600)));
        assert_eq!(a.sentence_text(), "OK");

        // Same lapse checked again: nothing left to flush.
        assert!(!a.tick(t0 + Duration::from_millis(3000)));
    }

    #[test]
    fn test_words_join_with_spaces() {
        let mut a = words();
        a.apply(Label::Word("hello"));
        a.apply(Label::Word("world"));
        assert_eq!(a.sentence_text(), "hello world");
    }

    #[test]
    fn test_period_attaches_without_space() {
        let mut a = words();
        a.apply(Label::Word("done"));
        a.apply(Label::Period);
        assert_eq!(a.sentence_text(), "done.");
    }

    #[test]
    fn test_period_in_letter_mode_flushes_first() {
        let mut a = letters();
        a.apply(Label::Letter('N'));
        a.apply(Label::Letter('O'));
        a.apply(Label::Period);
        assert_eq!(a.word(), "");
        assert_eq!(a.sentence_text(), "NO.");
    }

    #[test]
    fn test_delete_pops_live_buffer_first() {
        let mut a = letters();
        a.apply(Label::Letter('H'));
        a.apply(Label::Letter('I'));
        a.apply(Label::Space);
        a.apply(Label::Letter('X'));

        a.apply(Label::Delete);
        assert_eq!(a.word(), "");
        assert_eq!(a.sentence_text(), "HI");

        // Buffer empty now: delete reaches into the sentence.
        a.apply(Label::Delete);
        assert_eq!(a.sentence_text(), "");
    }

    #[test]
    fn test_word_commit_mid_spelling_flushes_partial() {
        let mut a = letters();
        a.apply(Label::Letter('A'));
        a.apply(Label::Word("hello"));
        assert_eq!(a.sentence_text(), "A hello");
        assert_eq!(a.word(), "");
    }

    #[test]
    fn test_letter_commit_in_word_mode_is_a_token() {
        let mut a = words();
        a.apply(Label::Word("plan"));
        a.apply(Label::Letter('B'));
        assert_eq!(a.sentence_text(), "plan B");
    }

    #[test]
    fn test_clear_word_keeps_sentence() {
        let mut a = letters();
        a.apply(Label::Letter('H'));
        a.apply(Label::Space);
        a.apply(Label::Letter('X'));
        a.clear_word();
        assert_eq!(a.word(), "");
        assert_eq!(a.sentence_text(), "H");
    }

    #[test]
    fn test_clear_all() {
        let mut a = words();
        a.apply(Label::Word("hello"));
        a.clear_all();
        assert_eq!(a.sentence_text(), "");
        assert!(a.sentence_tokens().is_empty());
    }
}
