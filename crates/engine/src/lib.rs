//! Vote/hold/commit engine: turns the noisy per-frame label stream into
//! rate-limited commit events.
//!
//! Per frame: the raw label lands in a sliding vote window; a majority
//! vote picks a candidate; the candidate must stay stable for the hold
//! duration before it commits; the governor enforces a cooldown between
//! commits (and, in word mode, suppresses immediate repeats).
//!
//! Time is always passed in as `Instant`, never read from a clock here,
//! so every timing path is testable without sleeping.

use handsign_classify::Label;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Vote window capacity.
    pub window: usize,
    /// Minimum buffered votes before a candidate can emerge.
    pub min_votes: usize,
    /// Fraction of the window the top label must reach.
    pub vote_threshold: f32,
    /// How long a candidate must stay stable before committing.
    pub hold: Duration,
    /// Minimum gap between two accepted commits.
    pub cooldown: Duration,
    /// Reject a commit equal to the previous committed label (word mode).
    pub suppress_repeat: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: 10,
            min_votes: 3,
            vote_threshold: 0.60,
            // Observed range across variants: 500ms to 2s hold,
            // 500 to 800ms cooldown.
            hold: Duration::from_millis(1200),
            cooldown: Duration::from_millis(500),
            suppress_repeat: false,
        }
    }
}

/// Where the engine currently is in its per-frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No labels buffered.
    Idle,
    /// Labels accumulating, no majority yet.
    Voting,
    /// A voted label is being timed toward commit.
    Holding,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decision {
    /// The voted label currently held, if any (for display).
    pub candidate: Option<Label>,
    /// The label committed this frame, if any.
    pub committed: Option<Label>,
}

#[derive(Debug, Clone, Copy)]
struct HoldState {
    label: Label,
    since: Instant,
}

#[derive(Debug, Default)]
struct CommitGovernor {
    last_commit: Option<Instant>,
    last_label: Option<Label>,
}

impl CommitGovernor {
    fn allows(&self, label: Label, now: Instant, config: &EngineConfig) -> bool {
        if let Some(last) = self.last_commit {
            if now.duration_since(last) < config.cooldown {
                return false;
            }
        }
        if config.suppress_repeat && self.last_label == Some(label) {
            return false;
        }
        true
    }

    fn record(&mut self, label: Label, now: Instant) {
        self.last_commit = Some(now);
        self.last_label = Some(label);
    }
}

pub struct CommitEngine {
    config: EngineConfig,
    window: VecDeque<Label>,
    hold: Option<HoldState>,
    governor: CommitGovernor,
}

impl CommitEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.window),
            config,
            hold: None,
            governor: CommitGovernor::default(),
        }
    }

    /// Feed one frame's label. A null label clears the window and hold
    /// state and returns the engine to idle.
    pub fn observe(&mut self, label: Option<Label>, now: Instant) -> Decision {
        let Some(label) = label else {
            self.window.clear();
            self.hold = None;
            return Decision::default();
        };

        if self.window.len() == self.config.window {
            self.window.pop_front();
        }
        self.window.push_back(label);

        let Some(candidate) = self.vote() else {
            self.hold = None;
            return Decision::default();
        };

        match self.hold {
            Some(ref mut hold) if hold.label == candidate => {
                if now.duration_since(hold.since) >= self.config.hold {
                    if self.governor.allows(candidate, now, &self.config) {
                        self.governor.record(candidate, now);
                        self.hold = None;
                        tracing::debug!(label = %candidate, "label committed");
                        return Decision {
                            candidate: Some(candidate),
                            committed: Some(candidate),
                        };
                    }
                    // Dropped, not queued: the hold timer restarts so the
                    // shape must be held through another full cycle.
                    tracing::debug!(label = %candidate, "commit rejected by governor");
                    hold.since = now;
                }
            }
            _ => {
                self.hold = Some(HoldState {
                    label: candidate,
                    since: now,
                });
            }
        }

        Decision {
            candidate: Some(candidate),
            committed: None,
        }
    }

    /// Majority vote over the window: the most frequent label wins if its
    /// fraction reaches the threshold. First-seen order breaks count ties
    /// so the result never depends on hash iteration.
    fn vote(&self) -> Option<Label> {
        if self.window.len() < self.config.min_votes {
            return None;
        }

        let mut counts: HashMap<Label, usize> = HashMap::new();
        for label in &self.window {
            *counts.entry(*label).or_insert(0) += 1;
        }

        let best = counts.values().copied().max()?;
        let winner = self
            .window
            .iter()
            .find(|label| counts[label] == best)
            .copied()?;

        let fraction = best as f32 / self.window.len() as f32;
        if fraction >= self.config.vote_threshold {
            Some(winner)
        } else {
            None
        }
    }

    /// The label currently being timed toward a commit.
    pub fn held_label(&self) -> Option<Label> {
        self.hold.map(|h| h.label)
    }

    pub fn state(&self) -> EngineState {
        if self.hold.is_some() {
            EngineState::Holding
        } else if self.window.is_empty() {
            EngineState::Idle
        } else {
            EngineState::Voting
        }
    }

    /// Drop vote window and hold state, keeping the commit governor.
    /// Used by the clear-current-word control.
    pub fn reset_hold(&mut self) {
        self.window.clear();
        self.hold = None;
    }

    /// Full reset including the governor. Used by clear-all and by mode
    /// switches.
    pub fn reset(&mut self) {
        self.reset_hold();
        self.governor = CommitGovernor::default();
    }
}

impl Default for CommitEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
