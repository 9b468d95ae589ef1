//! Session orchestration: one struct wires the whole pipeline together.
//!
//! A [`Session`] consumes tracking observations one frame at a time and
//! drives normalization, feature extraction, classification, the commit
//! engine and the assembler in order. Commits fan out to the event bus
//! and, when configured, to the durable ledger. Persistence and event
//! failures are logged and never interrupt the frame loop.

pub mod fixtures;

use handsign_assembler::{Assembler, AssemblerConfig};
use handsign_classify::{Classifier, ClassifierConfig, ClassifyInput, Label};
use handsign_engine::{CommitEngine, EngineConfig};
use handsign_events::{topics, CommitEvent, CommitRecord, EventBusRef, LedgerRepository, StatusEvent};
use handsign_landmarks::{FeatureConfig, FeatureVector, HandFrame, NormalizedFrame};
use handsign_tracking::Observation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Tuning for every stage of the pipeline, in processing order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub features: FeatureConfig,
    pub classifier: ClassifierConfig,
    pub engine: EngineConfig,
    pub assembler: AssemblerConfig,
}

/// The two exclusive things a session can be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Frames flow through classification toward commits.
    Sign,
    /// Externally produced tokens are appended directly; frames are ignored.
    Transcript,
}

/// Mode with its per-mode state. The commit engine only exists while
/// signing, so a mode switch always starts from a clean window.
enum ActiveMode {
    Sign { engine: CommitEngine },
    Transcript,
}

/// What one frame produced, for callers that render live state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameOutcome {
    /// Raw classification of this frame, before any smoothing.
    pub label: Option<Label>,
    /// Voted candidate currently being held.
    pub candidate: Option<Label>,
    /// Label committed on this frame, if any.
    pub committed: Option<Label>,
    /// Whether the word-gap timeout finalized a word this frame.
    pub flushed: bool,
}

/// Serializable view of the session for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub held: Option<String>,
    pub word: String,
    pub sentence: String,
    pub hand_visible: bool,
}

pub struct Session {
    config: SessionConfig,
    classifier: Classifier,
    assembler: Assembler,
    mode: ActiveMode,
    bus: EventBusRef,
    ledger: Option<Arc<dyn LedgerRepository>>,
    hand_visible: bool,
}

impl Session {
    pub fn new(config: SessionConfig, bus: EventBusRef) -> Self {
        Self {
            classifier: Classifier::new(config.classifier),
            assembler: Assembler::new(config.assembler),
            mode: ActiveMode::Sign {
                engine: CommitEngine::new(config.engine),
            },
            config,
            bus,
            ledger: None,
            hand_visible: false,
        }
    }

    /// Attach a durable ledger. Without one, commits are event-only.
    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerRepository>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn mode(&self) -> SessionMode {
        match self.mode {
            ActiveMode::Sign { .. } => SessionMode::Sign,
            ActiveMode::Transcript => SessionMode::Transcript,
        }
    }

    /// Switch modes. Idempotent; entering sign mode starts a fresh
    /// commit engine so stale votes never leak across modes.
    pub fn set_mode(&mut self, mode: SessionMode) {
        if self.mode() == mode {
            return;
        }
        self.mode = match mode {
            SessionMode::Sign => ActiveMode::Sign {
                engine: CommitEngine::new(self.config.engine),
            },
            SessionMode::Transcript => ActiveMode::Transcript,
        };
        self.emit_status("mode_changed", Some(format!("{mode:?}").to_lowercase()));
    }

    /// Drive the pipeline with one polled frame. `None` means no new
    /// frame arrived; only the word-gap clock advances.
    pub fn process_frame(&mut self, observation: Option<&Observation>, now: Instant) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        if matches!(self.mode, ActiveMode::Transcript) {
            return outcome;
        }

        let mut ts_ms = None;
        if let Some(obs) = observation {
            ts_ms = Some(obs.ts_ms);
            match obs.first_hand() {
                Some(points) => {
                    if !self.hand_visible {
                        self.hand_visible = true;
                        self.emit_status("hand_visible", None);
                    }
                    // A malformed frame is skipped entirely: it must not
                    // touch the word-gap clock either.
                    match HandFrame::new(points) {
                        Ok(frame) => {
                            self.assembler.note_hand_seen(now);
                            outcome.label = self.classify_hand(&frame, obs);
                        }
                        Err(err) => {
                            warn!(%err, "discarding malformed hand frame");
                        }
                    }
                }
                None => {
                    if self.hand_visible {
                        self.hand_visible = false;
                        self.emit_status("hand_lost", None);
                    }
                }
            }
        }

        if observation.is_some() {
            if let ActiveMode::Sign { engine } = &mut self.mode {
                let decision = engine.observe(outcome.label, now);
                outcome.candidate = decision.candidate;
                outcome.committed = decision.committed;
            }
        }

        if let Some(committed) = outcome.committed {
            self.handle_commit(committed, ts_ms);
        }

        outcome.flushed = self.assembler.tick(now);
        outcome
    }

    fn classify_hand(&self, frame: &HandFrame, obs: &Observation) -> Option<Label> {
        let normalized = NormalizedFrame::from_frame(frame);
        let features = FeatureVector::extract(&normalized, &self.config.features);
        self.classifier.classify(&ClassifyInput {
            features,
            coarse: obs.coarse,
        })
    }

    /// Report a tracking-service failure. The session stays idle; the
    /// status event lets the presentation side show the outage.
    pub fn report_tracker_error(&mut self, err: &handsign_tracking::TrackerError) {
        warn!(%err, "tracking service unavailable");
        if self.hand_visible {
            self.hand_visible = false;
        }
        self.emit_status("tracker_unavailable", Some(err.to_string()));
    }

    /// Append an externally produced token. Only meaningful in transcript
    /// mode; ignored while signing.
    pub fn push_transcript(&mut self, token: impl Into<String>) {
        match self.mode {
            ActiveMode::Transcript => self.assembler.push_token(token.into()),
            ActiveMode::Sign { .. } => {
                debug!("transcript token ignored while signing");
            }
        }
    }

    /// Force-flush the buffered word into the sentence, ignoring the
    /// word-gap timeout. Any hold in flight is dropped with it so a
    /// half-held shape cannot land in the next word.
    pub fn commit_now(&mut self) {
        self.assembler.flush();
        if let ActiveMode::Sign { engine } = &mut self.mode {
            engine.reset_hold();
        }
    }

    /// Drop the in-progress word and any hold in flight.
    pub fn clear_word(&mut self) {
        self.assembler.clear_word();
        if let ActiveMode::Sign { engine } = &mut self.mode {
            engine.reset_hold();
        }
    }

    /// Wipe word, sentence and all engine state.
    pub fn clear_all(&mut self) {
        self.assembler.clear_all();
        if let ActiveMode::Sign { engine } = &mut self.mode {
            engine.reset();
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let held = match &self.mode {
            ActiveMode::Sign { engine } => engine.held_label().map(|l| l.as_text()),
            ActiveMode::Transcript => None,
        };
        SessionSnapshot {
            mode: self.mode(),
            held,
            word: self.assembler.word().to_string(),
            sentence: self.assembler.sentence_text(),
            hand_visible: self.hand_visible,
        }
    }

    pub fn sentence_text(&self) -> String {
        self.assembler.sentence_text()
    }

    fn handle_commit(&mut self, label: Label, ts_ms: Option<i64>) {
        debug!(%label, "commit accepted");
        self.assembler.apply(label);

        let event = CommitEvent {
            label: label.as_text(),
            ts_ms,
        };
        match serde_json::to_value(&event) {
            Ok(payload) => self.bus.emit(topics::COMMIT, payload),
            Err(err) => warn!(%err, "failed to serialize commit event"),
        }

        if let Some(ledger) = &self.ledger {
            if let Err(err) = ledger.record_commit(&CommitRecord::new(label.as_text())) {
                warn!(%err, "failed to record commit in ledger");
            }
        }
    }

    fn emit_status(&self, state: &str, detail: Option<String>) {
        let event = StatusEvent {
            state: state.to_string(),
            detail,
        };
        match serde_json::to_value(&event) {
            Ok(payload) => self.bus.emit(topics::STATUS, payload),
            Err(err) => warn!(%err, "failed to serialize status event"),
        }
    }
}
