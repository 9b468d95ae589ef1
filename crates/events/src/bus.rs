//! Trait-based event emission.
//!
//! The session emits commits and status changes through [`EventBus`] so the
//! pipeline can run headless and be exercised in tests without a UI shell.

use std::sync::{Arc, Mutex};

/// Sink for pipeline events.
pub trait EventBus: Send + Sync {
    /// Emit a JSON payload on the given topic (see [`crate::topics`]).
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Shared event bus handle.
pub type EventBusRef = Arc<dyn EventBus>;

/// An event captured by [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Event bus that records every emission, for tests and the replay binary.
#[derive(Default)]
pub struct InMemoryEventBus {
    captured: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events captured so far, in emission order.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.captured.lock().unwrap().clone()
    }

    /// Events captured on a single topic.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.captured
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.topic == topic)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.captured.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().unwrap().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.captured.lock().unwrap().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// Event bus that drops everything.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}
