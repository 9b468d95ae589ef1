//! Shared event contracts and persistence traits.
//!
//! Defines the DTOs that cross the pipeline boundary (commit and status
//! events for the presentation side) and the ledger repository trait the
//! storage layer implements, keeping the domain decoupled from sqlite.

mod bus;

pub use bus::{EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event names as constants to prevent typos.
pub mod topics {
    /// A label was committed.
    pub const COMMIT: &str = "sign:commit";
    /// Pipeline status changed (tracker availability, mode switches).
    pub const STATUS: &str = "sign:status";
}

/// Event emitted on every accepted commit.
///
/// Producers: session pipeline. Consumers: presentation, persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEvent {
    /// Committed label in text form.
    pub label: String,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: Option<i64>,
}

/// Event emitted when the pipeline's availability or mode changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub state: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// One durable commit: appended to the log, never read back into
/// classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: Uuid,
    pub label: String,
    pub ts: DateTime<Utc>,
}

impl CommitRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            ts: Utc::now(),
        }
    }
}

/// Commit count for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger storage error: {0}")]
    Storage(String),
}

/// Repository for the frequency ledger. Write-mostly from the pipeline's
/// perspective; reads exist for history views only.
pub trait LedgerRepository: Send + Sync {
    fn record_commit(&self, record: &CommitRecord) -> Result<(), LedgerError>;
    fn counts(&self) -> Result<Vec<LabelCount>, LedgerError>;
    fn recent(&self, limit: usize) -> Result<Vec<CommitRecord>, LedgerError>;
    fn clear(&self) -> Result<(), LedgerError>;
}
