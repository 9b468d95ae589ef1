//! Headless replay: feeds a scripted observation stream through the full
//! pipeline and prints the resulting sentence plus ledger counts.

use handsign_engine::EngineConfig;
use handsign_events::{EventBusRef, InMemoryEventBus, LedgerRepository};
use handsign_session::{fixtures, Session, SessionConfig};
use handsign_storage::Database;
use handsign_tracking::{observation_channel, HandTracker};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bus = Arc::new(InMemoryEventBus::new());
    let bus_ref: EventBusRef = bus.clone();
    let ledger = Arc::new(Database::open_in_memory()?);

    let config = SessionConfig {
        engine: EngineConfig {
            hold: Duration::from_millis(500),
            ..EngineConfig::default()
        },
        ..SessionConfig::default()
    };
    let mut session = Session::new(config, bus_ref).with_ledger(ledger.clone());

    let (sender, mut tracker) = observation_channel(64);

    // Script: a flat hand held for forty frames, then the hand leaves and
    // the word-gap timeout finalizes the word.
    for i in 0..40 {
        sender.send(fixtures::observation(fixtures::flat_hand(), 16 * i));
    }
    sender.send(fixtures::empty_observation(16 * 40));

    let start = Instant::now();
    let mut frame = 0u64;
    loop {
        let observation = match tracker.poll() {
            Ok(Some(observation)) => observation,
            Ok(None) => break,
            Err(err) => {
                session.report_tracker_error(&err);
                break;
            }
        };
        let now = start + Duration::from_millis(16 * frame);
        let outcome = session.process_frame(Some(&observation), now);
        if let Some(committed) = outcome.committed {
            info!(%committed, frame, "commit");
        }
        frame += 1;
    }

    // Advance past the word gap with no new frames.
    let after_gap = start + Duration::from_millis(16 * frame) + Duration::from_millis(2600);
    session.process_frame(None, after_gap);

    println!("sentence: {}", session.sentence_text());
    for count in ledger.counts()? {
        println!("{}: {}", count.label, count.count);
    }
    info!(events = bus.len(), "replay finished");
    Ok(())
}
