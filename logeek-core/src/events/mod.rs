//! Session lifecycle events.
//!
//! The orchestrator publishes a [`MindEvent`] at each lifecycle step.
//! UI shells subscribe to the live stream; a surface that attaches
//! mid-exam (a reconnecting tab, a results page) asks for the
//! session's recorded history instead of reconstructing state.

mod types;

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};

pub use types::MindEvent;

/// Position of an event in publish order.
pub type EventSeq = u64;

/// Publish/subscribe seam between the assessment core and its shells.
///
/// Publishing never blocks on consumers: a slow or absent subscriber
/// costs the orchestrator nothing.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event, returning its position in publish order.
    async fn publish(&self, event: MindEvent) -> EventSeq;

    /// Live stream of events published after this call.
    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, MindEvent)>;

    /// All recorded events for one session, in publish order.
    async fn session_events(&self, session_id: &str) -> Vec<(EventSeq, MindEvent)>;
}

/// Single-process [`EventBus`] for tests and the local shell.
///
/// The sequence number doubles as the index into the recorded log, so
/// ordering needs no separate counter.
pub struct MemoryEventBus {
    log: Mutex<Vec<(EventSeq, MindEvent)>>,
    live: broadcast::Sender<(EventSeq, MindEvent)>,
}

impl MemoryEventBus {
    /// Create a bus whose live stream buffers up to `capacity` events
    /// per lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (live, _) = broadcast::channel(capacity);
        Self {
            log: Mutex::new(Vec::new()),
            live,
        }
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: MindEvent) -> EventSeq {
        let mut log = self.log.lock().await;
        let seq = log.len() as EventSeq;
        log.push((seq, event.clone()));
        drop(log);

        // A send error only means nobody is listening right now
        let _ = self.live.send((seq, event));
        seq
    }

    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, MindEvent)> {
        self.live.subscribe()
    }

    async fn session_events(&self, session_id: &str) -> Vec<(EventSeq, MindEvent)> {
        self.log
            .lock()
            .await
            .iter()
            .filter(|(_, event)| event.session_id() == session_id)
            .cloned()
            .collect()
    }
}
