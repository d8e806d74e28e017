//! Fire-and-forget recording of hotel views and booking clicks.
//!
//! The interactive path only pushes onto an unbounded channel; a background
//! worker drains it into an [`EventSink`] with its own retry policy. There is no
//! back-pressure and no deduplication: every interaction is one record.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::models::event::{EventType, NewHotelEvent};
use crate::models::hotel::HotelId;

/// Append-only event collection.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn record(&self, event: &NewHotelEvent) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(250))
    }
}

/// Cheap to clone; every clone feeds the same worker.
#[derive(Debug, Clone)]
pub struct EventTracker {
    sender: mpsc::UnboundedSender<NewHotelEvent>,
}

impl EventTracker {
    /// Starts the delivery worker on the current tokio runtime. The worker stops
    /// once every tracker clone has been dropped and the queue is drained.
    pub fn spawn<S: EventSink>(sink: S, policy: RetryPolicy) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(deliver(receiver, sink, policy));
        (Self { sender }, worker)
    }

    pub fn track(&self, hotel_id: HotelId, event_type: EventType) {
        let event = NewHotelEvent::now(hotel_id, event_type);
        if self.sender.send(event).is_err() {
            log::warn!(
                "tracking worker is gone, dropping {} event for hotel {hotel_id}",
                event_type.as_str()
            );
        }
    }

    pub fn track_view(&self, hotel_id: HotelId) {
        self.track(hotel_id, EventType::View);
    }

    pub fn track_affiliate_click(&self, hotel_id: HotelId) {
        self.track(hotel_id, EventType::AffiliateClick);
    }
}

async fn deliver<S: EventSink>(
    mut receiver: mpsc::UnboundedReceiver<NewHotelEvent>,
    sink: S,
    policy: RetryPolicy,
) {
    while let Some(event) = receiver.recv().await {
        let mut attempt = 1;
        loop {
            match sink.record(&event).await {
                Ok(()) => break,
                Err(err) if attempt < policy.max_attempts => {
                    log::debug!(
                        "tracking write for hotel {} failed (attempt {attempt}): {err}",
                        event.hotel_id
                    );
                    attempt += 1;
                    tokio::time::sleep(policy.backoff).await;
                }
                Err(err) => {
                    log::warn!(
                        "giving up on {} event for hotel {} after {attempt} attempts: {err}",
                        event.event_type.as_str(),
                        event.hotel_id
                    );
                    break;
                }
            }
        }
    }
    log::debug!("tracking queue closed");
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Keeps every event in memory; optionally fails the first `failures` writes.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub events: Arc<Mutex<Vec<NewHotelEvent>>>,
        pub attempts: Arc<AtomicU32>,
        pub failures: u32,
    }

    impl RecordingSink {
        pub fn failing(failures: u32) -> Self {
            Self {
                failures,
                ..Self::default()
            }
        }

        pub fn recorded(&self) -> Vec<(HotelId, EventType)> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| (e.hotel_id, e.event_type))
                .collect()
        }
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn record(&self, event: &NewHotelEvent) -> Result<(), StoreError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.failures {
                return Err(StoreError::Unavailable("event store offline".to_string()));
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }
}
