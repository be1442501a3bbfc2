//! Change notification for the transaction store
//!
//! Every successful mutation is broadcast to all live subscriptions. Events
//! carry only the affected id; consumers are expected to fetch a fresh
//! snapshot rather than patch a cached one.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::TransactionId;

/// A committed change to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Inserted(TransactionId),
    Updated(TransactionId),
    Deleted(TransactionId),
    /// Many rows changed at once (bulk import)
    Reloaded,
}

/// Fan-out of change events to any number of subscribers
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<Vec<Sender<ChangeEvent>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }
        Subscription { rx }
    }

    /// Send an event to every subscriber, dropping the ones that hung up
    pub fn publish(&self, event: ChangeEvent) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        subscribers.retain(|tx| tx.send(event).is_ok());
        tracing::debug!(?event, subscribers = subscribers.len(), "Published change");
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(subscribers) => subscribers.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

/// Receiving end of a change feed; dropping it unsubscribes
pub struct Subscription {
    rx: Receiver<ChangeEvent>,
}

impl Subscription {
    /// Block until the next event; `None` once the feed is gone
    pub fn recv(&self) -> Option<ChangeEvent> {
        self.rx.recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Take every event already queued without blocking
    pub fn drain(&self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
