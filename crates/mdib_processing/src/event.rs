//! Distribution of commit results to subscribers.

use mdib_storage::{WriteDescriptionResult, WriteStateResult};
use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// A committed write, as published to observers.
///
/// Events are emitted only after a successful apply and preserve commit
/// order; network-facing event sources fan them out from here.
#[derive(Debug, Clone, PartialEq)]
pub enum MdibEvent {
    /// A committed description write.
    Description(WriteDescriptionResult),
    /// A committed state write.
    State(WriteStateResult),
}

impl MdibEvent {
    /// The transaction version the event belongs to.
    #[must_use]
    pub fn mdib_version(&self) -> mdib_model::MdibVersion {
        match self {
            Self::Description(result) => result.mdib_version,
            Self::State(result) => result.mdib_version,
        }
    }
}

/// Fans committed results out to subscribers.
///
/// Thread-safe; disconnected subscribers are dropped on the next emit.
#[derive(Debug, Default)]
pub struct MdibEventFeed {
    subscribers: RwLock<Vec<Sender<MdibEvent>>>,
}

impl MdibEventFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> Receiver<MdibEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits an event to every active subscriber.
    pub fn emit(&self, event: MdibEvent) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdib_model::MdibVersion;

    #[test]
    fn emit_reaches_all_subscribers() {
        let feed = MdibEventFeed::new();
        let rx1 = feed.subscribe();
        let rx2 = feed.subscribe();

        let event = MdibEvent::Description(WriteDescriptionResult::new(MdibVersion::new(1)));
        feed.emit(event.clone());

        assert_eq!(rx1.recv().unwrap(), event);
        assert_eq!(rx2.recv().unwrap(), event);
    }

    #[test]
    fn disconnected_subscribers_are_cleaned_up() {
        let feed = MdibEventFeed::new();
        let rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        drop(rx);
        feed.emit(MdibEvent::State(WriteStateResult::new(MdibVersion::new(1))));
        assert_eq!(feed.subscriber_count(), 0);
    }
}
