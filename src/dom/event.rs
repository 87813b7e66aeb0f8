//! DOM events

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::NodeId;

/// Kinds of events the core listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Submit,
}

/// An event being dispatched to listeners.
///
/// Clones share the default-prevented flag, so a listener calling
/// `prevent_default` is visible to the dispatcher.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Node the event was dispatched on
    pub target: NodeId,
    prevented: Arc<AtomicBool>,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            prevented: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn prevent_default(&self) {
        self.prevented.store(true, Ordering::SeqCst);
    }

    pub fn default_prevented(&self) -> bool {
        self.prevented.load(Ordering::SeqCst)
    }
}
