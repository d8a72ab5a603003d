//! Last observed remote lifecycle status.
//!
//! The drain step is the only writer; everyone else reads through a
//! [`StatusObserver`]. The value lives in a single atomic so readers on other
//! tasks never see a torn update.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use sc2link_domain::Status;

/// Writable status cell owned by the correlator.
#[derive(Debug)]
pub struct StatusCell {
    state: Arc<AtomicU8>,
}

impl StatusCell {
    pub fn new(initial: Status) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(initial.to_u8())),
        }
    }

    pub fn get(&self) -> Status {
        Status::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Record the status carried by a freshly drained frame.
    pub(crate) fn set(&self, status: Status) {
        self.state.store(status.to_u8(), Ordering::SeqCst);
    }

    /// Read-only handle that can be shared with other tasks.
    pub fn observer(&self) -> StatusObserver {
        StatusObserver {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new(Status::Launched)
    }
}

/// Observable status for code that does not own the connection.
///
/// Multiple observers can share the same underlying state.
#[derive(Debug, Clone)]
pub struct StatusObserver {
    state: Arc<AtomicU8>,
}

impl StatusObserver {
    /// Get the most recently drained status.
    pub fn status(&self) -> Status {
        Status::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_in_game(&self) -> bool {
        self.status().is_in_game()
    }

    pub fn has_ended(&self) -> bool {
        self.status().is_terminal()
    }
}
