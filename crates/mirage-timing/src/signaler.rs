//! Pending-commit completion signalling.

use std::sync::{Mutex, PoisonError};

use mirage_display::{CompletionSink, CompletionToken, VblankStamp};
use tracing::warn;

/// Holds at most one pending commit-completion token and releases it at the
/// next vblank boundary, exactly once.
///
/// The slot is shared between whatever thread submits commits and the timing
/// engine's fire context; all access goes through one short-held mutex, and
/// take-and-clear is a single step under that mutex, which is what makes
/// delivery exactly-once even when a submit races a fire.
#[derive(Debug, Default)]
pub struct CommitSignaler {
    pending: Mutex<Option<CompletionToken>>,
}

impl CommitSignaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `token` as the pending commit.
    ///
    /// The layer above serializes commits one at a time, so a second submit
    /// before delivery is a protocol violation there. If it happens anyway
    /// the newer token wins and the displaced one is handed back to the
    /// caller; it will never be delivered from here.
    pub fn submit(&self, token: CompletionToken) -> Option<CompletionToken> {
        let displaced = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token);
        if let Some(old) = &displaced {
            warn!(token = old.id(), "displacing pending commit token before delivery");
        }
        displaced
    }

    /// True if a commit is waiting for its boundary.
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Atomically take and clear the pending token, if any.
    pub fn take_pending(&self) -> Option<CompletionToken> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Release the pending token (if any) for the boundary `at`.
    ///
    /// The slot lock is dropped before calling into the sink, so delivery
    /// never runs under the engine's shared state. Returns whether a token
    /// was delivered.
    pub fn deliver_if_pending(&self, sink: &dyn CompletionSink, at: VblankStamp) -> bool {
        match self.take_pending() {
            Some(token) => {
                sink.complete(token, at);
                true
            }
            None => false,
        }
    }
}
