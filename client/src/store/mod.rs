//! Cached request lists with refresh-on-mutation discipline.
//!
//! Each store is the single source of truth for one list. Every successful or
//! conflicted mutation is followed by a full-list replace; the stores never
//! patch rows in place, so the view always converges on the backend's
//! authoritative ordering.

use std::collections::HashSet;

use shiftdesk_core::error::WorkflowError;

pub mod leave;
pub mod swap;

/// Action kinds used for per-row busy tracking; the UI disables the matching
/// control while a flag is held so the same client cannot double-submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Approve,
    Reject,
    Accept,
    Decline,
    Cancel,
    Delete,
}

/// Per-(row, action) busy flags. Held only for the duration of the service
/// call; a timeout or failure releases the flag and permits manual retry.
#[derive(Debug, Default)]
pub(crate) struct BusyFlags {
    held: HashSet<(String, RowAction)>,
}

impl BusyFlags {
    pub(crate) fn acquire(&mut self, id: &str, action: RowAction) -> Result<(), WorkflowError> {
        if !self.held.insert((id.to_string(), action)) {
            return Err(WorkflowError::invalid_transition(
                "action is already in progress for this request",
            ));
        }
        Ok(())
    }

    pub(crate) fn release(&mut self, id: &str, action: RowAction) {
        self.held.remove(&(id.to_string(), action));
    }

    pub(crate) fn is_busy(&self, id: &str, action: RowAction) -> bool {
        self.held.contains(&(id.to_string(), action))
    }
}
