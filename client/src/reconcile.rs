//! Optimistic overlay management for in-flight partner responses.
//!
//! The backend of record is the only authority on concurrent-decision
//! ordering; the client never resolves conflicts itself. A tentative value is
//! applied before the call goes out, then confirmed, rolled back, or kept:
//! an "already processed" conflict means the optimistic guess matched
//! eventual reality, so the overlay stays until an authoritative refresh
//! supersedes it.

use std::collections::HashMap;

use shiftdesk_core::models::request_status::PartnerStatus;

/// Field a tentative value can shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayField {
    PartnerStatus,
}

/// Tentative values the reconciler can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayValue {
    PartnerStatus(PartnerStatus),
}

/// Handle identifying one tentative write. Confirm and rollback are no-ops
/// for a handle superseded by a newer overlay on the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayHandle {
    request_id: String,
    field: OverlayField,
    token: u64,
}

#[derive(Debug)]
struct Overlay {
    value: OverlayValue,
    token: u64,
}

/// Keyed set of tentative overlays shadowing the canonical list.
#[derive(Debug, Default)]
pub struct Reconciler {
    overlays: HashMap<(String, OverlayField), Overlay>,
    next_token: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a tentative value for one request field and returns the handle
    /// used to confirm or roll it back.
    pub fn apply_optimistic(
        &mut self,
        request_id: &str,
        field: OverlayField,
        tentative: OverlayValue,
    ) -> OverlayHandle {
        self.next_token += 1;
        let token = self.next_token;
        self.overlays.insert(
            (request_id.to_string(), field),
            Overlay {
                value: tentative,
                token,
            },
        );
        OverlayHandle {
            request_id: request_id.to_string(),
            field,
            token,
        }
    }

    /// Discards the overlay once the authoritative refresh supersedes it.
    pub fn confirm(&mut self, handle: &OverlayHandle) {
        self.remove_if_current(handle);
    }

    /// Removes the overlay, restoring the prior canonical value.
    pub fn rollback(&mut self, handle: &OverlayHandle) {
        self.remove_if_current(handle);
    }

    /// Overlay-aware lookup used by store read paths.
    pub fn effective(&self, request_id: &str, field: OverlayField) -> Option<OverlayValue> {
        self.overlays
            .get(&(request_id.to_string(), field))
            .map(|overlay| overlay.value)
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    fn remove_if_current(&mut self, handle: &OverlayHandle) {
        let key = (handle.request_id.clone(), handle.field);
        if self
            .overlays
            .get(&key)
            .is_some_and(|overlay| overlay.token == handle.token)
        {
            self.overlays.remove(&key);
        }
    }
}
