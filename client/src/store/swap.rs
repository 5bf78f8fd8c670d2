//! Shift-swap list store: optimistic partner responses reconciled against
//! authoritative refreshes.

use std::sync::Arc;

use shiftdesk_core::error::WorkflowError;
use shiftdesk_core::models::employee::{Employee, StaffRole};
use shiftdesk_core::models::request_status::{PartnerStatus, RequestStatus};
use shiftdesk_core::models::shift_swap::{CreateShiftSwapRequest, ShiftSwapRequest};
use shiftdesk_core::workflow::{self, capabilities, Capabilities, DecideAction, PartnerAction};

use crate::reconcile::{OverlayField, OverlayValue, Reconciler};
use crate::service::ShiftSwapService;
use crate::store::{BusyFlags, RowAction};

/// Canonical swap list for one session, with the optimistic overlay and
/// per-row busy flags the UI binds to.
pub struct ShiftSwapStore {
    service: Arc<dyn ShiftSwapService>,
    rows: Vec<ShiftSwapRequest>,
    reconciler: Reconciler,
    busy: BusyFlags,
}

impl ShiftSwapStore {
    pub fn new(service: Arc<dyn ShiftSwapService>) -> Self {
        Self {
            service,
            rows: Vec::new(),
            reconciler: Reconciler::new(),
            busy: BusyFlags::default(),
        }
    }

    /// Canonical rows from the last refresh, in backend order.
    pub fn rows(&self) -> &[ShiftSwapRequest] {
        &self.rows
    }

    pub fn is_busy(&self, id: &str, action: RowAction) -> bool {
        self.busy.is_busy(id, action)
    }

    /// Partner track for one row as the UI should show it: a requester
    /// cancellation freezes the track, otherwise an in-flight optimistic
    /// response shadows the canonical value.
    pub fn effective_partner_status(&self, id: &str) -> Option<PartnerStatus> {
        let row = self.rows.iter().find(|row| row.id == id)?;
        if row.status == RequestStatus::Canceled {
            return Some(PartnerStatus::Canceled);
        }
        match self.reconciler.effective(id, OverlayField::PartnerStatus) {
            Some(OverlayValue::PartnerStatus(status)) => Some(status),
            None => Some(row.partner_status),
        }
    }

    /// Capabilities for one row, computed against the overlay-adjusted state
    /// so an in-flight accept already closes the partner window.
    pub fn capabilities(&self, actor: &Employee, id: &str) -> Option<Capabilities> {
        let row = self.effective_row(id).ok()?;
        Some(capabilities::for_swap(actor, &row))
    }

    /// Replaces the cached list with the backend's authoritative view.
    pub async fn refresh(&mut self) -> Result<(), WorkflowError> {
        let rows = self.service.list().await?;
        tracing::debug!(count = rows.len(), "shift swap list refreshed");
        self.rows = rows;
        Ok(())
    }

    /// Submits a new swap proposal and refreshes.
    pub async fn submit(&mut self, payload: CreateShiftSwapRequest) -> Result<(), WorkflowError> {
        self.service.create(payload).await?;
        self.refresh().await
    }

    /// Approver decision. A conflict means another actor won the race: the
    /// list is resynced and the conflict is still surfaced for messaging.
    pub async fn decide(
        &mut self,
        actor: &Employee,
        id: &str,
        action: DecideAction,
        reason: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let mut probe = self.effective_row(id)?;
        match action {
            DecideAction::Approve => workflow::swap::approve(&mut probe, actor)?,
            DecideAction::Reject => {
                workflow::swap::reject(&mut probe, actor, reason.unwrap_or_default())?
            }
        }

        let busy_key = match action {
            DecideAction::Approve => RowAction::Approve,
            DecideAction::Reject => RowAction::Reject,
        };
        self.busy.acquire(id, busy_key)?;
        let result = self.service.decide(id, action, reason).await;
        self.busy.release(id, busy_key);
        self.finish_mutation(id, result.map(|_| ())).await
    }

    /// Partner response. Accepts are applied optimistically: the overlay is
    /// kept when a conflict shows the guess matched eventual reality, and
    /// rolled back on any other failure.
    pub async fn partner_respond(
        &mut self,
        actor: &Employee,
        id: &str,
        action: PartnerAction,
        reason: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let mut probe = self.effective_row(id)?;
        workflow::swap::partner_respond(&mut probe, actor, action, reason)?;

        let busy_key = match action {
            PartnerAction::Accept => RowAction::Accept,
            PartnerAction::Decline => RowAction::Decline,
        };
        self.busy.acquire(id, busy_key)?;
        let handle = (action == PartnerAction::Accept).then(|| {
            self.reconciler.apply_optimistic(
                id,
                OverlayField::PartnerStatus,
                OverlayValue::PartnerStatus(PartnerStatus::Accepted),
            )
        });
        let result = self.service.partner_respond(id, action, reason).await;
        self.busy.release(id, busy_key);

        match result {
            Ok(_) => {
                self.refresh().await?;
                if let Some(handle) = &handle {
                    self.reconciler.confirm(handle);
                }
                Ok(())
            }
            Err(err) if err.is_conflict() => {
                tracing::debug!(
                    request_id = id,
                    "partner response raced another actor; resyncing"
                );
                self.refresh().await?;
                if handle.is_some() {
                    // the tentative value already matches eventual reality
                    Ok(())
                } else {
                    Err(err)
                }
            }
            Err(err) => {
                if let Some(handle) = &handle {
                    self.reconciler.rollback(handle);
                }
                Err(err)
            }
        }
    }

    /// Requester-initiated cancellation while the partner is still waiting.
    pub async fn requester_cancel(
        &mut self,
        actor: &Employee,
        id: &str,
        reason: &str,
    ) -> Result<(), WorkflowError> {
        let mut probe = self.effective_row(id)?;
        workflow::swap::cancel(&mut probe, actor, reason)?;

        self.busy.acquire(id, RowAction::Cancel)?;
        let result = self.service.requester_cancel(id, reason).await;
        self.busy.release(id, RowAction::Cancel);
        self.finish_mutation(id, result.map(|_| ())).await
    }

    /// Administrative purge of one row; not a workflow transition.
    pub async fn delete(&mut self, actor: &Employee, id: &str) -> Result<(), WorkflowError> {
        let row = self.effective_row(id)?;
        if !capabilities::for_swap(actor, &row).can_delete {
            return Err(WorkflowError::invalid_transition(
                "only an admin may delete swap records",
            ));
        }
        self.busy.acquire(id, RowAction::Delete)?;
        let result = self.service.delete(id).await;
        self.busy.release(id, RowAction::Delete);
        self.finish_mutation(id, result).await
    }

    /// Administrative purge of the whole list.
    pub async fn delete_all(&mut self, actor: &Employee) -> Result<(), WorkflowError> {
        if actor.role != StaffRole::Admin {
            return Err(WorkflowError::invalid_transition(
                "only an admin may delete swap records",
            ));
        }
        self.service.delete_all().await?;
        self.refresh().await
    }

    fn effective_row(&self, id: &str) -> Result<ShiftSwapRequest, WorkflowError> {
        let mut row = self
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| WorkflowError::invalid_transition("unknown shift swap request"))?;
        if let Some(OverlayValue::PartnerStatus(status)) =
            self.reconciler.effective(id, OverlayField::PartnerStatus)
        {
            row.partner_status = status;
        }
        Ok(row)
    }

    async fn finish_mutation(
        &mut self,
        id: &str,
        result: Result<(), WorkflowError>,
    ) -> Result<(), WorkflowError> {
        match result {
            Ok(()) => self.refresh().await,
            Err(err) if err.is_conflict() => {
                tracing::debug!(request_id = id, "request was already processed; resyncing");
                self.refresh().await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
