//! Leave request list store.

use std::sync::Arc;

use chrono::NaiveDate;

use shiftdesk_core::error::WorkflowError;
use shiftdesk_core::models::employee::{Employee, StaffRole};
use shiftdesk_core::models::leave_request::{CreateLeaveRequest, LeaveRequest};
use shiftdesk_core::validation::rules::{validate_leave_lead_time, validate_leave_window};
use shiftdesk_core::workflow::{self, capabilities, Capabilities, DecideAction};

use crate::service::LeaveRequestService;
use crate::store::{BusyFlags, RowAction};

/// Canonical leave request list for one session.
pub struct LeaveRequestStore {
    service: Arc<dyn LeaveRequestService>,
    rows: Vec<LeaveRequest>,
    busy: BusyFlags,
}

impl LeaveRequestStore {
    pub fn new(service: Arc<dyn LeaveRequestService>) -> Self {
        Self {
            service,
            rows: Vec::new(),
            busy: BusyFlags::default(),
        }
    }

    /// Canonical rows from the last refresh, in backend order.
    pub fn rows(&self) -> &[LeaveRequest] {
        &self.rows
    }

    pub fn is_busy(&self, id: &str, action: RowAction) -> bool {
        self.busy.is_busy(id, action)
    }

    pub fn capabilities(&self, actor: &Employee, id: &str) -> Option<Capabilities> {
        let row = self.rows.iter().find(|row| row.id == id)?;
        Some(capabilities::for_leave(actor, row))
    }

    /// Replaces the cached list with the backend's authoritative view.
    pub async fn refresh(&mut self) -> Result<(), WorkflowError> {
        let rows = self.service.list().await?;
        tracing::debug!(count = rows.len(), "leave request list refreshed");
        self.rows = rows;
        Ok(())
    }

    /// Files a new request. The date-window and lead-time prechecks are UX
    /// guards only; the backend revalidates independently.
    pub async fn submit(
        &mut self,
        payload: CreateLeaveRequest,
        today: NaiveDate,
    ) -> Result<(), WorkflowError> {
        validate_leave_window(payload.start_date, payload.end_date)?;
        validate_leave_lead_time(payload.leave_type, payload.start_date, today)?;
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
        let mut probe = self.row(id)?.clone();
        match action {
            DecideAction::Approve => workflow::leave::approve(&mut probe, actor)?,
            DecideAction::Reject => {
                workflow::leave::reject(&mut probe, actor, reason.unwrap_or_default())?
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

    /// Requester-initiated cancellation while still pending.
    pub async fn requester_cancel(
        &mut self,
        actor: &Employee,
        id: &str,
        reason: &str,
    ) -> Result<(), WorkflowError> {
        let mut probe = self.row(id)?.clone();
        workflow::leave::cancel(&mut probe, actor, reason)?;

        self.busy.acquire(id, RowAction::Cancel)?;
        let result = self.service.cancel(id, reason).await;
        self.busy.release(id, RowAction::Cancel);
        self.finish_mutation(id, result.map(|_| ())).await
    }

    /// Administrative purge of one row; not a workflow transition.
    pub async fn delete(&mut self, actor: &Employee, id: &str) -> Result<(), WorkflowError> {
        let row = self.row(id)?;
        if !capabilities::for_leave(actor, row).can_delete {
            return Err(WorkflowError::invalid_transition(
                "only an admin may delete leave records",
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
                "only an admin may delete leave records",
            ));
        }
        self.service.delete_all().await?;
        self.refresh().await
    }

    fn row(&self, id: &str) -> Result<&LeaveRequest, WorkflowError> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .ok_or_else(|| WorkflowError::invalid_transition("unknown leave request"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockLeaveRequestService;
    use shiftdesk_core::models::employee::StaffRef;
    use shiftdesk_core::models::leave_request::LeaveType;
    use shiftdesk_core::models::request_status::RequestStatus;

    fn employee() -> Employee {
        Employee::new("e1", "Budi", StaffRole::Employee)
    }

    fn cos() -> Employee {
        Employee::new("c1", "Dina", StaffRole::Cos)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pending_row(id: &str) -> LeaveRequest {
        let mut row = LeaveRequest::new(
            StaffRef::from(&employee()),
            LeaveType::Izin,
            day(2025, 9, 2),
            day(2025, 9, 2),
            None,
        );
        row.id = id.to_string();
        row
    }

    fn service_with_list(rows: Vec<LeaveRequest>) -> MockLeaveRequestService {
        let mut service = MockLeaveRequestService::new();
        service.expect_list().returning(move || Ok(rows.clone()));
        service
    }

    async fn loaded_store(service: MockLeaveRequestService) -> LeaveRequestStore {
        let mut store = LeaveRequestStore::new(Arc::new(service));
        store.refresh().await.unwrap();
        store
    }

    #[tokio::test]
    async fn lead_time_violation_never_reaches_the_service() {
        let service = MockLeaveRequestService::new();
        let mut store = LeaveRequestStore::new(Arc::new(service));

        let err = store
            .submit(
                CreateLeaveRequest {
                    leave_type: LeaveType::Cuti,
                    start_date: day(2025, 9, 3),
                    end_date: day(2025, 9, 4),
                    reason: None,
                },
                day(2025, 9, 1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn inverted_window_never_reaches_the_service() {
        let service = MockLeaveRequestService::new();
        let mut store = LeaveRequestStore::new(Arc::new(service));

        let err = store
            .submit(
                CreateLeaveRequest {
                    leave_type: LeaveType::Izin,
                    start_date: day(2025, 9, 5),
                    end_date: day(2025, 9, 4),
                    reason: None,
                },
                day(2025, 9, 1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn approve_dispatches_and_refreshes() {
        let mut service = service_with_list(vec![pending_row("l1")]);
        service
            .expect_decide()
            .times(1)
            .returning(|id, _, _| {
                let mut row = pending_row(id);
                row.approve(&Employee::new("c1", "Dina", StaffRole::Cos));
                Ok(row)
            });
        let mut store = loaded_store(service).await;

        store
            .decide(&cos(), "l1", DecideAction::Approve, None)
            .await
            .unwrap();
        assert!(!store.is_busy("l1", RowAction::Approve));
    }

    #[tokio::test]
    async fn peer_cannot_decide() {
        let service = service_with_list(vec![pending_row("l1")]);
        let mut store = loaded_store(service).await;

        let err = store
            .decide(&employee(), "l1", DecideAction::Approve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn conflicted_cancel_resyncs_and_surfaces() {
        let mut service = service_with_list(vec![pending_row("l1")]);
        service.expect_cancel().returning(|_, _| {
            Err(WorkflowError::conflict("request was already processed"))
        });
        let mut store = loaded_store(service).await;

        let err = store
            .requester_cancel(&employee(), "l1", "plans changed")
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(!store.is_busy("l1", RowAction::Cancel));
    }

    #[tokio::test]
    async fn terminal_row_blocks_further_decisions_locally() {
        let mut row = pending_row("l1");
        row.status = RequestStatus::Approved;
        let service = service_with_list(vec![row]);
        let mut store = loaded_store(service).await;

        let err = store
            .decide(&cos(), "l1", DecideAction::Reject, Some("late"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
    }
}
