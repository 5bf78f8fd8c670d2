//! End-to-end store flows against an in-memory backend double.
//!
//! The double applies the same core transitions the real backend of record
//! enforces, holds one session per actor, and reports a conflict whenever an
//! action targets a request another actor already closed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use shiftdesk_client::api::types::SwapPreview;
use shiftdesk_client::service::{LeaveRequestService, ShiftSwapService};
use shiftdesk_client::store::leave::LeaveRequestStore;
use shiftdesk_client::store::swap::ShiftSwapStore;
use shiftdesk_core::error::WorkflowError;
use shiftdesk_core::models::employee::{Employee, StaffRef, StaffRole};
use shiftdesk_core::models::leave_request::{CreateLeaveRequest, LeaveRequest, LeaveType};
use shiftdesk_core::models::request_status::{PartnerStatus, RequestStatus};
use shiftdesk_core::models::shift_swap::{CreateShiftSwapRequest, ShiftSlot, ShiftSwapRequest};
use shiftdesk_core::workflow::{leave, swap, DecideAction, PartnerAction};

#[derive(Clone, Default)]
struct BackendState {
    swaps: Arc<Mutex<Vec<ShiftSwapRequest>>>,
    leaves: Arc<Mutex<Vec<LeaveRequest>>>,
    roster: Arc<Vec<Employee>>,
}

/// One authenticated session against the shared backend state.
struct SessionService {
    state: BackendState,
    session: Employee,
}

impl SessionService {
    fn new(state: &BackendState, session: &Employee) -> Arc<Self> {
        Arc::new(Self {
            state: state.clone(),
            session: session.clone(),
        })
    }
}

fn conflict() -> WorkflowError {
    WorkflowError::conflict("request was already processed")
}

#[async_trait]
impl ShiftSwapService for SessionService {
    async fn list(&self) -> Result<Vec<ShiftSwapRequest>, WorkflowError> {
        Ok(self.state.swaps.lock().unwrap().clone())
    }

    async fn create(
        &self,
        payload: CreateShiftSwapRequest,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let partner = self
            .state
            .roster
            .iter()
            .find(|employee| employee.id == payload.partner_id)
            .ok_or_else(|| WorkflowError::validation("unknown partner"))?;
        let request = ShiftSwapRequest::new(
            StaffRef::from(&self.session),
            StaffRef::from(partner),
            payload.date,
            ShiftSlot {
                name: "Pagi".to_string(),
                code: "P".to_string(),
            },
            ShiftSlot {
                name: "Malam".to_string(),
                code: "M".to_string(),
            },
        );
        self.state.swaps.lock().unwrap().push(request.clone());
        Ok(request)
    }

    async fn decide<'a>(
        &self,
        id: &str,
        action: DecideAction,
        reason: Option<&'a str>,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let mut rows = self.state.swaps.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| WorkflowError::invalid_transition("unknown shift swap request"))?;
        if row.is_terminal() {
            return Err(conflict());
        }
        match action {
            DecideAction::Approve => swap::approve(row, &self.session)?,
            DecideAction::Reject => swap::reject(row, &self.session, reason.unwrap_or_default())?,
        }
        Ok(row.clone())
    }

    async fn partner_respond<'a>(
        &self,
        id: &str,
        action: PartnerAction,
        reason: Option<&'a str>,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let mut rows = self.state.swaps.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| WorkflowError::invalid_transition("unknown shift swap request"))?;
        if row.is_terminal() {
            return Err(conflict());
        }
        swap::partner_respond(row, &self.session, action, reason)?;
        Ok(row.clone())
    }

    async fn requester_cancel(
        &self,
        id: &str,
        reason: &str,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let mut rows = self.state.swaps.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| WorkflowError::invalid_transition("unknown shift swap request"))?;
        if row.is_terminal() {
            return Err(conflict());
        }
        swap::cancel(row, &self.session, reason)?;
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), WorkflowError> {
        self.state.swaps.lock().unwrap().retain(|row| row.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), WorkflowError> {
        self.state.swaps.lock().unwrap().clear();
        Ok(())
    }

    async fn preview(
        &self,
        _partner_id: &str,
        _date: NaiveDate,
    ) -> Result<SwapPreview, WorkflowError> {
        Ok(SwapPreview {
            requester_shift: Some(ShiftSlot {
                name: "Pagi".to_string(),
                code: "P".to_string(),
            }),
            partner_shift: Some(ShiftSlot {
                name: "Malam".to_string(),
                code: "M".to_string(),
            }),
        })
    }
}

#[async_trait]
impl LeaveRequestService for SessionService {
    async fn list(&self) -> Result<Vec<LeaveRequest>, WorkflowError> {
        Ok(self.state.leaves.lock().unwrap().clone())
    }

    async fn create(&self, payload: CreateLeaveRequest) -> Result<LeaveRequest, WorkflowError> {
        let request = LeaveRequest::new(
            StaffRef::from(&self.session),
            payload.leave_type,
            payload.start_date,
            payload.end_date,
            payload.reason,
        );
        self.state.leaves.lock().unwrap().push(request.clone());
        Ok(request)
    }

    async fn decide<'a>(
        &self,
        id: &str,
        action: DecideAction,
        reason: Option<&'a str>,
    ) -> Result<LeaveRequest, WorkflowError> {
        let mut rows = self.state.leaves.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| WorkflowError::invalid_transition("unknown leave request"))?;
        if row.status.is_terminal() {
            return Err(conflict());
        }
        match action {
            DecideAction::Approve => leave::approve(row, &self.session)?,
            DecideAction::Reject => leave::reject(row, &self.session, reason.unwrap_or_default())?,
        }
        Ok(row.clone())
    }

    async fn cancel(&self, id: &str, reason: &str) -> Result<LeaveRequest, WorkflowError> {
        let mut rows = self.state.leaves.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| WorkflowError::invalid_transition("unknown leave request"))?;
        if row.status.is_terminal() {
            return Err(conflict());
        }
        leave::cancel(row, &self.session, reason)?;
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), WorkflowError> {
        self.state.leaves.lock().unwrap().retain(|row| row.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), WorkflowError> {
        self.state.leaves.lock().unwrap().clear();
        Ok(())
    }
}

fn employee_a() -> Employee {
    Employee::new("emp-a", "Budi", StaffRole::Employee)
}

fn employee_b() -> Employee {
    Employee::new("emp-b", "Sari", StaffRole::Employee)
}

fn cos() -> Employee {
    Employee::new("cos-1", "Dina", StaffRole::Cos)
}

fn admin() -> Employee {
    Employee::new("adm-1", "Rina", StaffRole::Admin)
}

fn state() -> BackendState {
    BackendState {
        roster: Arc::new(vec![employee_a(), employee_b(), cos(), admin()]),
        ..BackendState::default()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

#[tokio::test]
async fn leave_request_approved_by_direct_supervisor() {
    let state = state();
    let employee = employee_a();
    let approver = cos();

    let mut employee_store = LeaveRequestStore::new(SessionService::new(&state, &employee));
    let tomorrow = today() + Days::new(1);
    employee_store
        .submit(
            CreateLeaveRequest {
                leave_type: LeaveType::Izin,
                start_date: tomorrow,
                end_date: tomorrow,
                reason: Some("family matter".to_string()),
            },
            today(),
        )
        .await
        .unwrap();
    let id = employee_store.rows()[0].id.clone();

    let mut approver_store = LeaveRequestStore::new(SessionService::new(&state, &approver));
    approver_store.refresh().await.unwrap();
    approver_store
        .decide(&approver, &id, DecideAction::Approve, None)
        .await
        .unwrap();

    let row = &approver_store.rows()[0];
    assert_eq!(row.status, RequestStatus::Approved);
    assert_eq!(row.approver_role, Some(StaffRole::Cos));
}

#[tokio::test]
async fn partner_decline_closes_the_swap_for_good() {
    let state = state();
    let requester = employee_a();
    let partner = employee_b();
    let approver = cos();

    let mut requester_store = ShiftSwapStore::new(SessionService::new(&state, &requester));
    requester_store
        .submit(CreateShiftSwapRequest {
            partner_id: partner.id.clone(),
            date: today() + Days::new(3),
        })
        .await
        .unwrap();
    let id = requester_store.rows()[0].id.clone();

    let mut partner_store = ShiftSwapStore::new(SessionService::new(&state, &partner));
    partner_store.refresh().await.unwrap();
    partner_store
        .partner_respond(&partner, &id, PartnerAction::Decline, Some("conflict"))
        .await
        .unwrap();

    let row = &partner_store.rows()[0];
    assert_eq!(row.partner_status, PartnerStatus::Declined);
    assert_eq!(row.partner_reason.as_deref(), Some("conflict"));
    assert!(row.is_terminal());

    let mut approver_store = ShiftSwapStore::new(SessionService::new(&state, &approver));
    approver_store.refresh().await.unwrap();
    let err = approver_store
        .decide(&approver, &id, DecideAction::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition(_)));
}

#[tokio::test]
async fn accepted_swap_rejected_by_approver_keeps_partner_decision() {
    let state = state();
    let requester = employee_a();
    let partner = employee_b();
    let approver = cos();

    let mut requester_store = ShiftSwapStore::new(SessionService::new(&state, &requester));
    requester_store
        .submit(CreateShiftSwapRequest {
            partner_id: partner.id.clone(),
            date: today() + Days::new(3),
        })
        .await
        .unwrap();
    let id = requester_store.rows()[0].id.clone();

    let mut partner_store = ShiftSwapStore::new(SessionService::new(&state, &partner));
    partner_store.refresh().await.unwrap();
    partner_store
        .partner_respond(&partner, &id, PartnerAction::Accept, None)
        .await
        .unwrap();

    let mut approver_store = ShiftSwapStore::new(SessionService::new(&state, &approver));
    approver_store.refresh().await.unwrap();
    approver_store
        .decide(
            &approver,
            &id,
            DecideAction::Reject,
            Some("insufficient coverage"),
        )
        .await
        .unwrap();

    let row = &approver_store.rows()[0];
    assert_eq!(row.status, RequestStatus::Rejected);
    assert_eq!(row.reject_reason.as_deref(), Some("insufficient coverage"));
    assert_eq!(row.partner_status, PartnerStatus::Accepted);
}

#[tokio::test]
async fn cancel_beats_accept_and_the_partner_view_converges() {
    let state = state();
    let requester = employee_a();
    let partner = employee_b();

    let mut requester_store = ShiftSwapStore::new(SessionService::new(&state, &requester));
    requester_store
        .submit(CreateShiftSwapRequest {
            partner_id: partner.id.clone(),
            date: today() + Days::new(3),
        })
        .await
        .unwrap();
    let id = requester_store.rows()[0].id.clone();

    // partner loads the list before the cancellation lands
    let mut partner_store = ShiftSwapStore::new(SessionService::new(&state, &partner));
    partner_store.refresh().await.unwrap();

    requester_store
        .requester_cancel(&requester, &id, "plans changed")
        .await
        .unwrap();

    // the stale accept races the cancellation; the backend reports the
    // conflict, the store resyncs, and the freeze wins the display
    partner_store
        .partner_respond(&partner, &id, PartnerAction::Accept, None)
        .await
        .unwrap();
    assert_eq!(
        partner_store.effective_partner_status(&id),
        Some(PartnerStatus::Canceled)
    );
    assert_eq!(
        partner_store.rows()[0].status,
        RequestStatus::Canceled
    );
}

#[tokio::test]
async fn admin_purge_empties_the_list() {
    let state = state();
    let requester = employee_a();
    let partner = employee_b();
    let admin = admin();

    let mut requester_store = ShiftSwapStore::new(SessionService::new(&state, &requester));
    requester_store
        .submit(CreateShiftSwapRequest {
            partner_id: partner.id.clone(),
            date: today() + Days::new(3),
        })
        .await
        .unwrap();

    let mut admin_store = ShiftSwapStore::new(SessionService::new(&state, &admin));
    admin_store.refresh().await.unwrap();

    let err = requester_store.delete_all(&requester).await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition(_)));

    admin_store.delete_all(&admin).await.unwrap();
    assert!(admin_store.rows().is_empty());
}
