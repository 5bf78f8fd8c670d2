//! Service traits describing the backend of record.
//!
//! The backend is the single arbiter of concurrent writes to a request; these
//! traits capture only the contract the stores depend on, so tests can swap
//! in mocks or an in-memory double. The acting user is implied by the
//! authenticated session behind each service instance.

use async_trait::async_trait;
use chrono::NaiveDate;

use shiftdesk_core::error::WorkflowError;
use shiftdesk_core::models::leave_request::{CreateLeaveRequest, LeaveRequest};
use shiftdesk_core::models::shift_swap::{CreateShiftSwapRequest, ShiftSwapRequest};
use shiftdesk_core::workflow::{DecideAction, PartnerAction};

use crate::api::types::SwapPreview;

/// Backend operations on leave requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaveRequestService: Send + Sync {
    /// Current state of all leave requests visible to the caller.
    async fn list(&self) -> Result<Vec<LeaveRequest>, WorkflowError>;

    /// Submits a new leave request; the server validates business rules
    /// independently of any client-side precheck.
    async fn create(&self, payload: CreateLeaveRequest) -> Result<LeaveRequest, WorkflowError>;

    /// Approver approve/reject.
    async fn decide<'a>(
        &self,
        id: &str,
        action: DecideAction,
        reason: Option<&'a str>,
    ) -> Result<LeaveRequest, WorkflowError>;

    /// Requester-initiated cancellation.
    async fn cancel(&self, id: &str, reason: &str) -> Result<LeaveRequest, WorkflowError>;

    /// Administrative purge, outside the state machine.
    async fn delete(&self, id: &str) -> Result<(), WorkflowError>;

    /// Administrative purge of every record.
    async fn delete_all(&self) -> Result<(), WorkflowError>;
}

/// Backend operations on shift-swap requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShiftSwapService: Send + Sync {
    /// Current state of all swap requests visible to the caller.
    async fn list(&self) -> Result<Vec<ShiftSwapRequest>, WorkflowError>;

    /// Submits a new swap proposal; the server resolves both shifts from the
    /// schedule.
    async fn create(&self, payload: CreateShiftSwapRequest)
        -> Result<ShiftSwapRequest, WorkflowError>;

    /// Approver approve/reject.
    async fn decide<'a>(
        &self,
        id: &str,
        action: DecideAction,
        reason: Option<&'a str>,
    ) -> Result<ShiftSwapRequest, WorkflowError>;

    /// Partner accept/decline.
    async fn partner_respond<'a>(
        &self,
        id: &str,
        action: PartnerAction,
        reason: Option<&'a str>,
    ) -> Result<ShiftSwapRequest, WorkflowError>;

    /// Requester-initiated cancellation.
    async fn requester_cancel(&self, id: &str, reason: &str)
        -> Result<ShiftSwapRequest, WorkflowError>;

    /// Administrative purge, outside the state machine.
    async fn delete(&self, id: &str) -> Result<(), WorkflowError>;

    /// Administrative purge of every record.
    async fn delete_all(&self) -> Result<(), WorkflowError>;

    /// Schedule lookup for a proposed swap date.
    async fn preview(&self, partner_id: &str, date: NaiveDate)
        -> Result<SwapPreview, WorkflowError>;
}
