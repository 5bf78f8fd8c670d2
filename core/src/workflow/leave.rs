//! Transitions for single-approver leave requests.

use crate::error::WorkflowError;
use crate::models::employee::Employee;
use crate::models::leave_request::LeaveRequest;
use crate::validation::rules::validate_reason;
use crate::workflow::capabilities;

/// Approve a pending leave request.
pub fn approve(request: &mut LeaveRequest, actor: &Employee) -> Result<(), WorkflowError> {
    let caps = capabilities::for_leave(actor, request);
    if !caps.can_approve {
        return Err(WorkflowError::invalid_transition(
            "leave request is not awaiting this approver",
        ));
    }
    request.approve(actor);
    tracing::debug!(request_id = %request.id, approver = %actor.id, "leave request approved");
    Ok(())
}

/// Reject a pending leave request with a mandatory reason.
pub fn reject(request: &mut LeaveRequest, actor: &Employee, reason: &str) -> Result<(), WorkflowError> {
    validate_reason(reason)?;
    let caps = capabilities::for_leave(actor, request);
    if !caps.can_approve {
        return Err(WorkflowError::invalid_transition(
            "leave request is not awaiting this approver",
        ));
    }
    request.reject(actor, reason.trim().to_string());
    tracing::debug!(request_id = %request.id, approver = %actor.id, "leave request rejected");
    Ok(())
}

/// Withdraw a pending leave request as its requester.
pub fn cancel(request: &mut LeaveRequest, actor: &Employee, reason: &str) -> Result<(), WorkflowError> {
    validate_reason(reason)?;
    let caps = capabilities::for_leave(actor, request);
    if !caps.can_cancel_as_requester {
        return Err(WorkflowError::invalid_transition(
            "leave request can no longer be canceled by its requester",
        ));
    }
    request.cancel(actor, reason.trim().to_string());
    tracing::debug!(request_id = %request.id, "leave request canceled by requester");
    Ok(())
}
