//! Transitions for two-party shift-swap requests.
//!
//! The partner track and the approver track move independently until one of
//! them terminates the request: a partner decline always wins over a
//! not-yet-made approver decision, and a requester cancellation from the
//! `(pending, waiting)` window closes both tracks at once.

use crate::error::WorkflowError;
use crate::models::employee::Employee;
use crate::models::shift_swap::ShiftSwapRequest;
use crate::validation::rules::validate_reason;
use crate::workflow::capabilities;
use crate::workflow::PartnerAction;

/// Approve a swap whose partner has already accepted.
pub fn approve(request: &mut ShiftSwapRequest, actor: &Employee) -> Result<(), WorkflowError> {
    let caps = capabilities::for_swap(actor, request);
    if !caps.can_approve {
        return Err(WorkflowError::invalid_transition(
            "shift swap is not ready for this approver",
        ));
    }
    request.approve(actor);
    tracing::debug!(request_id = %request.id, approver = %actor.id, "shift swap approved");
    Ok(())
}

/// Reject a swap whose partner has already accepted, with a mandatory reason.
pub fn reject(request: &mut ShiftSwapRequest, actor: &Employee, reason: &str) -> Result<(), WorkflowError> {
    validate_reason(reason)?;
    let caps = capabilities::for_swap(actor, request);
    if !caps.can_approve {
        return Err(WorkflowError::invalid_transition(
            "shift swap is not ready for this approver",
        ));
    }
    request.reject(actor, reason.trim().to_string());
    tracing::debug!(request_id = %request.id, approver = %actor.id, "shift swap rejected");
    Ok(())
}

/// Record the partner's accept or decline while the response window is open.
///
/// Declining requires a reason and terminates the request outright.
pub fn partner_respond(
    request: &mut ShiftSwapRequest,
    actor: &Employee,
    action: PartnerAction,
    reason: Option<&str>,
) -> Result<(), WorkflowError> {
    if action == PartnerAction::Decline {
        validate_reason(reason.unwrap_or_default())?;
    }
    let caps = capabilities::for_swap(actor, request);
    if !caps.can_act_as_partner {
        return Err(WorkflowError::invalid_transition(
            "partner response window is closed",
        ));
    }
    match action {
        PartnerAction::Accept => request.partner_accept(),
        PartnerAction::Decline => {
            request.partner_decline(reason.unwrap_or_default().trim().to_string())
        }
    }
    tracing::debug!(
        request_id = %request.id,
        action = action.as_str(),
        "partner responded to shift swap"
    );
    Ok(())
}

/// Withdraw a swap as its requester while the partner is still waiting.
pub fn cancel(request: &mut ShiftSwapRequest, actor: &Employee, reason: &str) -> Result<(), WorkflowError> {
    validate_reason(reason)?;
    let caps = capabilities::for_swap(actor, request);
    if !caps.can_cancel_as_requester {
        return Err(WorkflowError::invalid_transition(
            "shift swap can no longer be canceled by its requester",
        ));
    }
    request.cancel(reason.trim().to_string());
    tracing::debug!(request_id = %request.id, "shift swap canceled by requester");
    Ok(())
}
