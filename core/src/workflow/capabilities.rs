//! Pure resolver for what a given staff member may do to a given request.
//!
//! Every call site that needs a permission decision goes through this module;
//! the transition functions never re-derive eligibility themselves.

use crate::models::employee::{Employee, StaffRole};
use crate::models::leave_request::LeaveRequest;
use crate::models::request_status::{PartnerStatus, RequestStatus};
use crate::models::shift_swap::ShiftSwapRequest;

/// What the acting user may do with one specific request row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Actor is the swap partner and the response window is still open.
    pub can_act_as_partner: bool,
    /// Actor may issue the final approve/reject decision.
    pub can_approve: bool,
    /// Actor is the requester and may still withdraw the request.
    pub can_cancel_as_requester: bool,
    /// Actor may hard-delete the record (administrative purge, not a
    /// workflow transition).
    pub can_delete: bool,
}

/// Roles allowed to decide a request submitted by `requester_role`.
///
/// Requests from the top of the hierarchy have no role-based approver; only a
/// superuser can decide those.
pub fn approver_roles_for(requester_role: StaffRole) -> &'static [StaffRole] {
    match requester_role {
        StaffRole::Employee | StaffRole::Acos => &[StaffRole::Cos],
        StaffRole::Cos => &[StaffRole::Ac, StaffRole::Admin],
        StaffRole::Ac | StaffRole::Admin => &[],
    }
}

/// Role displayed while a request is still waiting for its approver.
pub fn inferred_approver_role(requester_role: StaffRole) -> StaffRole {
    match requester_role {
        StaffRole::Employee | StaffRole::Acos => StaffRole::Cos,
        StaffRole::Cos | StaffRole::Ac | StaffRole::Admin => StaffRole::Admin,
    }
}

/// Whether `actor` outranks `requester_role` for approval purposes.
pub fn can_role_approve(actor: &Employee, requester_role: StaffRole) -> bool {
    actor.is_superuser || approver_roles_for(requester_role).contains(&actor.role)
}

/// Resolves the actor's capabilities against a leave request.
pub fn for_leave(actor: &Employee, request: &LeaveRequest) -> Capabilities {
    let pending = request.status == RequestStatus::Pending;
    Capabilities {
        can_act_as_partner: false,
        can_approve: pending && can_role_approve(actor, request.employee.role),
        can_cancel_as_requester: pending && actor.id == request.employee.id,
        can_delete: actor.role == StaffRole::Admin,
    }
}

/// Resolves the actor's capabilities against a shift-swap request.
///
/// The approver track only opens once the partner accepted; partner and
/// requester actions close as soon as either track moves.
pub fn for_swap(actor: &Employee, request: &ShiftSwapRequest) -> Capabilities {
    let pending = request.status == RequestStatus::Pending;
    let waiting = request.partner_status == PartnerStatus::Waiting;
    Capabilities {
        can_act_as_partner: pending && waiting && actor.id == request.partner.id,
        can_approve: pending
            && request.partner_status == PartnerStatus::Accepted
            && can_role_approve(actor, request.requester.role),
        can_cancel_as_requester: pending && waiting && actor.id == request.requester.id,
        can_delete: actor.role == StaffRole::Admin,
    }
}
