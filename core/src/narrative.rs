//! Derives human-readable decision summaries from raw request state.
//!
//! Used for both table rows and notification text. The display rules are
//! ordered; the first matching condition wins, so a partner decline always
//! reads as the outcome even though the approver track still says pending.

use crate::models::employee::StaffRole;
use crate::models::leave_request::LeaveRequest;
use crate::models::request_status::{PartnerStatus, RequestStatus};
use crate::models::shift_swap::ShiftSwapRequest;
use crate::workflow::capabilities::inferred_approver_role;

/// Tone of a narrative line; the presentation layer maps this to styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Positive,
    Negative,
    Neutral,
}

/// One audit line describing where a request stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub label: String,
    pub text: Option<String>,
    pub severity: Severity,
}

/// Builds the audit line for a shift-swap request.
pub fn describe_swap(request: &ShiftSwapRequest) -> Narrative {
    if request.display_partner_status() == PartnerStatus::Declined {
        return Narrative {
            label: format!("Declined by partner ({})", request.partner.name),
            text: request.partner_reason.clone(),
            severity: Severity::Negative,
        };
    }

    match request.status {
        RequestStatus::Pending => {
            if request.partner_status == PartnerStatus::Accepted {
                Narrative {
                    label: format!("Awaiting approver ({})", approver_role_text(request)),
                    text: Some(format!("{} has accepted", request.partner.name)),
                    severity: Severity::Neutral,
                }
            } else {
                Narrative {
                    label: "Awaiting partner response".to_string(),
                    text: Some(request.partner.name.clone()),
                    severity: Severity::Neutral,
                }
            }
        }
        RequestStatus::Approved => Narrative {
            label: format!("Approved by {}", approver_role_text(request)),
            text: request.approver_name.clone(),
            severity: Severity::Positive,
        },
        RequestStatus::Rejected => Narrative {
            label: format!("Rejected by approver ({})", approver_role_text(request)),
            text: request.reject_reason.clone(),
            severity: Severity::Negative,
        },
        RequestStatus::Canceled => Narrative {
            label: format!("Canceled by requester ({})", request.requester.name),
            text: request.cancel_reason.clone(),
            severity: Severity::Neutral,
        },
    }
}

/// Builds the audit line for a leave request.
pub fn describe_leave(request: &LeaveRequest) -> Narrative {
    match request.status {
        RequestStatus::Pending => Narrative {
            label: format!(
                "Awaiting approver ({})",
                role_text(request.approver_role, request)
            ),
            text: None,
            severity: Severity::Neutral,
        },
        RequestStatus::Approved => Narrative {
            label: format!("Approved by {}", role_text(request.approver_role, request)),
            text: request.approver_name.clone(),
            severity: Severity::Positive,
        },
        RequestStatus::Rejected => Narrative {
            label: format!(
                "Rejected by approver ({})",
                role_text(request.approver_role, request)
            ),
            text: request.reject_reason.clone(),
            severity: Severity::Negative,
        },
        RequestStatus::Canceled => {
            let by = request
                .canceled_by
                .clone()
                .unwrap_or_else(|| request.employee.name.clone());
            Narrative {
                label: format!("Canceled by requester ({by})"),
                text: request.cancel_reason.clone(),
                severity: Severity::Neutral,
            }
        }
    }
}

/// Character-limited snippet for table rows; the caller shows the full text
/// on demand when the returned flag says it was truncated.
pub fn truncate_reason(text: &str, limit: usize) -> (String, bool) {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        (trimmed.to_string(), false)
    } else {
        let short: String = trimmed.chars().take(limit).collect();
        (format!("{short}..."), true)
    }
}

fn approver_role_text(request: &ShiftSwapRequest) -> String {
    request
        .approver_role
        .unwrap_or_else(|| inferred_approver_role(request.requester.role))
        .as_str()
        .to_ascii_uppercase()
}

fn role_text(recorded: Option<StaffRole>, request: &LeaveRequest) -> String {
    recorded
        .unwrap_or_else(|| inferred_approver_role(request.employee.role))
        .as_str()
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::{Employee, StaffRef, StaffRole};
    use crate::models::leave_request::LeaveType;
    use crate::models::shift_swap::ShiftSlot;
    use chrono::NaiveDate;

    fn swap() -> ShiftSwapRequest {
        let requester = Employee::new("e1", "Budi", StaffRole::Employee);
        let partner = Employee::new("e2", "Sari", StaffRole::Employee);
        ShiftSwapRequest::new(
            StaffRef::from(&requester),
            StaffRef::from(&partner),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ShiftSlot::default(),
            ShiftSlot::default(),
        )
    }

    fn leave() -> LeaveRequest {
        let employee = Employee::new("e1", "Budi", StaffRole::Employee);
        LeaveRequest::new(
            StaffRef::from(&employee),
            LeaveType::Cuti,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            None,
        )
    }

    #[test]
    fn waiting_partner_reads_neutral() {
        let narrative = describe_swap(&swap());
        assert_eq!(narrative.label, "Awaiting partner response");
        assert_eq!(narrative.severity, Severity::Neutral);
        assert_eq!(narrative.text.as_deref(), Some("Sari"));
    }

    #[test]
    fn accepted_partner_infers_approver_role() {
        let mut request = swap();
        request.partner_accept();
        let narrative = describe_swap(&request);
        assert_eq!(narrative.label, "Awaiting approver (COS)");
    }

    #[test]
    fn partner_decline_wins_over_everything() {
        let mut request = swap();
        request.partner_decline("too busy".to_string());
        let narrative = describe_swap(&request);
        assert_eq!(narrative.label, "Declined by partner (Sari)");
        assert_eq!(narrative.text.as_deref(), Some("too busy"));
        assert_eq!(narrative.severity, Severity::Negative);
    }

    #[test]
    fn approved_swap_names_approver() {
        let mut request = swap();
        request.partner_accept();
        request.approve(&Employee::new("c1", "Dina", StaffRole::Cos));
        let narrative = describe_swap(&request);
        assert_eq!(narrative.label, "Approved by COS");
        assert_eq!(narrative.text.as_deref(), Some("Dina"));
        assert_eq!(narrative.severity, Severity::Positive);
    }

    #[test]
    fn rejected_swap_carries_reason() {
        let mut request = swap();
        request.partner_accept();
        request.reject(
            &Employee::new("c1", "Dina", StaffRole::Cos),
            "insufficient coverage".to_string(),
        );
        let narrative = describe_swap(&request);
        assert_eq!(narrative.label, "Rejected by approver (COS)");
        assert_eq!(narrative.text.as_deref(), Some("insufficient coverage"));
    }

    #[test]
    fn canceled_swap_names_requester() {
        let mut request = swap();
        request.cancel("plans changed".to_string());
        let narrative = describe_swap(&request);
        assert_eq!(narrative.label, "Canceled by requester (Budi)");
        assert_eq!(narrative.severity, Severity::Neutral);
    }

    #[test]
    fn pending_leave_infers_role_from_requester_tier() {
        let narrative = describe_leave(&leave());
        assert_eq!(narrative.label, "Awaiting approver (COS)");

        let mut cos_request = leave();
        cos_request.employee.role = StaffRole::Cos;
        let narrative = describe_leave(&cos_request);
        assert_eq!(narrative.label, "Awaiting approver (ADMIN)");
    }

    #[test]
    fn rejected_leave_uses_recorded_role() {
        let mut request = leave();
        request.reject(
            &Employee::new("c1", "Dina", StaffRole::Cos),
            "headcount".to_string(),
        );
        let narrative = describe_leave(&request);
        assert_eq!(narrative.label, "Rejected by approver (COS)");
        assert_eq!(narrative.text.as_deref(), Some("headcount"));
    }

    #[test]
    fn truncation_marks_long_reasons() {
        let (short, truncated) = truncate_reason("a very long explanation", 11);
        assert_eq!(short, "a very long...");
        assert!(truncated);

        let (full, truncated) = truncate_reason("  short  ", 11);
        assert_eq!(full, "short");
        assert!(!truncated);
    }
}
