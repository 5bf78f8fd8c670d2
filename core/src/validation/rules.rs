//! Common validation rules shared across request payloads.

use chrono::{Days, NaiveDate};
use validator::ValidationError;

use crate::models::leave_request::LeaveType;

/// Minimum trimmed length for decision reasons (reject, decline, cancel).
pub const MIN_REASON_LEN: usize = 3;

/// Validates a decision reason.
///
/// Requirements:
/// - Non-blank after trimming
/// - At least [`MIN_REASON_LEN`] characters
pub fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("reason_required"));
    }
    if trimmed.chars().count() < MIN_REASON_LEN {
        return Err(ValidationError::new("reason_too_short"));
    }
    Ok(())
}

/// Validates that a leave window is well-formed (start on or before end).
pub fn validate_leave_window(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::new("end_before_start"));
    }
    Ok(())
}

/// Validates the submission lead time for a leave request.
///
/// Izin and sakit may start tomorrow at the earliest; cuti requires seven
/// days of notice. This is a form-side precheck only; the backend of record
/// revalidates independently.
pub fn validate_leave_lead_time(
    leave_type: LeaveType,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let min_start = today + Days::new(leave_type.lead_days());
    if start < min_start {
        return Err(ValidationError::new("lead_time_too_short"));
    }
    Ok(())
}

/// Validates that a swap date is at least tomorrow.
pub fn validate_swap_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date <= today {
        return Err(ValidationError::new("swap_date_too_soon"));
    }
    Ok(())
}
