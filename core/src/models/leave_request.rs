use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::employee::{Employee, StaffRef, StaffRole};
use crate::models::request_status::RequestStatus;

/// A leave request moving through the single-approver workflow.
///
/// Created pending by employee submission, mutated exactly once into a
/// terminal state by an authorized actor, then immutable (hard delete is an
/// administrative purge, not a transition).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: String,
    pub employee: StaffRef,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub approver_id: Option<String>,
    pub approver_name: Option<String>,
    pub approver_role: Option<StaffRole>,
    pub reject_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub canceled_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leave categories used by the roster backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Short personal permission.
    Izin,
    /// Annual vacation.
    Cuti,
    /// Sick leave.
    Sakit,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Izin => "izin",
            LeaveType::Cuti => "cuti",
            LeaveType::Sakit => "sakit",
        }
    }

    /// Minimum notice in days before the leave may start: izin/sakit start
    /// tomorrow at the earliest, cuti needs a week.
    pub fn lead_days(&self) -> u64 {
        match self {
            LeaveType::Cuti => 7,
            LeaveType::Izin | LeaveType::Sakit => 1,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "izin" => Some(LeaveType::Izin),
            "cuti" => Some(LeaveType::Cuti),
            "sakit" => Some(LeaveType::Sakit),
            _ => None,
        }
    }
}

/// Payload submitted when an employee files a new leave request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeaveRequest {
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl LeaveRequest {
    pub fn new(
        employee: StaffRef,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            employee,
            leave_type,
            start_date,
            end_date,
            reason,
            status: RequestStatus::Pending,
            approver_id: None,
            approver_name: None,
            approver_role: None,
            reject_reason: None,
            cancel_reason: None,
            canceled_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn approve(&mut self, approver: &Employee) {
        self.status = RequestStatus::Approved;
        self.record_approver(approver);
        self.updated_at = Utc::now();
    }

    pub fn reject(&mut self, approver: &Employee, reason: String) {
        self.status = RequestStatus::Rejected;
        self.record_approver(approver);
        self.reject_reason = Some(reason);
        self.updated_at = Utc::now();
    }

    pub fn cancel(&mut self, actor: &Employee, reason: String) {
        self.status = RequestStatus::Canceled;
        self.cancel_reason = Some(reason);
        self.canceled_by = Some(actor.name.clone());
        self.updated_at = Utc::now();
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    fn record_approver(&mut self, approver: &Employee) {
        self.approver_id = Some(approver.id.clone());
        self.approver_name = Some(approver.name.clone());
        self.approver_role = Some(approver.role);
    }
}
