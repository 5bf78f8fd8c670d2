//! Shift-swap request records and their two decision tracks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::employee::{Employee, StaffRef, StaffRole};
use crate::models::request_status::{PartnerStatus, RequestStatus};

/// A shift slot resolved from the monthly schedule for one party.
///
/// Both slots on a swap come from a schedule lookup for the chosen date; they
/// are never entered freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub name: String,
    pub code: String,
}

/// A shift-swap request: the requester proposes to exchange shifts with a
/// partner on one date, the partner accepts or declines, and only an accepted
/// swap reaches the approver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSwapRequest {
    pub id: String,
    pub requester: StaffRef,
    pub partner: StaffRef,
    pub date: NaiveDate,
    pub requester_shift: ShiftSlot,
    pub partner_shift: ShiftSlot,
    pub status: RequestStatus,
    pub partner_status: PartnerStatus,
    pub approver_id: Option<String>,
    pub approver_name: Option<String>,
    pub approver_role: Option<StaffRole>,
    pub reject_reason: Option<String>,
    pub partner_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload submitted when a requester proposes a swap. The backend resolves
/// both parties' shifts from the schedule for the chosen date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShiftSwapRequest {
    pub partner_id: String,
    pub date: NaiveDate,
}

impl ShiftSwapRequest {
    pub fn new(
        requester: StaffRef,
        partner: StaffRef,
        date: NaiveDate,
        requester_shift: ShiftSlot,
        partner_shift: ShiftSlot,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            requester,
            partner,
            date,
            requester_shift,
            partner_shift,
            status: RequestStatus::Pending,
            partner_status: PartnerStatus::Waiting,
            approver_id: None,
            approver_name: None,
            approver_role: None,
            reject_reason: None,
            partner_reason: None,
            cancel_reason: None,
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

    pub fn partner_accept(&mut self) {
        self.partner_status = PartnerStatus::Accepted;
        self.updated_at = Utc::now();
    }

    /// A partner decline terminates the whole request; the approver never
    /// gets to act afterwards.
    pub fn partner_decline(&mut self, reason: String) {
        self.partner_status = PartnerStatus::Declined;
        self.partner_reason = Some(reason);
        self.updated_at = Utc::now();
    }

    /// Requester cancellation closes both tracks: a still-waiting partner is
    /// frozen to canceled so no partner action remains valid.
    pub fn cancel(&mut self, reason: String) {
        self.status = RequestStatus::Canceled;
        self.cancel_reason = Some(reason);
        if self.partner_status == PartnerStatus::Waiting {
            self.partner_status = PartnerStatus::Canceled;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    /// Terminal once the approver decided, the requester canceled, or the
    /// partner declined.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal() || self.partner_status == PartnerStatus::Declined
    }

    /// Partner track as shown to users. Records written before the freeze
    /// rule existed can still arrive as `(canceled, waiting)`; they display
    /// as canceled.
    pub fn display_partner_status(&self) -> PartnerStatus {
        if self.status == RequestStatus::Canceled {
            PartnerStatus::Canceled
        } else {
            self.partner_status
        }
    }

    fn record_approver(&mut self, approver: &Employee) {
        self.approver_id = Some(approver.id.clone());
        self.approver_name = Some(approver.name.clone());
        self.approver_role = Some(approver.role);
    }
}
