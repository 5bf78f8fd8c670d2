//! Wire payloads for the backend of record and their normalization into the
//! canonical workflow schema.
//!
//! The backend has grown several spellings for the same concept over time
//! (`reject_reason` vs `note`, flat vs nested approver fields, `cancelled` vs
//! `canceled`). Every fallback is absorbed here, with first-non-blank `pick`
//! semantics, so the workflow core only ever sees one schema.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shiftdesk_core::error::WorkflowError;
use shiftdesk_core::models::employee::{Employee, StaffRef, StaffRole};
use shiftdesk_core::models::leave_request::{LeaveRequest, LeaveType};
use shiftdesk_core::models::request_status::{PartnerStatus, RequestStatus};
use shiftdesk_core::models::shift_swap::{ShiftSlot, ShiftSwapRequest};
use shiftdesk_core::workflow::{DecideAction, PartnerAction};

/// Structured error body returned by the backend of record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ApiErrorBody {
    /// Whether the failure marks a request another actor already closed.
    /// The backend signals this with a machine-readable code; older
    /// deployments only carry the message text (in either language).
    pub fn is_already_processed(&self) -> bool {
        if matches!(
            self.code.as_deref(),
            Some("already_processed" | "ALREADY_PROCESSED" | "CONFLICT")
        ) {
            return true;
        }
        let message = self.message.to_lowercase();
        message.contains("already processed") || message.contains("diproses")
    }

    /// First human-readable message in the body, drilling into field errors
    /// when the top-level message is empty.
    pub fn first_message(&self) -> Option<String> {
        let trimmed = self.message.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
        let errors = self.errors.as_ref()?.as_object()?;
        errors
            .values()
            .filter_map(|value| match value {
                Value::Array(items) => items.first().and_then(Value::as_str),
                Value::String(text) => Some(text.as_str()),
                _ => None,
            })
            .map(str::to_string)
            .next()
    }
}

/// Collection payloads arrive either raw or wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Wrapped { data: Vec<T> },
    Raw(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Wrapped { data } => data,
            ListPayload::Raw(items) => items,
        }
    }
}

/// Embedded party object; ids arrive as numbers or strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyDto {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl PartyDto {
    fn into_staff_ref(self, context: &str) -> Result<StaffRef, WorkflowError> {
        let id = self
            .id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| malformed(format!("{context} is missing an id")))?;
        Ok(StaffRef {
            id,
            name: self.name.unwrap_or_default(),
            role: self
                .role
                .as_deref()
                .and_then(StaffRole::parse)
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftSlotDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl From<ShiftSlotDto> for ShiftSlot {
    fn from(dto: ShiftSlotDto) -> Self {
        ShiftSlot {
            name: dto.name.unwrap_or_default(),
            code: dto.code.unwrap_or_default(),
        }
    }
}

/// Raw leave request row as the backend sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveRequestDto {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub employee: Option<PartyDto>,
    #[serde(default, rename = "type", alias = "leave_type")]
    pub leave_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub approver: Option<PartyDto>,
    #[serde(default)]
    pub approved_by_id: Option<Value>,
    #[serde(default)]
    pub approved_by_name: Option<String>,
    #[serde(default)]
    pub approved_by_role: Option<String>,
    #[serde(default)]
    pub rejected_by_id: Option<Value>,
    #[serde(default)]
    pub rejected_by_name: Option<String>,
    #[serde(default)]
    pub rejected_by_role: Option<String>,
    #[serde(default)]
    pub reject_reason: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    #[serde(default, alias = "cancelled_by_name")]
    pub canceled_by_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeaveRequestDto {
    pub fn into_domain(self) -> Result<LeaveRequest, WorkflowError> {
        let id = self
            .id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| malformed("leave request is missing an id"))?;
        let employee = self
            .employee
            .clone()
            .unwrap_or_default()
            .into_staff_ref("leave request employee")?;
        let leave_type = self
            .leave_type
            .as_deref()
            .and_then(LeaveType::parse)
            .ok_or_else(|| malformed("leave request has an unknown type"))?;
        let start_date = self
            .start_date
            .ok_or_else(|| malformed("leave request is missing start_date"))?;
        let end_date = self.end_date.unwrap_or(start_date);
        let status = parse_status(self.status.as_deref())?;
        let (approver_id, approver_name, approver_role) = self.approver_fields(status);
        let now = Utc::now();

        Ok(LeaveRequest {
            id,
            employee,
            leave_type,
            start_date,
            end_date,
            reason: pick(&[&self.reason]),
            status,
            approver_id,
            approver_name,
            approver_role,
            reject_reason: (status == RequestStatus::Rejected)
                .then(|| pick(&[&self.reject_reason, &self.note]))
                .flatten(),
            cancel_reason: (status == RequestStatus::Canceled)
                .then(|| pick(&[&self.cancel_reason, &self.note]))
                .flatten(),
            canceled_by: (status == RequestStatus::Canceled)
                .then(|| pick(&[&self.canceled_by_name]))
                .flatten(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.or(self.created_at).unwrap_or(now),
        })
    }

    fn approver_fields(
        &self,
        status: RequestStatus,
    ) -> (Option<String>, Option<String>, Option<StaffRole>) {
        if let Some(approver) = &self.approver {
            return (
                approver.id.as_ref().and_then(id_string),
                pick(&[&approver.name]),
                approver.role.as_deref().and_then(StaffRole::parse),
            );
        }
        let (id, name, role) = if status == RequestStatus::Rejected {
            (
                &self.rejected_by_id,
                &self.rejected_by_name,
                &self.rejected_by_role,
            )
        } else {
            (
                &self.approved_by_id,
                &self.approved_by_name,
                &self.approved_by_role,
            )
        };
        (
            id.as_ref().and_then(id_string),
            pick(&[name]),
            role.as_deref().and_then(StaffRole::parse),
        )
    }
}

/// Raw shift-swap row as the backend sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftSwapDto {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub requester: Option<PartyDto>,
    #[serde(default)]
    pub partner: Option<PartyDto>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "requesterShift")]
    pub requester_shift: Option<ShiftSlotDto>,
    #[serde(default, alias = "partnerShift")]
    pub partner_shift: Option<ShiftSlotDto>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "partnerStatus")]
    pub partner_status: Option<String>,
    #[serde(default)]
    pub approver: Option<PartyDto>,
    #[serde(default)]
    pub approved_by_id: Option<Value>,
    #[serde(default)]
    pub approved_by_name: Option<String>,
    #[serde(default)]
    pub approved_by_role: Option<String>,
    #[serde(default)]
    pub rejected_by_id: Option<Value>,
    #[serde(default)]
    pub rejected_by_name: Option<String>,
    #[serde(default)]
    pub rejected_by_role: Option<String>,
    #[serde(default)]
    pub reject_reason: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, alias = "partnerDeclineReason")]
    pub partner_decline_reason: Option<String>,
    #[serde(default, alias = "partnerNote", alias = "note_partner")]
    pub partner_note: Option<String>,
    #[serde(default)]
    pub partner_reason: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShiftSwapDto {
    pub fn into_domain(self) -> Result<ShiftSwapRequest, WorkflowError> {
        let id = self
            .id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| malformed("shift swap is missing an id"))?;
        let requester = self
            .requester
            .clone()
            .unwrap_or_default()
            .into_staff_ref("shift swap requester")?;
        let partner = self
            .partner
            .clone()
            .unwrap_or_default()
            .into_staff_ref("shift swap partner")?;
        let date = self
            .date
            .ok_or_else(|| malformed("shift swap is missing a date"))?;
        let status = parse_status(self.status.as_deref())?;
        let partner_status = parse_partner_status(self.partner_status.as_deref())?;
        let (approver_id, approver_name, approver_role) = self.approver_fields(status);
        let now = Utc::now();

        Ok(ShiftSwapRequest {
            id,
            requester,
            partner,
            date,
            requester_shift: self.requester_shift.clone().unwrap_or_default().into(),
            partner_shift: self.partner_shift.clone().unwrap_or_default().into(),
            status,
            partner_status,
            approver_id,
            approver_name,
            approver_role,
            reject_reason: (status == RequestStatus::Rejected)
                .then(|| pick(&[&self.reject_reason, &self.note]))
                .flatten(),
            partner_reason: (partner_status == PartnerStatus::Declined)
                .then(|| {
                    pick(&[
                        &self.partner_reason,
                        &self.partner_note,
                        &self.partner_decline_reason,
                        &self.reject_reason,
                        &self.note,
                    ])
                })
                .flatten(),
            cancel_reason: (status == RequestStatus::Canceled)
                .then(|| pick(&[&self.cancel_reason, &self.note]))
                .flatten(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.or(self.created_at).unwrap_or(now),
        })
    }

    fn approver_fields(
        &self,
        status: RequestStatus,
    ) -> (Option<String>, Option<String>, Option<StaffRole>) {
        if let Some(approver) = &self.approver {
            return (
                approver.id.as_ref().and_then(id_string),
                pick(&[&approver.name]),
                approver.role.as_deref().and_then(StaffRole::parse),
            );
        }
        let (id, name, role) = if status == RequestStatus::Rejected {
            (
                &self.rejected_by_id,
                &self.rejected_by_name,
                &self.rejected_by_role,
            )
        } else {
            (
                &self.approved_by_id,
                &self.approved_by_name,
                &self.approved_by_role,
            )
        };
        (
            id.as_ref().and_then(id_string),
            pick(&[name]),
            role.as_deref().and_then(StaffRole::parse),
        )
    }
}

/// Schedule lookup result for a proposed swap: both parties' shifts on the
/// chosen date, when the schedule has them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwapPreviewDto {
    #[serde(default)]
    pub requester: Option<PreviewSideDto>,
    #[serde(default)]
    pub partner: Option<PreviewSideDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewSideDto {
    #[serde(default)]
    pub shift: Option<ShiftSlotDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapPreview {
    pub requester_shift: Option<ShiftSlot>,
    pub partner_shift: Option<ShiftSlot>,
}

impl SwapPreview {
    /// A swap may only be submitted when both parties are scheduled.
    pub fn is_ready(&self) -> bool {
        self.requester_shift.is_some() && self.partner_shift.is_some()
    }
}

impl From<SwapPreviewDto> for SwapPreview {
    fn from(dto: SwapPreviewDto) -> Self {
        SwapPreview {
            requester_shift: dto.requester.and_then(|side| side.shift).map(Into::into),
            partner_shift: dto.partner.and_then(|side| side.shift).map(Into::into),
        }
    }
}

/// Roster entry from the employee directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeDto {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "fullname", alias = "employee_name")]
    pub name: Option<String>,
    #[serde(default, alias = "employee_nik")]
    pub nik: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "is_system_admin")]
    pub is_superuser: bool,
}

impl EmployeeDto {
    pub fn into_domain(self) -> Result<Employee, WorkflowError> {
        let id = self
            .id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| malformed("employee is missing an id"))?;
        Ok(Employee {
            id,
            name: self.name.unwrap_or_default(),
            nik: pick(&[&self.nik]),
            role: self
                .role
                .as_deref()
                .and_then(StaffRole::parse)
                .unwrap_or_default(),
            is_superuser: self.is_superuser,
        })
    }
}

/// A shift definition from the roster backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftType {
    pub id: String,
    pub name: String,
    pub code: String,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftTypeDto {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

impl ShiftTypeDto {
    pub fn into_domain(self) -> Result<ShiftType, WorkflowError> {
        let id = self
            .id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| malformed("shift type is missing an id"))?;
        Ok(ShiftType {
            id,
            name: self.name.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

/// Body submitted with an approver decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecideBody {
    pub action: DecideAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body submitted with a partner response.
#[derive(Debug, Clone, Serialize)]
pub struct PartnerBody {
    pub action: PartnerAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body submitted with a requester cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct RequesterCancelBody {
    pub action: &'static str,
    pub note: String,
}

impl RequesterCancelBody {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            action: "cancel",
            note: note.into(),
        }
    }
}

/// First non-blank candidate, in declaration order.
fn pick(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn malformed(msg: impl Into<String>) -> WorkflowError {
    WorkflowError::transport(format!("malformed response: {}", msg.into()))
}

fn parse_status(raw: Option<&str>) -> Result<RequestStatus, WorkflowError> {
    match raw {
        None => Ok(RequestStatus::Pending),
        Some(value) => RequestStatus::parse(value)
            .ok_or_else(|| malformed(format!("unknown request status `{value}`"))),
    }
}

fn parse_partner_status(raw: Option<&str>) -> Result<PartnerStatus, WorkflowError> {
    match raw {
        None => Ok(PartnerStatus::Waiting),
        Some(value) => PartnerStatus::parse(value)
            .ok_or_else(|| malformed(format!("unknown partner status `{value}`"))),
    }
}
