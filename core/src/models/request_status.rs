//! Shared status enums for leave and shift-swap requests.

use serde::{Deserialize, Serialize};

/// Primary decision track of a request.
///
/// Canonical wire spelling is `canceled`; legacy payloads also carry
/// `cancelled` and `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(alias = "cancelled", alias = "cancel")]
    Canceled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Canceled => "canceled",
        }
    }

    /// No further transitions are permitted once a request leaves `pending`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Parses canonical and legacy wire spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            "canceled" | "cancelled" | "cancel" => Some(RequestStatus::Canceled),
            _ => None,
        }
    }
}

/// Partner decision track of a shift-swap request, independent of
/// [`RequestStatus`] until it gates the approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    #[default]
    Waiting,
    #[serde(alias = "accept")]
    Accepted,
    #[serde(alias = "decline", alias = "rejected")]
    Declined,
    /// Frozen value written when the requester cancels while the partner is
    /// still waiting; the partner can no longer act.
    #[serde(alias = "cancelled")]
    Canceled,
}

impl PartnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerStatus::Waiting => "waiting",
            PartnerStatus::Accepted => "accepted",
            PartnerStatus::Declined => "declined",
            PartnerStatus::Canceled => "canceled",
        }
    }

    /// A declined or frozen partner track admits no further partner action.
    pub fn is_closed(&self) -> bool {
        matches!(self, PartnerStatus::Declined | PartnerStatus::Canceled)
    }

    /// Parses canonical and legacy wire spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "waiting" => Some(PartnerStatus::Waiting),
            "accepted" | "accept" => Some(PartnerStatus::Accepted),
            "declined" | "decline" | "rejected" => Some(PartnerStatus::Declined),
            "canceled" | "cancelled" => Some(PartnerStatus::Canceled),
            _ => None,
        }
    }
}
