//! Approval state machine for leave and shift-swap requests.
//!
//! Transitions validate input and capability before mutating a record; a
//! record that already left the expected state is never touched. Permission
//! logic lives in [`capabilities`] only.

use serde::{Deserialize, Serialize};

pub mod capabilities;
pub mod leave;
pub mod swap;

pub use capabilities::Capabilities;

/// Decision submitted by a request's approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecideAction {
    Approve,
    Reject,
}

impl DecideAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecideAction::Approve => "approve",
            DecideAction::Reject => "reject",
        }
    }
}

/// Response submitted by a swap partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerAction {
    Accept,
    Decline,
}

impl PartnerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerAction::Accept => "accept",
            PartnerAction::Decline => "decline",
        }
    }
}
