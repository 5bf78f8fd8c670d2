//! Pure workflow domain for the ShiftDesk scheduling dashboard.
//!
//! This crate holds everything that is synchronous and side-effect free: the
//! canonical request schema, the role/capability resolver, the approval state
//! machine for leave and shift-swap requests, validation rules, and the
//! decision narrative builder. Transport, caching, and reconciliation against
//! the backend of record live in the companion `shiftdesk-client` crate.

pub mod error;
pub mod models;
pub mod narrative;
pub mod validation;
pub mod workflow;
