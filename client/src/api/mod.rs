//! Typed HTTP boundary against the backend of record.

pub mod client;
pub mod types;

pub use client::ApiClient;
