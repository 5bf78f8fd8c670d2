//! Validation rules shared across workflow entry points and form payloads.

pub mod rules;

pub use validator::Validate;
