//! Business logic between the HTTP handlers and storage
//!
//! Handlers validate and translate; services decide. Everything that must
//! hold regardless of transport lives here: ownership rules, creation
//! defaults, credential checks, and the audit trail.

pub mod audit;
pub mod auth;
pub mod tasks;
