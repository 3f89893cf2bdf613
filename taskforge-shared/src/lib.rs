//! # Taskforge Shared Library
//!
//! Shared types and logic for the Taskforge API server: domain models,
//! authentication primitives, the task query engine, and database plumbing.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their operations
//! - `auth`: Password hashing, token issuance, request authentication
//! - `query`: Task filtering, sorting, and pagination
//! - `repo`: Task persistence port and the Postgres adapter
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod query;
pub mod repo;

/// Current version of the Taskforge shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
