//! # Taskforge API Server Library
//!
//! This library provides the core functionality for the Taskforge API server:
//! a token-authenticated REST API for managing personal to-do tasks.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `resources`: Response representations of domain models
//! - `response`: The `{success, message, data}` envelope and pagination blocks
//! - `routes`: API route handlers
//! - `services`: Task and auth business logic plus audit logging

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod resources;
pub mod response;
pub mod routes;
pub mod services;
