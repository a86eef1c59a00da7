//! # TaskFlow Shared Library
//!
//! Data model, persistence and analytics for the TaskFlow API server.
//!
//! ## Module Organization
//!
//! - `models`: Tasks, users and their request structures
//! - `repository`: Entity repository trait, document conversion, and the
//!   PostgreSQL and in-memory document stores
//! - `db`: Connection pool management and collection bootstrap
//! - `analytics`: Derived task counts and rates
//! - `error`: Storage error types

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;

/// Current version of the TaskFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
