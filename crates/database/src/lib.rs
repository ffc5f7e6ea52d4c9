//! # Storage Gateway
//!
//! This crate is the only part of the application that talks to PostgreSQL.
//! It owns the single connection and offers typed, high-level operations to
//! the console session on top.
//!
//! ## Architectural Principles
//!
//! - **One choke point:** every statement passes through
//!   [`StorageGateway::execute`]. It binds parameters positionally (never by
//!   string formatting), commits non-read statements, rolls back on failure,
//!   classifies the failure, logs full detail to the diagnostic log and prints
//!   one short line to the console.
//! - **Never raises:** callers get rows, an identity, or an empty result.
//!   A gateway that failed to connect keeps working in a degraded mode where
//!   every operation returns the empty result.
//! - **Single connection:** no pool, no reconnect, no concurrency. Every call
//!   is awaited by the session before the next one starts.
//!
//! ## Public API
//!
//! - `StorageGateway`: connection lifecycle, `execute`, entity CRUD, the three
//!   searches, demo data generation and sequence resynchronization.
//! - `DiagnosticLog`: the injected side channel for failure detail.
//! - `DbError` / `FailureKind`: the classified failures.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod repository;
pub mod schema;
pub mod search;
pub mod seed;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use diagnostics::DiagnosticLog;
pub use error::{DbError, FailureKind};
pub use gateway::{Exec, Executed, Param, StorageGateway};
pub use schema::Table;
pub use search::SearchResult;
pub use seed::SequenceSync;
