//! # Social Pulse Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL
//! warehouse that holds account snapshots, published posts and scheduled
//! post ideas.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the application sees plain
//!   `core-types` records and never touches a connection.
//! - **Configurable Locations:** Table names come from the `[warehouse]`
//!   configuration section and are validated as plain identifiers before they
//!   reach a query.
//! - **Asynchronous & Pooled:** All operations are asynchronous over a shared
//!   `PgPool`.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies the embedded migrations once the configured
//!   `[warehouse]` layout is confirmed to match them.
//! - `DbRepository`: Reads snapshots, posts and post ideas and saves new ideas.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{check_migrated_layout, connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
