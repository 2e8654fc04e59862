//! # Social Pulse Analytics
//!
//! This crate turns raw account snapshots and post records into the numbers the
//! account overview shows: a gap-free daily table, trailing-window KPIs and the
//! period-over-period change of every KPI.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   warehouse or the terminal. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every operation is a pure function of its
//!   borrowed inputs. Nothing is cached and nothing is mutated, so the same
//!   inputs always produce the same records.
//!
//! ## Public API
//!
//! - `join_daily`: Buckets posts by day and joins them onto the account snapshots.
//! - `AnalyticsEngine`: Computes the current and previous window `KpiSet`s.
//! - `percentage_delta`: Compares two `KpiSet`s field by field.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod delta;
pub mod engine;
pub mod error;
pub mod joiner;
pub mod report;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use delta::percentage_delta;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use joiner::join_daily;
pub use report::{AccountOverview, DeltaSet, Kpi, KpiSet};
pub use window::KpiWindow;
