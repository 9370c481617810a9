//! # Commander Stats
//!
//! Match log tracking and performance analytics for Commander games.
//!
//! ## Architecture
//!
//! - **models**: Match log records and derived statistics
//! - **calculate**: The pure statistics engine (`compute_stats`)
//! - **cache**: Fingerprint-keyed memoization of computed reports
//! - **integrity**: Data-integrity checks over the match log
//! - **storage**: File-backed match log (JSON or JSONL)
//! - **api**: Read-only REST API endpoints
//! - **report**: Plain-text report rendering
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod integrity;
pub mod models;
pub mod report;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use calculate::compute_stats;
pub use models::*;
