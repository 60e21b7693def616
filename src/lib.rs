//! PALLETBID — liquidation pallet valuation and bid-sensitivity engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod storage;
pub mod types;
pub mod valuation;
