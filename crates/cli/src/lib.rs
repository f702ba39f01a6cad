//! Terminal output helpers for the ZeroApp Builder CLI
//!
//! - Status lines and key/value summaries
//! - Spinners for builds
//! - Human-readable sizes, durations and counts

#![warn(missing_docs)]

pub mod output;
pub mod progress;
