//! Domain types for the document checker.
//!
//! This module contains the plain data structures:
//! - Document: An uploaded file
//! - Report: Contradictions found by one analysis run
//! - UsageStats: Session counters and billing
//! - ExternalUpdate: Synthetic policy change notifications

pub mod document;
pub mod report;
pub mod update;
pub mod usage;

// Re-export commonly used types
pub use document::{format_size, Document};
pub use report::{Category, Contradiction, Location, Report, Severity, Summary};
pub use update::ExternalUpdate;
pub use usage::{BillingRates, UsageStats};
