//! Core session logic.
//!
//! This module contains:
//! - DocumentStore: Ordered in-memory documents
//! - UploadIntake: Validation, capacity cap and content reads
//! - AnalysisEngine: Three-phase mock analysis and report generation
//! - UsageAccumulator: Usage counters and billing
//! - Session: Application state wiring the above together

pub mod billing;
pub mod catalog;
pub mod engine;
pub mod intake;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use billing::UsageAccumulator;
pub use catalog::{catalog, Template};
pub use engine::{
    generate_report, AnalysisEngine, AnalysisError, EnginePhase, MAX_CONTRADICTIONS,
    MIN_CONTRADICTIONS,
};
pub use intake::{EntryPath, IntakeError, IntakeOutcome, IntakePolicy, UploadIntake};
pub use session::Session;
pub use store::{DocumentStore, StoreError, MIN_DOCUMENTS_FOR_ANALYSIS};
