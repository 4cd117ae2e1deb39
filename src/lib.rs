//! doccheck - Document contradiction checker
//!
//! Upload a handful of policy documents and get a report of the places
//! where they contradict each other. Analysis is simulated: reports are
//! drawn from a fixed catalog of canned conflicts and attributed to the
//! uploaded file names.
//!
//! # Components
//!
//! - Document store: ordered in-memory documents for one session
//! - Upload intake: acceptance policy, file cap and content reads
//! - Analysis engine: `Idle -> Analyzing -> Ready` with a simulated delay
//! - Usage accumulator: session counters and billing
//! - External monitor: timer-driven synthetic policy updates
//!
//! # Modules
//!
//! - `adapters`: File sources (local filesystem, in-memory)
//! - `core`: Store, intake, engine, billing and the `Session` object
//! - `domain`: Data structures (Document, Report, UsageStats, ExternalUpdate)
//! - `monitor`: External update simulator
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Analyze two or more documents
//! doccheck analyze handbook.txt syllabus.txt
//!
//! # Watch for simulated policy updates for two minutes
//! doccheck monitor --duration 120 --activate
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod monitor;

// Re-export main types at crate root for convenience
pub use crate::adapters::{FileSource, LocalFile, MemoryFile, SourceError};
pub use crate::config::Settings;
pub use crate::core::{AnalysisError, EnginePhase, EntryPath, IntakeOutcome, Session};
pub use crate::domain::{Contradiction, Document, ExternalUpdate, Report, Severity, UsageStats};
pub use crate::monitor::{ExternalUpdateSimulator, MonitorHandle};
