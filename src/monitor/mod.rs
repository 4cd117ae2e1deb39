//! External policy update monitoring.
//!
//! Simulates a third-party policy source that occasionally publishes
//! changes. Updates are only reported to a callback; nothing in the
//! analysis pipeline reacts to them.

pub mod simulator;

pub use simulator::{ExternalUpdateSimulator, MonitorHandle, UpdateCallback, UpdateTrigger};
