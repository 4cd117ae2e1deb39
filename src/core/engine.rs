//! Mock analysis engine.
//!
//! Models a long-running remote analysis without making one. The engine
//! moves through three phases:
//!
//! ```text
//! Idle --analyze (>= 2 docs)--> Analyzing --delay--> Ready --clear--> Idle
//! ```
//!
//! Phase changes are published on a watch channel so a presentation layer
//! can render progress without borrowing the engine.

use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::AnalysisSettings;
use crate::domain::{Contradiction, Document, Location, Report};

use super::catalog::catalog;
use super::store::MIN_DOCUMENTS_FOR_ANALYSIS;

/// Fewest contradictions a report contains
pub const MIN_CONTRADICTIONS: usize = 2;

/// Most contradictions a report contains
pub const MAX_CONTRADICTIONS: usize = 4;

/// Errors that prevent an analysis from starting
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("At least {required} documents are required for analysis, found {found}")]
    NotEnoughDocuments { found: usize, required: usize },

    #[error("A report is already available; clear it before analyzing again")]
    ReportOutstanding,
}

/// Observable engine phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum EnginePhase {
    /// Waiting for an analysis request
    Idle,

    /// Simulated analysis in flight
    Analyzing { documents: usize },

    /// A report is available
    Ready { report_id: Uuid },
}

impl EnginePhase {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, EnginePhase::Analyzing { .. })
    }
}

/// Three-phase mock analysis state machine
pub struct AnalysisEngine {
    settings: AnalysisSettings,
    rng: StdRng,
    report: Option<Report>,
    phase: watch::Sender<EnginePhase>,
}

impl AnalysisEngine {
    /// Create an engine; a seed makes every draw reproducible
    pub fn new(settings: AnalysisSettings, seed: Option<u64>) -> Result<Self> {
        settings.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (phase, _) = watch::channel(EnginePhase::Idle);

        Ok(Self {
            settings,
            rng,
            report: None,
            phase,
        })
    }

    /// Current phase
    pub fn phase(&self) -> EnginePhase {
        self.phase.borrow().clone()
    }

    /// Receive every phase change
    pub fn subscribe(&self) -> watch::Receiver<EnginePhase> {
        self.phase.subscribe()
    }

    /// The report from the most recent analysis, if it has not been cleared
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Analyze the given documents.
    ///
    /// Suspends for a random delay within the configured range, then
    /// produces a report. Dropping the future mid-delay abandons the run
    /// and publishes `Idle` again.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn analyze(&mut self, documents: &[Document]) -> Result<&Report, AnalysisError> {
        if documents.len() < MIN_DOCUMENTS_FOR_ANALYSIS {
            return Err(AnalysisError::NotEnoughDocuments {
                found: documents.len(),
                required: MIN_DOCUMENTS_FOR_ANALYSIS,
            });
        }
        if self.report.is_some() {
            return Err(AnalysisError::ReportOutstanding);
        }

        let delay = self.draw_delay();
        let in_flight = AnalyzingGuard::start(&self.phase, documents.len());

        info!(delay_ms = delay.as_millis() as u64, "Analysis started");
        tokio::time::sleep(delay).await;

        let report = generate_report(documents, &mut self.rng);
        info!(
            report_id = %report.id,
            contradictions = report.summary.total,
            "Analysis complete"
        );

        in_flight.finish(EnginePhase::Ready {
            report_id: report.id,
        });

        Ok(&*self.report.insert(report))
    }

    /// Discard the current report and return to idle
    pub fn clear(&mut self) -> Option<Report> {
        self.phase.send_replace(EnginePhase::Idle);
        let report = self.report.take();
        if let Some(ref r) = report {
            debug!(report_id = %r.id, "Report cleared");
        }
        report
    }

    fn draw_delay(&mut self) -> Duration {
        let ms = self
            .rng
            .gen_range(self.settings.min_delay_ms..=self.settings.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Publishes `Analyzing` while alive; falls back to `Idle` unless finished
struct AnalyzingGuard<'a> {
    phase: &'a watch::Sender<EnginePhase>,
    finished: bool,
}

impl<'a> AnalyzingGuard<'a> {
    fn start(phase: &'a watch::Sender<EnginePhase>, documents: usize) -> Self {
        phase.send_replace(EnginePhase::Analyzing { documents });
        Self {
            phase,
            finished: false,
        }
    }

    fn finish(mut self, next: EnginePhase) {
        self.phase.send_replace(next);
        self.finished = true;
    }
}

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.phase.send_replace(EnginePhase::Idle);
            debug!("Analysis abandoned before completion");
        }
    }
}

/// Build a mock report for the given documents.
///
/// Takes a prefix of 2 to 4 catalog templates and attributes each one to
/// the first two documents, with random page and section locations.
pub fn generate_report<R: Rng + ?Sized>(documents: &[Document], rng: &mut R) -> Report {
    let templates = catalog();
    let count = rng
        .gen_range(MIN_CONTRADICTIONS..=MAX_CONTRADICTIONS)
        .min(templates.len());

    let sources: Vec<String> = documents.iter().take(2).map(|d| d.name.clone()).collect();

    let contradictions = templates
        .iter()
        .take(count)
        .map(|template| {
            let locations = sources
                .iter()
                .map(|name| Location {
                    document: name.clone(),
                    page: Some(rng.gen_range(1..=5)),
                    section: Some(format!("Section {}", rng.gen_range(1..=10))),
                })
                .collect();

            Contradiction {
                id: Uuid::new_v4(),
                category: template.category,
                severity: template.severity,
                source_documents: sources.clone(),
                conflicting_statements: template.statements.iter().map(|s| s.to_string()).collect(),
                explanation: template.explanation.to_string(),
                suggestion: template.suggestion.to_string(),
                locations,
            }
        })
        .collect();

    let names = documents.iter().map(|d| d.name.clone()).collect();
    Report::new(names, contradictions)
}
