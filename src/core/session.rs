//! Session state: the object that ties the components together.
//!
//! A session owns the document store, the intake, the analysis engine and
//! the usage counters. It is created once per user session and dropped
//! with it; nothing here lives in a global.

use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::adapters::FileSource;
use crate::config::Settings;
use crate::domain::{Document, Report, UsageStats};

use super::billing::UsageAccumulator;
use super::engine::{AnalysisEngine, AnalysisError, EnginePhase};
use super::intake::{EntryPath, IntakeOutcome, UploadIntake};
use super::store::DocumentStore;

/// One user's in-memory working set
pub struct Session {
    store: DocumentStore,
    intake: UploadIntake,
    engine: AnalysisEngine,
    usage: UsageAccumulator,
}

impl Session {
    /// Start a session; fails if any setting is out of range
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        Ok(Self {
            store: DocumentStore::new(),
            intake: UploadIntake::new(&settings.intake),
            engine: AnalysisEngine::new(settings.analysis.clone(), settings.seed)?,
            usage: UsageAccumulator::new(settings.billing),
        })
    }

    /// Upload a batch of files
    pub async fn upload<I, S>(&mut self, files: I, entry: EntryPath) -> IntakeOutcome
    where
        I: IntoIterator<Item = S>,
        S: FileSource,
    {
        self.intake.upload(&mut self.store, files, entry).await
    }

    /// Remove a document; returns false if it was not present
    pub fn remove_document(&mut self, id: Uuid) -> bool {
        self.store.remove(id).is_some()
    }

    pub fn documents(&self) -> &[Document] {
        self.store.documents()
    }

    pub fn can_analyze(&self) -> bool {
        self.store.can_analyze()
    }

    /// Whether the file cap has been reached
    pub fn is_full(&self) -> bool {
        self.intake.is_full(&self.store)
    }

    /// Analyze every stored document and record usage
    pub async fn analyze(&mut self) -> Result<&Report, AnalysisError> {
        let document_count = self.store.len();
        let report = self.engine.analyze(self.store.documents()).await?;
        self.usage.record(document_count, report);
        Ok(report)
    }

    /// Discard the report and every document, returning to idle
    pub fn clear_analysis(&mut self) {
        self.engine.clear();
        self.store.clear();
        info!("Analysis cleared");
    }

    pub fn report(&self) -> Option<&Report> {
        self.engine.report()
    }

    pub fn phase(&self) -> EnginePhase {
        self.engine.phase()
    }

    pub fn subscribe(&self) -> watch::Receiver<EnginePhase> {
        self.engine.subscribe()
    }

    pub fn usage(&self) -> &UsageStats {
        self.usage.stats()
    }

    pub fn intake(&self) -> &UploadIntake {
        &self.intake
    }

    pub fn billing(&self) -> &UsageAccumulator {
        &self.usage
    }
}
