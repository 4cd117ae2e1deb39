//! Upload intake: validation, capacity limits and content reads.
//!
//! A batch of files goes through three stages:
//! 1. **Policy**: drop files whose extension and MIME type are both unsupported
//! 2. **Capacity**: keep at most `max_files - current count` files
//! 3. **Read**: read each file's text and append a Document to the store
//!
//! A failed read only affects its own file. Files cut by the policy or the
//! capacity cap are counted, not reported as errors.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{FileSource, SourceError};
use crate::config::IntakeSettings;
use crate::domain::Document;

use super::store::{DocumentStore, StoreError};

/// Per-file intake failures
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: SourceError,
    },

    #[error("{name} is {size} bytes, above the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("Failed to store {name}: {source}")]
    Store {
        name: String,
        #[source]
        source: StoreError,
    },
}

/// Where a batch of files came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPath {
    /// Dropped onto the upload area
    DragDrop,

    /// Chosen in a file picker
    Picker,
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPath::DragDrop => f.write_str("drag-drop"),
            EntryPath::Picker => f.write_str("picker"),
        }
    }
}

/// Which files are accepted, identical for every entry path
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    allowed_extensions: Vec<String>,
    allowed_mime_fragments: Vec<String>,
}

impl IntakePolicy {
    pub fn new(allowed_extensions: Vec<String>, allowed_mime_fragments: Vec<String>) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            allowed_mime_fragments: allowed_mime_fragments
                .into_iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Accept when the extension is allowed or the MIME type matches a fragment
    pub fn accepts(&self, name: &str, mime_type: &str) -> bool {
        let ext_ok = name
            .rsplit_once('.')
            .map(|(_, ext)| {
                self.allowed_extensions
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false);

        let mime = mime_type.to_ascii_lowercase();
        let mime_ok = self
            .allowed_mime_fragments
            .iter()
            .any(|fragment| mime.contains(fragment.as_str()));

        ext_ok || mime_ok
    }
}

impl From<&IntakeSettings> for IntakePolicy {
    fn from(settings: &IntakeSettings) -> Self {
        Self::new(
            settings.allowed_extensions.clone(),
            settings.allowed_mime_fragments.clone(),
        )
    }
}

/// What happened to a batch
#[derive(Debug, Default)]
pub struct IntakeOutcome {
    /// Ids of the documents added, in order
    pub added: Vec<Uuid>,

    /// Names rejected by the acceptance policy
    pub rejected: Vec<String>,

    /// Names dropped because the store was full
    pub dropped: Vec<String>,

    /// Files that were accepted but could not be added
    pub failed: Vec<IntakeError>,
}

impl IntakeOutcome {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}

/// Validates files and adds them to a document store
pub struct UploadIntake {
    policy: IntakePolicy,
    max_files: usize,
    max_file_bytes: u64,
    pending: watch::Sender<HashSet<Uuid>>,
}

impl UploadIntake {
    pub fn new(settings: &IntakeSettings) -> Self {
        let (pending, _) = watch::channel(HashSet::new());
        Self {
            policy: IntakePolicy::from(settings),
            max_files: settings.max_files,
            max_file_bytes: settings.max_file_bytes,
            pending,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// How many more documents the store can take
    pub fn remaining_capacity(&self, store: &DocumentStore) -> usize {
        self.max_files.saturating_sub(store.len())
    }

    /// Whether the store has reached the file cap
    pub fn is_full(&self, store: &DocumentStore) -> bool {
        self.remaining_capacity(store) == 0
    }

    /// Watch the set of uploads whose content is still being read
    pub fn subscribe_pending(&self) -> watch::Receiver<HashSet<Uuid>> {
        self.pending.subscribe()
    }

    /// Number of uploads currently being read
    pub fn uploading(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run a batch of files through policy, capacity and read stages
    #[instrument(skip_all, fields(entry = %entry))]
    pub async fn upload<I, S>(
        &self,
        store: &mut DocumentStore,
        files: I,
        entry: EntryPath,
    ) -> IntakeOutcome
    where
        I: IntoIterator<Item = S>,
        S: FileSource,
    {
        let mut outcome = IntakeOutcome::default();

        let accepted: Vec<S> = files
            .into_iter()
            .filter(|file| {
                let ok = self.policy.accepts(file.name(), file.mime_type());
                if !ok {
                    debug!(name = file.name(), mime = file.mime_type(), "File rejected by policy");
                    outcome.rejected.push(file.name().to_string());
                }
                ok
            })
            .collect();

        let capacity = self.remaining_capacity(store);
        let mut accepted = accepted.into_iter();
        let batch: Vec<S> = accepted.by_ref().take(capacity).collect();
        outcome.dropped = accepted.map(|f| f.name().to_string()).collect();

        if !outcome.dropped.is_empty() {
            debug!(dropped = outcome.dropped.len(), capacity, "File cap reached, extra files ignored");
        }

        for file in batch {
            match self.ingest_one(store, &file).await {
                Ok(id) => outcome.added.push(id),
                Err(e) => {
                    warn!("Upload failed: {}", e);
                    outcome.failed.push(e);
                }
            }
        }

        info!(
            added = outcome.added.len(),
            rejected = outcome.rejected.len(),
            dropped = outcome.dropped.len(),
            failed = outcome.failed.len(),
            "Upload batch processed"
        );

        outcome
    }

    /// Read one file and add it to the store
    async fn ingest_one<S: FileSource>(
        &self,
        store: &mut DocumentStore,
        file: &S,
    ) -> Result<Uuid, IntakeError> {
        let name = file.name().to_string();

        if file.size() > self.max_file_bytes {
            return Err(IntakeError::TooLarge {
                name,
                size: file.size(),
                limit: self.max_file_bytes,
            });
        }

        let read = {
            let _pending = PendingUpload::insert(&self.pending);
            file.read_text().await
        };

        let content = read.map_err(|source| IntakeError::Read {
            name: name.clone(),
            source,
        })?;

        let document = Document::new(name.clone(), file.size(), file.mime_type()).with_content(content);
        let id = document.id;

        store
            .add(document)
            .map_err(|source| IntakeError::Store { name, source })?;

        Ok(id)
    }
}

/// Token in the pending set, removed when dropped
struct PendingUpload<'a> {
    pending: &'a watch::Sender<HashSet<Uuid>>,
    token: Uuid,
}

impl<'a> PendingUpload<'a> {
    fn insert(pending: &'a watch::Sender<HashSet<Uuid>>) -> Self {
        let token = Uuid::new_v4();
        pending.send_modify(|set| {
            set.insert(token);
        });
        Self { pending, token }
    }
}

impl Drop for PendingUpload<'_> {
    fn drop(&mut self) {
        let token = self.token;
        self.pending.send_modify(|set| {
            set.remove(&token);
        });
    }
}
