//! Synthetic external policy updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification that a third-party policy source changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUpdate {
    pub id: Uuid,
    pub source: String,
    pub title: String,
    pub detected_at: DateTime<Utc>,
    pub changes: Vec<String>,
    pub impacted_policies: Vec<String>,
}

impl ExternalUpdate {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        changes: Vec<String>,
        impacted_policies: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            title: title.into(),
            detected_at: Utc::now(),
            changes,
            impacted_policies,
        }
    }
}
