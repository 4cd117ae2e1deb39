//! Contradictions and analysis reports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of conflict a contradiction describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Conflicting times or deadlines
    Time,

    /// Conflicting policy thresholds
    Policy,

    /// Conflicting requirements
    Requirement,

    /// Conflicting procedures
    Procedure,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Time => "time",
            Category::Policy => "policy",
            Category::Requirement => "requirement",
            Category::Procedure => "procedure",
        };
        f.write_str(s)
    }
}

/// How urgently a contradiction should be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(s)
    }
}

/// Where in a document a conflicting statement was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// A conflict between statements in two or more documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub id: Uuid,
    pub category: Category,
    pub severity: Severity,
    /// Names of the documents involved, in store order
    pub source_documents: Vec<String>,
    pub conflicting_statements: Vec<String>,
    pub explanation: String,
    pub suggestion: String,
    pub locations: Vec<Location>,
}

/// Severity counts for a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Summary {
    /// Count contradictions by severity.
    ///
    /// `total` always equals `high + medium + low`.
    pub fn from_contradictions(contradictions: &[Contradiction]) -> Self {
        let mut summary = Self::default();
        for c in contradictions {
            match c.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary.total = summary.high + summary.medium + summary.low;
        summary
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Names of every analyzed document, in store order
    pub document_names: Vec<String>,
    pub contradictions: Vec<Contradiction>,
    pub summary: Summary,
}

impl Report {
    /// Build a report; the summary is derived from the contradictions
    pub fn new(document_names: Vec<String>, contradictions: Vec<Contradiction>) -> Self {
        let summary = Summary::from_contradictions(&contradictions);
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            document_names,
            contradictions,
            summary,
        }
    }

    /// Contradictions of a given severity
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Contradiction> {
        self.contradictions
            .iter()
            .filter(move |c| c.severity == severity)
    }

    /// Render the report as plain text for terminal output
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("Report {}\n", self.id));
        out.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("Documents: {}\n", self.document_names.join(", ")));
        out.push_str(&format!(
            "Contradictions: {} (high: {}, medium: {}, low: {})\n",
            self.summary.total, self.summary.high, self.summary.medium, self.summary.low
        ));

        for (idx, c) in self.contradictions.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. [{}] {} conflict between {}\n",
                idx + 1,
                c.severity,
                c.category,
                c.source_documents.join(" and ")
            ));
            for statement in &c.conflicting_statements {
                out.push_str(&format!("   - \"{}\"\n", statement));
            }
            out.push_str(&format!("   Why: {}\n", c.explanation));
            out.push_str(&format!("   Fix: {}\n", c.suggestion));
            for loc in &c.locations {
                let page = loc.page.map(|p| format!("page {}", p)).unwrap_or_default();
                let section = loc.section.clone().unwrap_or_default();
                out.push_str(&format!("   @ {}: {} {}\n", loc.document, page, section));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contradiction(severity: Severity) -> Contradiction {
        Contradiction {
            id: Uuid::new_v4(),
            category: Category::Policy,
            severity,
            source_documents: vec!["a.txt".to_string(), "b.txt".to_string()],
            conflicting_statements: vec!["x".to_string(), "y".to_string()],
            explanation: "differs".to_string(),
            suggestion: "align".to_string(),
            locations: Vec::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let items = vec![
            contradiction(Severity::High),
            contradiction(Severity::High),
            contradiction(Severity::Low),
        ];
        let summary = Summary::from_contradictions(&items);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.high, 2);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.low, 1);
    }

    #[test]
    fn test_severity_serializes_snake_case() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_render_text_lists_documents() {
        let report = Report::new(
            vec!["a.txt".to_string(), "b.txt".to_string()],
            vec![contradiction(Severity::Medium)],
        );
        let text = report.render_text();

        assert!(text.contains("Documents: a.txt, b.txt"));
        assert!(text.contains("[medium] policy conflict between a.txt and b.txt"));
        assert_eq!(report.by_severity(Severity::Medium).count(), 1);
    }
}
