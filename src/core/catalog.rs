//! Fixed catalog of contradiction templates used by the mock analysis.

use serde::Serialize;

use crate::domain::{Category, Severity};

/// A canned contradiction
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Template {
    pub category: Category,
    pub severity: Severity,
    pub statements: [&'static str; 2],
    pub explanation: &'static str,
    pub suggestion: &'static str,
}

static CATALOG: [Template; 4] = [
    Template {
        category: Category::Time,
        severity: Severity::High,
        statements: [
            "Submit assignments before 10:00 PM",
            "Deadline for submissions is 11:59 PM",
        ],
        explanation: "Different documents specify conflicting deadline times for assignment submissions.",
        suggestion: "Standardize submission deadline to a single time across all documents. Consider 11:59 PM for consistency.",
    },
    Template {
        category: Category::Policy,
        severity: Severity::Medium,
        statements: [
            "Minimum attendance requirement: 75%",
            "Students need at least 65% attendance to qualify",
        ],
        explanation: "Attendance requirements vary between policy documents, creating confusion.",
        suggestion: "Establish a unified attendance policy. Recommend using 75% as the standard across all documents.",
    },
    Template {
        category: Category::Procedure,
        severity: Severity::High,
        statements: [
            "Leave requests must be submitted 2 weeks in advance",
            "Notice period for leave: minimum 1 month",
        ],
        explanation: "Leave request procedures have conflicting advance notice requirements.",
        suggestion: "Clarify leave request timeline. Consider different requirements for different types of leave (sick vs. vacation).",
    },
    Template {
        category: Category::Requirement,
        severity: Severity::Low,
        statements: [
            "Password must be at least 8 characters",
            "Minimum password length: 12 characters",
        ],
        explanation: "Security policies specify different password length requirements.",
        suggestion: "Update to consistent password policy. Modern security standards recommend 12+ characters.",
    },
];

/// All templates, in selection order
pub fn catalog() -> &'static [Template] {
    &CATALOG
}
