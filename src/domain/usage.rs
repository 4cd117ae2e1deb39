//! Session usage counters and billing.

use serde::{Deserialize, Serialize};

/// Running totals for the current session.
///
/// Counters only ever increase; they reset when the process restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub documents_analyzed: u64,
    pub reports_generated: u64,
    pub contradictions_found: u64,
    /// Cumulative charge in whole currency units
    pub total_billing: u64,
}

/// Per-unit charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRates {
    #[serde(default = "default_per_document")]
    pub per_document: u64,
    #[serde(default = "default_per_report")]
    pub per_report: u64,
}

fn default_per_document() -> u64 {
    5
}
fn default_per_report() -> u64 {
    15
}

impl Default for BillingRates {
    fn default() -> Self {
        Self {
            per_document: default_per_document(),
            per_report: default_per_report(),
        }
    }
}

impl UsageStats {
    /// Split the total into (documents cost, reports cost)
    pub fn billing_breakdown(&self, rates: &BillingRates) -> (u64, u64) {
        (
            self.documents_analyzed * rates.per_document,
            self.reports_generated * rates.per_report,
        )
    }

    /// Render the usage panel for terminal output
    pub fn render_text(&self, rates: &BillingRates) -> String {
        let (docs_cost, reports_cost) = self.billing_breakdown(rates);
        format!(
            "Documents analyzed:   {}\n\
             Reports generated:    {}\n\
             Issues detected:      {}\n\
             Documents ({} x ${}): ${}\n\
             Reports ({} x ${}):   ${}\n\
             Total billing:        ${}\n",
            self.documents_analyzed,
            self.reports_generated,
            self.contradictions_found,
            self.documents_analyzed,
            rates.per_document,
            docs_cost,
            self.reports_generated,
            rates.per_report,
            reports_cost,
            self.total_billing,
        )
    }
}
