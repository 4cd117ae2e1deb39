//! Usage and billing accumulation.

use tracing::debug;

use crate::domain::{BillingRates, Report, UsageStats};

/// Accumulates session usage from completed analyses.
///
/// `total_billing` always equals
/// `documents_analyzed * per_document + reports_generated * per_report`.
#[derive(Debug, Default)]
pub struct UsageAccumulator {
    rates: BillingRates,
    stats: UsageStats,
}

impl UsageAccumulator {
    pub fn new(rates: BillingRates) -> Self {
        Self {
            rates,
            stats: UsageStats::default(),
        }
    }

    /// Record one completed analysis of `document_count` documents
    pub fn record(&mut self, document_count: usize, report: &Report) {
        let documents = document_count as u64;
        let charge = documents * self.rates.per_document + self.rates.per_report;

        self.stats.documents_analyzed += documents;
        self.stats.reports_generated += 1;
        self.stats.contradictions_found += report.contradictions.len() as u64;
        self.stats.total_billing += charge;

        debug!(
            documents,
            charge,
            total = self.stats.total_billing,
            "Usage recorded"
        );
    }

    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    pub fn rates(&self) -> &BillingRates {
        &self.rates
    }
}
