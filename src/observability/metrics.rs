use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::ComplianceIssue;

/// Metrics registry for the application.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Compliance runs executed
    pub compliance_runs_total: AtomicU64,

    /// Entries scanned across all runs
    pub entries_checked_total: AtomicU64,

    /// Issues produced, by severity
    pub issues_warning_total: AtomicU64,
    pub issues_error_total: AtomicU64,

    /// Rule-config loads that fell back to the default set
    pub config_fallbacks_total: AtomicU64,

    /// Ingestion runs and the entries they inserted
    pub ingest_runs_total: AtomicU64,
    pub ingest_inserted_total: AtomicU64,

    /// LEDES exports
    pub exports_total: AtomicU64,
    pub export_errors_total: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record one compliance run.
    pub fn record_compliance_run(&self, entries: usize, issues: &[ComplianceIssue]) {
        self.compliance_runs_total.fetch_add(1, Ordering::Relaxed);
        self.entries_checked_total
            .fetch_add(entries as u64, Ordering::Relaxed);

        for issue in issues {
            if issue.severity.is_error() {
                self.issues_error_total.fetch_add(1, Ordering::Relaxed);
            } else {
                self.issues_warning_total.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Record a fallback to the default rule set.
    pub fn record_config_fallback(&self) {
        self.config_fallbacks_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an ingestion run.
    pub fn record_ingest(&self, inserted: u64) {
        self.ingest_runs_total.fetch_add(1, Ordering::Relaxed);
        self.ingest_inserted_total
            .fetch_add(inserted, Ordering::Relaxed);
    }

    /// Record an export attempt.
    pub fn record_export(&self, success: bool) {
        self.exports_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.export_errors_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP billr_compliance_runs_total Compliance runs executed
# TYPE billr_compliance_runs_total counter
billr_compliance_runs_total {}

# HELP billr_entries_checked_total Entries scanned across all runs
# TYPE billr_entries_checked_total counter
billr_entries_checked_total {}

# HELP billr_issues_total Issues produced by severity
# TYPE billr_issues_total counter
billr_issues_total{{severity="warning"}} {}
billr_issues_total{{severity="error"}} {}

# HELP billr_config_fallbacks_total Rule-config loads that used the default set
# TYPE billr_config_fallbacks_total counter
billr_config_fallbacks_total {}

# HELP billr_ingest_runs_total Ingestion runs
# TYPE billr_ingest_runs_total counter
billr_ingest_runs_total {}

# HELP billr_ingest_inserted_total Entries inserted by ingestion
# TYPE billr_ingest_inserted_total counter
billr_ingest_inserted_total {}

# HELP billr_exports_total LEDES export attempts
# TYPE billr_exports_total counter
billr_exports_total {}

# HELP billr_export_errors_total LEDES export failures
# TYPE billr_export_errors_total counter
billr_export_errors_total {}
"#,
            self.compliance_runs_total.load(Ordering::Relaxed),
            self.entries_checked_total.load(Ordering::Relaxed),
            self.issues_warning_total.load(Ordering::Relaxed),
            self.issues_error_total.load(Ordering::Relaxed),
            self.config_fallbacks_total.load(Ordering::Relaxed),
            self.ingest_runs_total.load(Ordering::Relaxed),
            self.ingest_inserted_total.load(Ordering::Relaxed),
            self.exports_total.load(Ordering::Relaxed),
            self.export_errors_total.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplianceIssue, Severity};

    #[test]
    fn test_record_compliance_run() {
        let registry = MetricsRegistry::new();
        let issues = vec![
            ComplianceIssue::new("a", None, Severity::Warning, "w"),
            ComplianceIssue::new("b", None, Severity::Error, "e"),
        ];

        registry.record_compliance_run(10, &issues);

        assert_eq!(registry.compliance_runs_total.load(Ordering::Relaxed), 1);
        assert_eq!(registry.entries_checked_total.load(Ordering::Relaxed), 10);
        assert_eq!(registry.issues_warning_total.load(Ordering::Relaxed), 1);
        assert_eq!(registry.issues_error_total.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_prometheus_rendering() {
        let registry = MetricsRegistry::new();
        registry.record_ingest(42);
        registry.record_export(false);

        let text = registry.to_prometheus();
        assert!(text.contains("billr_ingest_inserted_total 42"));
        assert!(text.contains("billr_export_errors_total 1"));
    }
}
