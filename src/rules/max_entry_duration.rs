use crate::domain::{ComplianceIssue, TimeEntry};
use crate::rules::traits::ComplianceRule;

/// Flags individual entries longer than a configured guideline.
///
/// Unlike the other rules this one ships disabled: there is no
/// default cap, and with `max_hours` unset the rule is inert even if
/// enabled in configuration.
#[derive(Debug, Default)]
pub struct MaxEntryDurationRule {
    max_hours: Option<f64>,
}

impl MaxEntryDurationRule {
    pub fn new(max_hours: Option<f64>) -> Self {
        MaxEntryDurationRule { max_hours }
    }
}

impl ComplianceRule for MaxEntryDurationRule {
    fn id(&self) -> &str {
        "max_entry_duration"
    }

    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let Some(cap) = self.max_hours else {
            return Vec::new();
        };

        let mut issues = Vec::new();
        for entry in entries {
            if entry.duration_hours > cap {
                issues.push(ComplianceIssue::warning(
                    self.id(),
                    Some(entry.id.clone()),
                    format!("Entry {:.2}h > {cap:.2}h guideline.", entry.duration_hours),
                    "Split into smaller tasks.",
                ));
            }
        }

        issues
    }
}
