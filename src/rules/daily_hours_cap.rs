use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::{ComplianceIssue, TimeEntry};
use crate::rules::traits::ComplianceRule;

/// Default cap on total hours billed in a single day.
pub const DEFAULT_MAX_HOURS: f64 = 12.0;

/// Flags days whose summed billed hours exceed a cap.
///
/// Aggregate rule: one issue per offending date, with no entry
/// attribution. Entries without a work date never contribute to any
/// daily total; entries with a non-finite or negative duration are
/// skipped rather than poisoning the day's sum.
#[derive(Debug)]
pub struct DailyHoursCapRule {
    max_hours: f64,
}

impl DailyHoursCapRule {
    pub fn new(max_hours: f64) -> Self {
        DailyHoursCapRule { max_hours }
    }
}

impl Default for DailyHoursCapRule {
    fn default() -> Self {
        DailyHoursCapRule::new(DEFAULT_MAX_HOURS)
    }
}

impl ComplianceRule for DailyHoursCapRule {
    fn id(&self) -> &str {
        "daily_hours_cap"
    }

    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for entry in entries {
            let Some(date) = entry.work_date else {
                continue;
            };
            if !entry.duration_hours.is_finite() || entry.duration_hours < 0.0 {
                continue;
            }
            *by_day.entry(date).or_insert(0.0) += entry.duration_hours;
        }

        let mut issues = Vec::new();
        for (date, total) in by_day {
            if total > self.max_hours {
                issues.push(ComplianceIssue::warning(
                    self.id(),
                    None,
                    format!(
                        "Total billed {total:.2}h on {date} > {:.1}h cap.",
                        self.max_hours
                    ),
                    "Add justification or reallocate if appropriate.",
                ));
            }
        }

        issues
    }
}
