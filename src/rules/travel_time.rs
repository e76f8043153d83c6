use crate::domain::{ComplianceIssue, TimeEntry};
use crate::rules::traits::ComplianceRule;

/// Default travel keywords, matched as substrings.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "travel", "drive", "commute", "flight", "uber", "lyft", "cab", "taxi",
];

const NOTE: &str = "Many carriers pay 50% for travel time.";

/// Flags entries that look like travel time.
///
/// Keywords are matched case-insensitively as substrings, not whole
/// words; carriers commonly discount travel, so these entries warrant
/// a second look regardless of phrasing.
#[derive(Debug)]
pub struct TravelTimeRule {
    keywords: Vec<String>,
}

impl TravelTimeRule {
    pub fn new(keywords: Vec<String>) -> Self {
        TravelTimeRule { keywords }
    }
}

impl Default for TravelTimeRule {
    fn default() -> Self {
        TravelTimeRule::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl ComplianceRule for TravelTimeRule {
    fn id(&self) -> &str {
        "travel_time"
    }

    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();

        for entry in entries {
            let desc = entry.description.to_lowercase();
            if self.keywords.iter().any(|k| desc.contains(k.as_str())) {
                issues.push(ComplianceIssue::warning(
                    self.id(),
                    Some(entry.id.clone()),
                    "Travel time detected.",
                    format!("{NOTE} Consider separate entry and reduced rate if required."),
                ));
            }
        }

        issues
    }
}
