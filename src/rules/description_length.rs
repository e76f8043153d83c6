use crate::domain::{ComplianceIssue, TimeEntry};
use crate::rules::traits::ComplianceRule;

/// Default minimum narrative length in characters.
pub const DEFAULT_MIN_CHARS: usize = 20;

/// Flags narratives too short to survive a fee audit.
///
/// Fires once per entry whose stripped description falls below the
/// configured character minimum.
#[derive(Debug)]
pub struct DescriptionLengthRule {
    min_chars: usize,
}

impl DescriptionLengthRule {
    pub fn new(min_chars: usize) -> Self {
        DescriptionLengthRule { min_chars }
    }
}

impl Default for DescriptionLengthRule {
    fn default() -> Self {
        DescriptionLengthRule::new(DEFAULT_MIN_CHARS)
    }
}

impl ComplianceRule for DescriptionLengthRule {
    fn id(&self) -> &str {
        "description_length"
    }

    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();

        for entry in entries {
            let desc = entry.description.trim();
            let len = desc.chars().count();
            if len < self.min_chars {
                issues.push(ComplianceIssue::warning(
                    self.id(),
                    Some(entry.id.clone()),
                    format!("Description too short ({len} chars)."),
                    format!("Add specifics (who/what/why); \u{2265}{} chars.", self.min_chars),
                ));
            }
        }

        issues
    }
}
