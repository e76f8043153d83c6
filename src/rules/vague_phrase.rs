use crate::domain::{ComplianceIssue, TimeEntry};
use crate::rules::traits::ComplianceRule;

/// Default phrase list flagged when a narrative carries no detail.
pub const DEFAULT_PHRASES: &[&str] = &[
    "work on",
    "misc",
    "general",
    "review docs",
    "review documents",
    "admin",
    "administrative",
    "follow up",
    "follow-up",
];

/// Flags boilerplate phrases used without supporting detail.
///
/// A phrase hit only counts when the narrative has fewer than six
/// words; "work on various discovery responses as discussed with
/// co-counsel" is fine, "work on it" is not. At most one issue per
/// entry, attributed to the first matching phrase.
#[derive(Debug)]
pub struct VaguePhraseRule {
    phrases: Vec<String>,
}

impl VaguePhraseRule {
    pub fn new(phrases: Vec<String>) -> Self {
        VaguePhraseRule { phrases }
    }
}

impl Default for VaguePhraseRule {
    fn default() -> Self {
        VaguePhraseRule::new(DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect())
    }
}

impl ComplianceRule for VaguePhraseRule {
    fn id(&self) -> &str {
        "vague_phrase"
    }

    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();

        for entry in entries {
            let desc = entry.description.to_lowercase();
            let desc = desc.trim();
            if desc.split_whitespace().count() >= 6 {
                continue;
            }

            for phrase in &self.phrases {
                if desc.contains(phrase.as_str()) {
                    issues.push(ComplianceIssue::warning(
                        self.id(),
                        Some(entry.id.clone()),
                        format!("Vague phrase \"{phrase}\" without specifics."),
                        "Specify document names, parties, dates, or purpose.",
                    ));
                    break;
                }
            }
        }

        issues
    }
}
