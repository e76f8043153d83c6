use regex::Regex;

/// Vague terms that should never appear in a billing narrative.
const FORBIDDEN: [&str; 3] = [r"\bvarious tasks\b", r"\betc\.\b", r"\badmin(istrative)?\b"];

/// Verbs that demand supporting detail when the narrative is short.
const REQUIRES_DETAIL: [&str; 3] = [r"\breview(ed)?\b", r"\bwork(ed)? on\b", r"\bprepare(d)?\b"];

/// Travel markers; travel narratives must name a destination.
const TRAVEL: [&str; 5] = [r"\btravel\b", r"\bdrive\b", r"\bflight\b", r"\buber\b", r"\bcab\b"];

/// Lints a single draft narrative as it is being written.
///
/// This is the interactive cousin of the batch rule set: it runs on
/// one entry's text and returns display strings rather than typed
/// issues.
#[derive(Debug)]
pub struct NarrativeLinter {
    forbidden: Vec<Regex>,
    requires_detail: Vec<Regex>,
    travel: Vec<Regex>,
}

impl NarrativeLinter {
    pub fn new() -> Self {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| Regex::new(&format!("(?i){p}")).expect("hard-coded pattern"))
                .collect()
        };

        NarrativeLinter {
            forbidden: compile(&FORBIDDEN),
            requires_detail: compile(&REQUIRES_DETAIL),
            travel: compile(&TRAVEL),
        }
    }

    /// Check a narrative, returning one warning string per finding.
    pub fn check(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        let mut warnings = Vec::new();

        for pattern in &self.forbidden {
            if pattern.is_match(text) {
                warnings.push("Avoid vague terms like 'various tasks' or 'etc.'".to_string());
            }
        }

        let word_count = text.split_whitespace().count();
        if word_count < 6 && self.requires_detail.iter().any(|p| p.is_match(text)) {
            warnings
                .push("Add who/what/why (e.g., which docs, purpose, counterpart).".to_string());
        }

        if self.travel.iter().any(|p| p.is_match(text)) && !text.to_lowercase().contains(" to ") {
            warnings.push(
                "Travel requires destination and purpose (e.g., 'Travel to court for hearing')."
                    .to_string(),
            );
        }

        warnings
    }
}

impl Default for NarrativeLinter {
    fn default() -> Self {
        NarrativeLinter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_terms() {
        let linter = NarrativeLinter::new();
        let warnings = linter.check("Handled various tasks for the file");

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("vague terms"));
    }

    #[test]
    fn test_short_detail_verb() {
        let linter = NarrativeLinter::new();

        assert_eq!(linter.check("Reviewed documents").len(), 1);
        assert!(linter
            .check("Reviewed lease agreement and flagged assignment clause for client")
            .is_empty());
    }

    #[test]
    fn test_travel_without_destination() {
        let linter = NarrativeLinter::new();

        let warnings = linter.check("Morning flight for the hearing and preparation en route");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("destination"));

        assert!(linter
            .check("Travel to court for hearing on demurrer and return")
            .is_empty());
    }

    #[test]
    fn test_clean_narrative() {
        let linter = NarrativeLinter::new();
        assert!(linter
            .check("Draft reply brief in support of motion for summary judgment")
            .is_empty());
    }
}
