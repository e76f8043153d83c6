use regex::Regex;
use std::collections::HashSet;

use crate::domain::{ComplianceIssue, TimeEntry};
use crate::rules::traits::ComplianceRule;

/// Task separators counted toward the block-billing heuristic.
const SEPARATORS: [&str; 4] = [";", " & ", " and ", ", "];

/// Action verbs counted toward the block-billing heuristic.
/// Matched as whole words with an optional "-ing" suffix.
const VERBS: [&str; 13] = [
    "draft",
    "revise",
    "review",
    "research",
    "analyze",
    "email",
    "call",
    "meet",
    "prepare",
    "edit",
    "summarize",
    "outline",
    "negotiate",
];

/// Flags entries that likely lump several tasks together.
///
/// Fires when the narrative contains at least two of the task
/// separators, or at least two distinct action verbs (counted by
/// distinct verbs matched, not occurrences). The two heuristics are
/// OR'd with no weighting, so a long single-task narrative with two
/// verbs still fires; fee auditors prefer the false positive.
#[derive(Debug)]
pub struct BlockBillingRule {
    verb_re: Regex,
}

impl BlockBillingRule {
    pub fn new() -> Self {
        let pattern = format!(r"\b({})(ing)?\b", VERBS.join("|"));
        BlockBillingRule {
            verb_re: Regex::new(&pattern).expect("verb alternation is a valid pattern"),
        }
    }

    /// Count distinct verbs matched in a lowercased narrative.
    fn distinct_verbs(&self, desc: &str) -> usize {
        let stems: HashSet<&str> = self
            .verb_re
            .captures_iter(desc)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();
        stems.len()
    }
}

impl Default for BlockBillingRule {
    fn default() -> Self {
        BlockBillingRule::new()
    }
}

impl ComplianceRule for BlockBillingRule {
    fn id(&self) -> &str {
        "block_billing"
    }

    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();

        for entry in entries {
            let desc = entry.description.to_lowercase();

            let separator_hits = SEPARATORS.iter().filter(|s| desc.contains(*s)).count();
            let likely = separator_hits >= 2 || self.distinct_verbs(&desc) >= 2;

            if likely {
                issues.push(ComplianceIssue::warning(
                    self.id(),
                    Some(entry.id.clone()),
                    "Possible block billing (multiple tasks).",
                    "Split into discrete entries per task.",
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(desc: &str) -> TimeEntry {
        TimeEntry::new(desc, 1.0)
    }

    #[test]
    fn test_separators_and_verbs_fire() {
        let rule = BlockBillingRule::new();
        let entries = vec![entry("Draft and revise the motion; then call client")];

        let issues = rule.apply(&entries);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_id, "block_billing");
    }

    #[test]
    fn test_single_task_does_not_fire() {
        let rule = BlockBillingRule::new();
        let entries = vec![entry("Draft motion")];

        assert!(rule.apply(&entries).is_empty());
    }

    #[test]
    fn test_two_distinct_verbs_without_separators() {
        let rule = BlockBillingRule::new();
        let entries = vec![entry("Reviewing deposition transcript to prepare witness")];

        // "review(ing)" + "prepare" = 2 distinct verbs
        assert_eq!(rule.apply(&entries).len(), 1);
    }

    #[test]
    fn test_repeated_verb_counts_once() {
        let rule = BlockBillingRule::new();
        let entries = vec![entry("Draft declaration then draft proposed order")];

        // "draft" twice is still one distinct verb
        assert!(rule.apply(&entries).is_empty());
    }

    #[test]
    fn test_verb_requires_word_boundary() {
        let rule = BlockBillingRule::new();
        // "recall" and "emails" must not match "call"/"email"
        let entries = vec![entry("Recall notice sent via emails yesterday")];

        assert!(rule.apply(&entries).is_empty());
    }

    #[test]
    fn test_two_separators_without_verbs() {
        let rule = BlockBillingRule::new();
        let entries = vec![entry("Hearing prep; witness outlines, exhibit binders")];

        // ";" and ", " are two separator kinds
        assert_eq!(rule.apply(&entries).len(), 1);
    }
}
