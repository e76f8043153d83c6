use crate::domain::{ComplianceIssue, TimeEntry};
use std::fmt::Debug;

/// Trait for compliance rules.
///
/// A rule receives the entire batch of entries for one evaluation
/// call, because some rules are inherently aggregate (e.g., per-day
/// hour totals). Evaluation must be side-effect-free: no mutation of
/// the batch, no I/O, and deterministic output for identical input.
///
/// Issues within one rule's result are emitted in scan order (first
/// entry scanned, first issue emitted).
pub trait ComplianceRule: Send + Sync + Debug {
    /// Stable identifier, used for issue attribution and for
    /// configuration lookup.
    fn id(&self) -> &str;

    /// Evaluate the rule against a batch of entries.
    fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;

    #[derive(Debug)]
    struct TestRule {
        id: String,
        should_fire: bool,
    }

    impl ComplianceRule for TestRule {
        fn id(&self) -> &str {
            &self.id
        }

        fn apply(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
            if self.should_fire {
                entries
                    .iter()
                    .map(|e| {
                        ComplianceIssue::new(
                            &self.id,
                            Some(e.id.clone()),
                            Severity::Warning,
                            "fired",
                        )
                    })
                    .collect()
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule {
            id: "TEST_RULE".to_string(),
            should_fire: true,
        };

        assert_eq!(rule.id(), "TEST_RULE");

        let entries = vec![TimeEntry::new("x", 1.0), TimeEntry::new("y", 2.0)];
        let issues = rule.apply(&entries);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].entry_id, Some(entries[0].id.clone()));
    }
}
