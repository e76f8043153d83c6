pub mod block_billing;
pub mod daily_hours_cap;
pub mod description_length;
pub mod max_entry_duration;
pub mod traits;
pub mod travel_time;
pub mod vague_phrase;

pub use block_billing::BlockBillingRule;
pub use daily_hours_cap::DailyHoursCapRule;
pub use description_length::DescriptionLengthRule;
pub use max_entry_duration::MaxEntryDurationRule;
pub use traits::ComplianceRule;
pub use travel_time::TravelTimeRule;
pub use vague_phrase::VaguePhraseRule;

use std::path::Path;
use std::sync::Arc;

use crate::domain::{ComplianceIssue, RulesConfig, TimeEntry};

/// Ordered collection of active rules ready for evaluation.
pub struct RuleSet {
    pub rules: Vec<Arc<dyn ComplianceRule>>,
}

impl RuleSet {
    /// Build the active rule set from a declarative configuration.
    ///
    /// Each rule kind is independently gated by its `enabled` flag
    /// (default on, except `max_entry_duration` which defaults off and
    /// is additionally inert without a cap). Rule-specific parameters
    /// override the defaults colocated with each rule.
    pub fn from_config(cfg: &RulesConfig) -> Self {
        let mut rules: Vec<Arc<dyn ComplianceRule>> = Vec::new();
        let sections = &cfg.rules;

        if sections.description_length.enabled.unwrap_or(true) {
            rules.push(Arc::new(DescriptionLengthRule::new(
                sections
                    .description_length
                    .min_chars
                    .unwrap_or(description_length::DEFAULT_MIN_CHARS),
            )));
        }

        if sections.vague_phrase.enabled.unwrap_or(true) {
            rules.push(Arc::new(match &sections.vague_phrase.phrases {
                Some(phrases) => VaguePhraseRule::new(phrases.clone()),
                None => VaguePhraseRule::default(),
            }));
        }

        if sections.block_billing.enabled.unwrap_or(true) {
            rules.push(Arc::new(BlockBillingRule::new()));
        }

        if sections.daily_hours_cap.enabled.unwrap_or(true) {
            rules.push(Arc::new(DailyHoursCapRule::new(
                sections
                    .daily_hours_cap
                    .max_hours
                    .unwrap_or(daily_hours_cap::DEFAULT_MAX_HOURS),
            )));
        }

        if sections.travel_time.enabled.unwrap_or(true) {
            rules.push(Arc::new(match &sections.travel_time.keywords {
                Some(keywords) => TravelTimeRule::new(keywords.clone()),
                None => TravelTimeRule::default(),
            }));
        }

        if sections.max_entry_duration.enabled.unwrap_or(false) {
            if let Some(max_hours) = sections.max_entry_duration.max_hours {
                rules.push(Arc::new(MaxEntryDurationRule::new(Some(max_hours))));
            }
        }

        RuleSet { rules }
    }

    /// The fixed default rule set, used when no configuration is
    /// available. Constructed explicitly at the call site that needs
    /// it rather than held as ambient shared state.
    pub fn default_set() -> Self {
        RuleSet {
            rules: vec![
                Arc::new(DescriptionLengthRule::default()),
                Arc::new(VaguePhraseRule::default()),
                Arc::new(BlockBillingRule::new()),
                Arc::new(DailyHoursCapRule::default()),
                Arc::new(TravelTimeRule::default()),
            ],
        }
    }

    /// Create an empty rule set.
    pub fn empty() -> Self {
        RuleSet { rules: Vec::new() }
    }

    /// Identifiers of the active rules, in evaluation order.
    ///
    /// Callers needing to distinguish "rules ran but found nothing"
    /// from "rules did not run" inspect this rather than the issue
    /// list.
    pub fn ids(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.id().to_string()).collect()
    }

    /// Apply every active rule to the identical batch and aggregate
    /// issues in rule order, then within-rule emission order. No
    /// de-duplication across rules: the same entry can legitimately
    /// receive issues from several rules.
    pub fn run(&self, entries: &[TimeEntry]) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            issues.extend(rule.apply(entries));
        }
        issues
    }
}

/// Evaluate a batch of entries against the configured rule set.
///
/// Configuration is re-read on every call; a missing or malformed
/// file degrades to the default rule set, never an error.
pub fn run_compliance(entries: &[TimeEntry], config_path: Option<&Path>) -> Vec<ComplianceIssue> {
    let ruleset = match config_path.and_then(crate::policy::load_rules_config) {
        Some(cfg) => RuleSet::from_config(&cfg),
        None => RuleSet::default_set(),
    };
    ruleset.run(entries)
}
