use serde::{Deserialize, Serialize};

/// Declarative compliance rule configuration.
///
/// Every rule kind is independently controlled by an `enabled` flag;
/// absent sections fall back to the rule's own defaults. Unknown rule
/// names in a document are ignored for forward compatibility.
///
/// Lifecycle: loaded fresh for every compliance run and never cached,
/// so threshold edits take effect on the next invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub rules: RuleSections,
}

/// Per-rule configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSections {
    #[serde(default)]
    pub description_length: DescriptionLengthSection,

    #[serde(default)]
    pub vague_phrase: VaguePhraseSection,

    #[serde(default)]
    pub block_billing: BlockBillingSection,

    #[serde(default)]
    pub daily_hours_cap: DailyHoursCapSection,

    #[serde(default)]
    pub travel_time: TravelTimeSection,

    #[serde(default)]
    pub max_entry_duration: MaxEntryDurationSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptionLengthSection {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub min_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaguePhraseSection {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub phrases: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockBillingSection {
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyHoursCapSection {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub max_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelTimeSection {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaxEntryDurationSection {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub max_hours: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
rules:
  description_length:
    enabled: true
    min_chars: 30
  daily_hours_cap:
    max_hours: 10.0
  max_entry_duration:
    enabled: true
    max_hours: 8.0
"#;

        let cfg: RulesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.rules.description_length.min_chars, Some(30));
        assert_eq!(cfg.rules.description_length.enabled, Some(true));
        assert_eq!(cfg.rules.daily_hours_cap.max_hours, Some(10.0));
        assert!(cfg.rules.daily_hours_cap.enabled.is_none());
        assert_eq!(cfg.rules.max_entry_duration.max_hours, Some(8.0));
        assert!(cfg.rules.vague_phrase.phrases.is_none());
    }

    #[test]
    fn test_unknown_rule_names_ignored() {
        let yaml = r#"
rules:
  description_length:
    min_chars: 25
  some_future_rule:
    enabled: true
    threshold: 3
"#;

        let cfg: RulesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.rules.description_length.min_chars, Some(25));
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let cfg: RulesConfig = serde_yaml::from_str("rules: {}").unwrap();
        assert!(cfg.rules.description_length.enabled.is_none());
        assert!(cfg.rules.max_entry_duration.max_hours.is_none());
    }
}
