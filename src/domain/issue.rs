use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::EntryId;

/// Issue severity with display ordering.
///
/// Severities are ordered for presentation only; both levels are
/// always reported, never suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    Warning = 0,
    Error = 1,
}

impl Severity {
    #[inline]
    pub fn is_error(&self) -> bool {
        *self == Severity::Error
    }

    /// Parse from string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single compliance violation produced by a rule.
///
/// This flat shape is the stable contract consumed by presentation
/// layers; `entry_id` is absent for batch-level issues such as a
/// daily aggregate cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceIssue {
    /// The rule that produced this issue
    pub rule_id: String,

    /// The offending entry, when the issue is entry-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<EntryId>,

    /// Severity for display ordering
    pub severity: Severity,

    /// Human-readable description of the violation
    pub message: String,

    /// Remediation hint, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ComplianceIssue {
    /// Create an issue with no suggestion.
    pub fn new(
        rule_id: impl Into<String>,
        entry_id: Option<EntryId>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        ComplianceIssue {
            rule_id: rule_id.into(),
            entry_id,
            severity,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Create a warning with a remediation suggestion.
    ///
    /// All built-in rules emit warnings; Error is reserved for
    /// escalated rules authored in configuration.
    pub fn warning(
        rule_id: impl Into<String>,
        entry_id: Option<EntryId>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        ComplianceIssue {
            rule_id: rule_id.into(),
            entry_id,
            severity: Severity::Warning,
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");

        let parsed: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, Severity::Error);
    }

    #[test]
    fn test_issue_serialization_skips_absent_fields() {
        let issue = ComplianceIssue::new(
            "daily_hours_cap",
            None,
            Severity::Warning,
            "Total billed 13.50h on 2025-08-01 > 12.0h cap.",
        );

        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("entry_id"));
        assert!(!json.contains("suggestion"));
        assert!(json.contains("\"severity\":\"warning\""));
    }

    #[test]
    fn test_warning_constructor() {
        let issue = ComplianceIssue::warning(
            "travel_time",
            Some(EntryId::from_string("e-1")),
            "Travel time detected.",
            "Consider a separate entry.",
        );

        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.entry_id.as_ref().unwrap().as_str(), "e-1");
        assert!(issue.suggestion.is_some());
    }
}
