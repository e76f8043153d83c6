use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique time-entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new() -> Self {
        EntryId(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        EntryId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        EntryId::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        ClientId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Matter identifier (the client/matter the time was billed against).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatterId(pub String);

impl MatterId {
    pub fn new(id: impl Into<String>) -> Self {
        MatterId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timekeeper identifier (the billing attorney or staff member).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimekeeperId(pub String);

impl TimekeeperId {
    pub fn new(id: impl Into<String>) -> Self {
        TimekeeperId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimekeeperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTBMS task/activity code (e.g., "L120"), normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtbmsCode(String);

impl UtbmsCode {
    pub fn new(code: impl Into<String>) -> Self {
        UtbmsCode(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The "NB" marker flags an entry as non-billable.
    pub fn is_non_billable(&self) -> bool {
        self.0 == "NB"
    }
}

impl fmt::Display for UtbmsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single captured unit of billable time.
///
/// Entries are immutable for the purposes of rule evaluation: rules
/// receive the batch by shared reference and must not mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique entry identifier
    pub id: EntryId,

    /// Calendar date the work was performed (None for undated drafts)
    pub work_date: Option<NaiveDate>,

    /// Client the entry bills to
    pub client_id: Option<ClientId>,

    /// Matter the entry bills to
    pub matter_id: Option<MatterId>,

    /// Timekeeper who performed the work
    pub timekeeper_id: Option<TimekeeperId>,

    /// Hours billed (non-negative)
    pub duration_hours: f64,

    /// Free-text billing narrative
    pub description: String,

    /// UTBMS classification, once assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utbms_code: Option<UtbmsCode>,
}

impl TimeEntry {
    /// Create a bare entry with a generated id and no matter context.
    pub fn new(description: impl Into<String>, duration_hours: f64) -> Self {
        TimeEntry {
            id: EntryId::new(),
            work_date: None,
            client_id: None,
            matter_id: None,
            timekeeper_id: None,
            duration_hours,
            description: description.into(),
            utbms_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = TimeEntry::new("Draft motion to compel", 1.5);

        assert_eq!(entry.description, "Draft motion to compel");
        assert_eq!(entry.duration_hours, 1.5);
        assert!(entry.work_date.is_none());
        assert!(entry.utbms_code.is_none());
    }

    #[test]
    fn test_utbms_code_normalization() {
        let code = UtbmsCode::new("l120");
        assert_eq!(code.as_str(), "L120");
        assert!(!code.is_non_billable());
        assert!(UtbmsCode::new("nb").is_non_billable());
    }

    #[test]
    fn test_entry_id_serialization() {
        let id = EntryId::from_string("e-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"e-42\"");
    }
}
