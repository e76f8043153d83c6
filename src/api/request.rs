use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClientId, EntryId, MatterId, TimeEntry, TimekeeperId, UtbmsCode};

/// One time entry supplied inline with a compliance check.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryRequest {
    /// Entry id; generated when absent
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub work_date: Option<NaiveDate>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub matter_id: Option<String>,

    #[serde(default)]
    pub timekeeper_id: Option<String>,

    pub duration_hours: f64,

    pub description: String,

    #[serde(default)]
    pub utbms_code: Option<String>,
}

impl EntryRequest {
    /// Convert to a TimeEntry for rule evaluation.
    pub fn to_time_entry(&self) -> TimeEntry {
        TimeEntry {
            id: self
                .id
                .as_deref()
                .map(EntryId::from_string)
                .unwrap_or_default(),
            work_date: self.work_date,
            client_id: self.client_id.as_deref().map(ClientId::new),
            matter_id: self.matter_id.as_deref().map(MatterId::new),
            timekeeper_id: self.timekeeper_id.as_deref().map(TimekeeperId::new),
            duration_hours: self.duration_hours,
            description: self.description.clone(),
            utbms_code: self.utbms_code.as_deref().map(UtbmsCode::new),
        }
    }
}

/// Request for a compliance check.
///
/// Entries are either supplied inline or selected from storage by
/// matter and date range. The optional client id selects a policy
/// overlay.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComplianceCheckRequest {
    #[serde(default)]
    pub entries: Option<Vec<EntryRequest>>,

    #[serde(default)]
    pub matter_id: Option<String>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub client_id: Option<String>,
}

/// Request to ingest ActivityWatch events.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRequest {
    /// ActivityWatch base URL; defaults to the configured instance
    #[serde(default)]
    pub url: Option<String>,

    pub client_id: String,

    pub matter_id: String,

    #[serde(default)]
    pub timekeeper_id: Option<String>,

    /// Window start; defaults to 24h before `until`
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,

    /// Window end; defaults to now
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

/// Request to export a LEDES 1998B invoice.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportRequest {
    pub client_matter_id: String,

    pub invoice_number: String,

    pub billing_start: NaiveDate,

    pub billing_end: NaiveDate,

    #[serde(default)]
    pub invoice_description: Option<String>,
}

/// Request carrying one narrative for categorization or linting.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}
