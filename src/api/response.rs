use serde::{Deserialize, Serialize};

use crate::domain::ComplianceIssue;

/// Result of a compliance check.
///
/// `active_rules` lists the rules that actually ran, in evaluation
/// order, so callers can tell "rules ran and found nothing" apart
/// from "rules did not run".
#[derive(Debug, Serialize, Deserialize)]
pub struct ComplianceCheckResponse {
    pub issues: Vec<ComplianceIssue>,
    pub active_rules: Vec<String>,
}

/// Result of an ingestion run.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub inserted: u64,
}

/// Result of a LEDES export.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub file_path: String,
}

/// Result of a narrative lint.
#[derive(Debug, Serialize, Deserialize)]
pub struct NarrativeLintResponse {
    pub warnings: Vec<String>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Readiness check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub ready: bool,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
        }
    }
}
