use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{ClientId, TimekeeperId};

/// A billable matter, carrying the identifiers LEDES invoices need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matter {
    /// Client the matter belongs to
    pub client_id: ClientId,

    /// Client-side matter identifier
    pub client_matter_id: String,

    /// Law-firm-side matter identifier
    pub law_firm_matter_id: String,

    /// Law firm identifier
    pub law_firm_id: String,

    /// Matter description (used as the invoice description fallback)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A timekeeper with the billing attributes LEDES invoices need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timekeeper {
    /// Timekeeper identifier
    pub id: TimekeeperId,

    /// Full name
    pub name: String,

    /// Classification (e.g., "PT" partner, "AS" associate, "PL" paralegal)
    pub classification: String,

    /// Hourly rate
    pub rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timekeeper_deserialization() {
        let json = r#"{
            "id": "TK123",
            "name": "Alice Johnson",
            "classification": "PT",
            "rate": "450.00"
        }"#;

        let tk: Timekeeper = serde_json::from_str(json).unwrap();
        assert_eq!(tk.id.as_str(), "TK123");
        assert_eq!(tk.rate, Decimal::new(45000, 2));
    }
}
