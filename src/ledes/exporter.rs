use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Matter, TimeEntry, Timekeeper};

use super::validator::validate_lines;
use super::LedesError;

/// The 24 fields of the LEDES 1998B layout, in wire order.
pub const LEDES_1998B_FIELDS: [&str; 24] = [
    "INVOICE_DATE",
    "INVOICE_NUMBER",
    "CLIENT_ID",
    "LAW_FIRM_MATTER_ID",
    "INVOICE_TOTAL",
    "BILLING_START_DATE",
    "BILLING_END_DATE",
    "INVOICE_DESCRIPTION",
    "LINE_ITEM_NUMBER",
    "EXP/FEE/INV_ADJ_TYPE",
    "LINE_ITEM_NUMBER_OF_UNITS",
    "LINE_ITEM_ADJUSTMENT_AMOUNT",
    "LINE_ITEM_TOTAL",
    "LINE_ITEM_DATE",
    "LINE_ITEM_TASK_CODE",
    "LINE_ITEM_EXPENSE_CODE",
    "LINE_ITEM_ACTIVITY_CODE",
    "TIMEKEEPER_ID",
    "LINE_ITEM_DESCRIPTION",
    "LAW_FIRM_ID",
    "LINE_ITEM_UNIT_COST",
    "TIMEKEEPER_NAME",
    "TIMEKEEPER_CLASSIFICATION",
    "CLIENT_MATTER_ID",
];

/// Caller-supplied invoice parameters.
#[derive(Debug, Clone)]
pub struct InvoiceParams {
    pub invoice_number: String,
    pub billing_start: NaiveDate,
    pub billing_end: NaiveDate,
    pub invoice_description: Option<String>,
}

/// One fee line of a 1998B invoice.
#[derive(Debug, Clone)]
pub struct LedesLine {
    pub invoice_date: String,
    pub invoice_number: String,
    pub client_id: String,
    pub law_firm_matter_id: String,
    pub invoice_total: Decimal,
    pub billing_start_date: String,
    pub billing_end_date: String,
    pub invoice_description: String,
    pub line_item_number: u32,
    pub adj_type: String,
    pub units: Decimal,
    pub adjustment: Decimal,
    pub line_total: Decimal,
    pub line_item_date: String,
    pub task_code: String,
    pub expense_code: String,
    pub activity_code: String,
    pub timekeeper_id: String,
    pub description: String,
    pub law_firm_id: String,
    pub unit_cost: Decimal,
    pub timekeeper_name: String,
    pub timekeeper_classification: String,
    pub client_matter_id: String,
}

impl LedesLine {
    /// Serialize in `LEDES_1998B_FIELDS` order.
    pub fn to_fields(&self) -> [String; 24] {
        [
            self.invoice_date.clone(),
            self.invoice_number.clone(),
            self.client_id.clone(),
            self.law_firm_matter_id.clone(),
            format!("{:.2}", self.invoice_total),
            self.billing_start_date.clone(),
            self.billing_end_date.clone(),
            self.invoice_description.clone(),
            self.line_item_number.to_string(),
            self.adj_type.clone(),
            format!("{:.2}", self.units),
            format!("{:.2}", self.adjustment),
            format!("{:.2}", self.line_total),
            self.line_item_date.clone(),
            self.task_code.clone(),
            self.expense_code.clone(),
            self.activity_code.clone(),
            self.timekeeper_id.clone(),
            self.description.clone(),
            self.law_firm_id.clone(),
            format!("{:.2}", self.unit_cost),
            self.timekeeper_name.clone(),
            self.timekeeper_classification.clone(),
            self.client_matter_id.clone(),
        ]
    }
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The pipe is the field delimiter; it cannot survive in text fields.
fn sanitize(text: &str) -> String {
    text.replace('|', " ")
}

/// Build validated invoice lines for a matter.
///
/// Entries without a UTBMS code, or coded "NB" (non-billable), are
/// skipped. Every remaining entry must resolve to a known timekeeper;
/// the invoice total is computed across all lines and backfilled into
/// each of them.
pub fn build_invoice(
    matter: &Matter,
    entries: &[TimeEntry],
    timekeepers: &HashMap<String, Timekeeper>,
    params: &InvoiceParams,
) -> Result<Vec<LedesLine>, LedesError> {
    let invoice_date = fmt_date(params.billing_end);
    let billing_start = fmt_date(params.billing_start);
    let billing_end = fmt_date(params.billing_end);
    let invoice_description = sanitize(
        params
            .invoice_description
            .as_deref()
            .or(matter.description.as_deref())
            .unwrap_or(""),
    );

    let mut lines = Vec::new();
    let mut invoice_total = Decimal::ZERO;
    let mut line_no = 1u32;

    for entry in entries {
        let Some(code) = &entry.utbms_code else {
            continue;
        };
        if code.is_non_billable() {
            continue;
        }

        let timekeeper_id = entry
            .timekeeper_id
            .as_ref()
            .ok_or_else(|| LedesError::MissingTimekeeper("<unassigned>".to_string()))?;
        let timekeeper = timekeepers
            .get(timekeeper_id.as_str())
            .ok_or_else(|| LedesError::MissingTimekeeper(timekeeper_id.to_string()))?;

        let units = Decimal::from_f64_retain(entry.duration_hours)
            .unwrap_or_default()
            .round_dp(2);
        let adjustment = Decimal::ZERO;
        let line_total = (units * timekeeper.rate + adjustment).round_dp(2);
        invoice_total += line_total;

        lines.push(LedesLine {
            invoice_date: invoice_date.clone(),
            invoice_number: params.invoice_number.clone(),
            client_id: matter.client_id.as_str().to_string(),
            law_firm_matter_id: matter.law_firm_matter_id.clone(),
            invoice_total: Decimal::ZERO, // backfilled below
            billing_start_date: billing_start.clone(),
            billing_end_date: billing_end.clone(),
            invoice_description: invoice_description.clone(),
            line_item_number: line_no,
            adj_type: "F".to_string(),
            units,
            adjustment,
            line_total,
            line_item_date: entry.work_date.map(fmt_date).unwrap_or_default(),
            task_code: code.as_str().to_string(),
            expense_code: String::new(),
            activity_code: String::new(),
            timekeeper_id: timekeeper_id.as_str().to_string(),
            description: sanitize(&entry.description),
            law_firm_id: matter.law_firm_id.clone(),
            unit_cost: timekeeper.rate,
            timekeeper_name: timekeeper.name.clone(),
            timekeeper_classification: timekeeper.classification.clone(),
            client_matter_id: matter.client_matter_id.clone(),
        });
        line_no += 1;
    }

    for line in &mut lines {
        line.invoice_total = invoice_total;
    }

    let errors = validate_lines(&lines);
    if !errors.is_empty() {
        return Err(LedesError::Validation(errors));
    }

    Ok(lines)
}

/// Render lines as a pipe-delimited 1998B document.
pub fn render(lines: &[LedesLine]) -> String {
    let mut out = String::new();
    out.push_str(&LEDES_1998B_FIELDS.join("|"));
    out.push('\n');
    for line in lines {
        out.push_str(&line.to_fields().join("|"));
        out.push('\n');
    }
    out
}

/// Write a rendered invoice under the export directory, returning the
/// file path.
pub fn write_invoice(
    dir: &Path,
    client_matter_id: &str,
    invoice_number: &str,
    content: &str,
) -> Result<PathBuf, LedesError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{client_matter_id}_{invoice_number}_LEDES1998B.txt"));
    fs::write(&path, content)?;
    Ok(path)
}
