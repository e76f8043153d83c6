use rust_decimal::Decimal;

use super::exporter::LedesLine;

/// Validate invoice lines before rendering.
///
/// All failures are collected and returned together so a caller can
/// fix an invoice in one pass.
pub fn validate_lines(lines: &[LedesLine]) -> Vec<String> {
    let tolerance = Decimal::new(1, 2); // one cent
    let mut errors = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        let mut must = |field: &str, ok: bool, msg: &str| {
            if !ok {
                errors.push(format!("Line {n}: {field} {msg}"));
            }
        };

        must("TIMEKEEPER_ID", !line.timekeeper_id.is_empty(), "is required");
        must(
            "LINE_ITEM_NUMBER_OF_UNITS",
            line.units > Decimal::ZERO,
            "> 0",
        );
        must("LINE_ITEM_UNIT_COST", line.unit_cost > Decimal::ZERO, "> 0");

        let calculated = line.units * line.unit_cost + line.adjustment;
        must(
            "LINE_ITEM_TOTAL",
            (line.line_total - calculated).abs() < tolerance,
            "must equal units*rate+adj",
        );

        // Required header fields
        must("INVOICE_DATE", !line.invoice_date.is_empty(), "is required");
        must(
            "INVOICE_NUMBER",
            !line.invoice_number.is_empty(),
            "is required",
        );
        must("CLIENT_ID", !line.client_id.is_empty(), "is required");
        must(
            "LAW_FIRM_MATTER_ID",
            !line.law_firm_matter_id.is_empty(),
            "is required",
        );
        must("LAW_FIRM_ID", !line.law_firm_id.is_empty(), "is required");
        must(
            "CLIENT_MATTER_ID",
            !line.client_matter_id.is_empty(),
            "is required",
        );
    }

    errors
}
