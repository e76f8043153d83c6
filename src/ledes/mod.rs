pub mod exporter;
pub mod validator;

pub use exporter::{
    build_invoice, render, write_invoice, InvoiceParams, LedesLine, LEDES_1998B_FIELDS,
};
pub use validator::validate_lines;

use thiserror::Error;

/// Errors from building or writing a LEDES invoice.
#[derive(Error, Debug)]
pub enum LedesError {
    #[error("Missing timekeeper '{0}'. Add it to timekeepers with a non-zero rate.")]
    MissingTimekeeper(String),

    #[error("LEDES validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
