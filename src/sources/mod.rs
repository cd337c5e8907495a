pub mod bb;
pub mod invoices;

use std::path::Path;

use crate::error::{FiscalError, Result};
use crate::models::Incoming;

/// Statement parser for a registered bank. Sources hand the engine already
/// normalized records, tax ids included; normalization quirks stay here.
pub fn parse_statement(bank: &str, path: &Path) -> Result<Vec<Incoming>> {
    match bank {
        bb::BANK => bb::parse(path),
        _ => Err(FiscalError::NoParser(bank.to_string())),
    }
}
