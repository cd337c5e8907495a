use thiserror::Error;

#[derive(Error, Debug)]
pub enum FiscalError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("No statement parser for bank: {0}")]
    NoParser(String),

    #[error("No category rule covers transaction type '{0}' and the company has no default")]
    Uncategorizable(String),

    #[error("Label '{label}' already aliases a company with tax id '{existing}', got '{supplied}'")]
    IdentityConflict {
        label: String,
        existing: String,
        supplied: String,
    },

    #[error("Validation link not found for transaction {transaction_id} and invoice {access_code}")]
    ValidationMissing {
        transaction_id: i64,
        access_code: String,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FiscalError>;
