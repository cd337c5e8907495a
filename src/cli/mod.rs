pub mod companies;
pub mod import;
pub mod init;
pub mod invoices;
pub mod matching;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fiscal", about = "Ledger reconciliation: identity, categories, invoice matching.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up fiscal: choose a data directory and initialize the database.
    Init {
        /// Path for fiscal data (default: ~/Documents/fiscal)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a bank statement export and resolve counterparties.
    Import {
        /// Path to the statement CSV
        file: String,
        /// Registered bank code (e.g. bb)
        #[arg(long)]
        bank: String,
    },
    /// Import an invoice report and register issuers.
    Invoices {
        /// Path to the invoice report CSV
        file: String,
    },
    /// Interactively match invoices against ledger transactions.
    Match,
    /// Reverse recently confirmed matches.
    Undo,
    /// List known companies with their aliases.
    Companies,
    /// Show ledger and matching counters.
    Status,
}
