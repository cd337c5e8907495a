use std::path::Path;

use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;
use crate::sources::invoices::{ingest_invoices, parse};

pub fn run(file: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = parse(Path::new(file))?;
    let total = rows.len();

    let summary = ingest_invoices(&conn, rows)?;

    println!(
        "{} {} invoices added, {} already present ({} parsed)",
        "Done.".green(),
        summary.inserted,
        summary.skipped,
        total,
    );
    Ok(())
}
