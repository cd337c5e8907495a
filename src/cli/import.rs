use std::path::Path;

use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::ingest::ingest;
use crate::prompt::Console;
use crate::settings::db_path;
use crate::sources::parse_statement;

pub fn run(file: &str, bank: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let batch = parse_statement(bank, Path::new(file))?;
    let total = batch.len();

    let summary = ingest(&conn, batch, bank, &mut Console)?;

    println!(
        "{} {} imported, {} already present ({} parsed)",
        "Done.".green(),
        summary.inserted,
        summary.skipped,
        total,
    );
    Ok(())
}
