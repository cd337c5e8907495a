use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::matching::{run_all, run_strategy, Strategy};
use crate::prompt::Console;
use crate::settings::db_path;

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;
    run_all(&conn, &mut Console)
}

pub fn undo() -> Result<()> {
    let conn = get_connection(&db_path())?;
    println!("{}", Strategy::Undo.title().bold());
    run_strategy(&conn, Strategy::Undo, &mut Console)?;
    Ok(())
}
