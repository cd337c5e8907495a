use colored::Colorize;
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

fn count(conn: &Connection, sql: &str) -> Result<i64> {
    Ok(conn.query_row(sql, [], |r| r.get(0))?)
}

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;

    let txns = count(&conn, "SELECT count(*) FROM transactions")?;
    let open_txns = count(&conn, "SELECT count(*) FROM transactions WHERE validated = 0")?;
    let invoices = count(&conn, "SELECT count(*) FROM invoices")?;
    let open_invoices = count(&conn, "SELECT count(*) FROM invoices WHERE validated = 0")?;
    let validations = count(&conn, "SELECT count(*) FROM validations")?;

    println!("{}", "Ledger".bold());
    println!("  transactions: {txns} ({open_txns} unvalidated)");
    println!("  invoices:     {invoices} ({open_invoices} unvalidated)");
    println!("  validations:  {validations}");
    Ok(())
}
