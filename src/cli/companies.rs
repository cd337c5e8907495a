use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

struct CompanyLine {
    name: String,
    tax_id: String,
    default_category: Option<String>,
    alias_count: i64,
}

fn list(conn: &Connection) -> Result<Vec<CompanyLine>> {
    let mut stmt = conn.prepare(
        "SELECT c.name, c.tax_id, c.default_category, count(a.label) \
         FROM companies c LEFT JOIN aliases a ON a.company_name = c.name \
         GROUP BY c.name ORDER BY c.name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CompanyLine {
                name: row.get(0)?,
                tax_id: row.get(1)?,
                default_category: row.get(2)?,
                alias_count: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let companies = list(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Tax id", "Default category", "Aliases"]);
    for c in &companies {
        table.add_row(vec![
            Cell::new(&c.name),
            Cell::new(&c.tax_id),
            Cell::new(c.default_category.as_deref().unwrap_or("\u{2014}")),
            Cell::new(c.alias_count),
        ]);
    }
    println!("{table}");
    println!("{} companies", companies.len());
    Ok(())
}
