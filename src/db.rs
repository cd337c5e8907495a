use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS banks (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    bank TEXT NOT NULL REFERENCES banks(code),
    date TEXT NOT NULL,
    entry_type TEXT NOT NULL,
    txn_type TEXT NOT NULL,
    category TEXT,
    description TEXT NOT NULL,
    value_cents INTEGER NOT NULL,
    counterpart TEXT,
    validated INTEGER NOT NULL DEFAULT 0,
    external_id TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    UNIQUE (bank, external_id)
);

CREATE TABLE IF NOT EXISTS companies (
    name TEXT PRIMARY KEY COLLATE NOCASE,
    tax_id TEXT NOT NULL,
    default_category TEXT
);

CREATE TABLE IF NOT EXISTS aliases (
    label TEXT PRIMARY KEY COLLATE NOCASE,
    company_name TEXT NOT NULL REFERENCES companies(name)
);

CREATE TABLE IF NOT EXISTS invoices (
    access_code TEXT PRIMARY KEY,
    issuer TEXT NOT NULL,
    issue_date TEXT NOT NULL,
    net_cents INTEGER NOT NULL,
    gross_cents INTEGER NOT NULL,
    validated INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS validations (
    id INTEGER PRIMARY KEY,
    transaction_id INTEGER NOT NULL UNIQUE REFERENCES transactions(id),
    access_code TEXT NOT NULL UNIQUE REFERENCES invoices(access_code),
    created_at TEXT DEFAULT (datetime('now'))
);
";

// (code, description)
const DEFAULT_BANKS: &[(&str, &str)] = &[
    ("bb", "Banco do Brasil"),
    ("inter", "Banco Inter"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    for (code, description) in DEFAULT_BANKS {
        conn.execute(
            "INSERT OR IGNORE INTO banks (code, description) VALUES (?1, ?2)",
            rusqlite::params![code, description],
        )?;
    }
    Ok(())
}

pub fn bank_exists(conn: &Connection, code: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM banks WHERE code = ?1")?;
    Ok(stmt.exists([code])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["banks", "transactions", "companies", "aliases", "invoices", "validations"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_init_db_seeds_banks() {
        let (_dir, conn) = test_db();
        assert!(bank_exists(&conn, "bb").unwrap());
        assert!(bank_exists(&conn, "inter").unwrap());
        assert!(!bank_exists(&conn, "itau").unwrap());
    }

    #[test]
    fn test_external_id_unique_per_bank() {
        let (_dir, conn) = test_db();
        let insert = "INSERT INTO transactions (bank, date, entry_type, txn_type, description, value_cents, external_id) \
                      VALUES (?1, '2023-04-01', 'saida', 'pix', 'x', 100, ?2)";
        conn.execute(insert, rusqlite::params!["bb", "A1"]).unwrap();
        assert!(conn.execute(insert, rusqlite::params!["bb", "A1"]).is_err());
        // Same external id under another bank's namespace is fine
        conn.execute(insert, rusqlite::params!["inter", "A1"]).unwrap();
    }

    #[test]
    fn test_validations_are_one_to_one() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO transactions (bank, date, entry_type, txn_type, description, value_cents, external_id) \
             VALUES ('bb', '2023-04-01', 'saida', 'pix', 'x', 100, 'A1')",
            [],
        )
        .unwrap();
        let txn_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO invoices (access_code, issuer, issue_date, net_cents, gross_cents) \
             VALUES ('NF1', 'acme', '2023-04-01', 100, 110)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO validations (transaction_id, access_code) VALUES (?1, 'NF1')",
            [txn_id],
        )
        .unwrap();
        assert!(conn
            .execute(
                "INSERT INTO validations (transaction_id, access_code) VALUES (?1, 'NF1')",
                [txn_id],
            )
            .is_err());
    }

    #[test]
    fn test_alias_labels_are_case_insensitive() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO companies (name, tax_id) VALUES ('Acme', '999')", []).unwrap();
        conn.execute("INSERT INTO aliases (label, company_name) VALUES ('Acme Ltd', 'Acme')", []).unwrap();
        let found: String = conn
            .query_row(
                "SELECT company_name FROM aliases WHERE label = 'ACME LTD'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(found, "Acme");
    }
}
