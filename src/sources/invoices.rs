use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use rusqlite::Connection;

use crate::error::{FiscalError, Result};
use crate::fmt::parse_brl;
use crate::models::Invoice;
use crate::resolver::{register_issuer, CompanyIndex};

/// One row of the advanced invoice report, already normalized: tax ids are
/// zero-padded to 14 digits here because this source truncates leading
/// zeros, not because the engine normalizes (it never does).
#[derive(Debug, Clone)]
pub struct InvoiceRow {
    pub invoice: Invoice,
    pub tax_id: String,
}

fn pad_tax_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 14 {
        return raw.to_string();
    }
    format!("{raw:0>14}")
}

pub fn parse(path: &Path) -> Result<Vec<InvoiceRow>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.trim() == name);
    let idx_code = col("Chave de Acesso")
        .ok_or_else(|| FiscalError::Other("invoice report missing 'Chave de Acesso'".into()))?;
    let idx_tax_id = col("CNPJ Emitente")
        .ok_or_else(|| FiscalError::Other("invoice report missing 'CNPJ Emitente'".into()))?;
    let idx_issuer = col("Nome PJ Emitente")
        .ok_or_else(|| FiscalError::Other("invoice report missing 'Nome PJ Emitente'".into()))?;
    let idx_date = col("Data Emiss\u{e3}o")
        .ok_or_else(|| FiscalError::Other("invoice report missing 'Data Emiss\u{e3}o'".into()))?;
    let idx_gross = col("Valor Total da Nota")
        .ok_or_else(|| FiscalError::Other("invoice report missing 'Valor Total da Nota'".into()))?;
    let idx_net = col("Valor Total Produtos")
        .ok_or_else(|| FiscalError::Other("invoice report missing 'Valor Total Produtos'".into()))?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let Ok(record) = result else { continue };

        let Some(issue_date) = record
            .get(idx_date)
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok())
        else {
            continue;
        };
        let (Some(gross_cents), Some(net_cents)) = (
            record.get(idx_gross).and_then(parse_brl),
            record.get(idx_net).and_then(parse_brl),
        ) else {
            continue;
        };

        rows.push(InvoiceRow {
            invoice: Invoice {
                access_code: record.get(idx_code).unwrap_or("").trim().to_string(),
                issuer: record.get(idx_issuer).unwrap_or("").trim().to_lowercase(),
                issue_date,
                net_cents,
                gross_cents,
                validated: false,
            },
            tax_id: pad_tax_id(record.get(idx_tax_id).unwrap_or("")),
        });
    }
    Ok(rows)
}

#[derive(Debug)]
pub struct InvoiceSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Commit invoice rows: dedup by access code, register the issuer as a
/// company/alias (divergent tax ids are fatal), one insert per row.
pub fn ingest_invoices(conn: &Connection, rows: Vec<InvoiceRow>) -> Result<InvoiceSummary> {
    let mut stmt = conn.prepare("SELECT access_code FROM invoices")?;
    let known: HashSet<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    drop(stmt);

    let mut index = CompanyIndex::load(conn)?;
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for row in rows {
        if known.contains(&row.invoice.access_code) {
            skipped += 1;
            continue;
        }
        println!("{} - {}", row.invoice.issuer.cyan(), row.tax_id);

        register_issuer(conn, &mut index, &row.invoice.issuer, &row.tax_id)?;

        conn.execute(
            "INSERT INTO invoices (access_code, issuer, issue_date, net_cents, gross_cents, validated) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            rusqlite::params![
                row.invoice.access_code,
                row.invoice.issuer,
                row.invoice.issue_date.format("%Y-%m-%d").to_string(),
                row.invoice.net_cents,
                row.invoice.gross_cents,
            ],
        )?;
        inserted += 1;
    }

    Ok(InvoiceSummary { inserted, skipped })
}
