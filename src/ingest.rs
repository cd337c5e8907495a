use std::collections::HashSet;

use colored::Colorize;
use rusqlite::Connection;

use crate::categorizer::categorize;
use crate::db::bank_exists;
use crate::error::{FiscalError, Result};
use crate::models::{EntryType, Incoming, Transaction};
use crate::prompt::Decisions;
use crate::resolver::{resolve, CompanyIndex};
use crate::rules;

#[derive(Debug)]
pub struct IngestSummary {
    pub inserted: usize,
    pub skipped: usize,
}

fn existing_external_ids(conn: &Connection, bank: &str) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT external_id FROM transactions WHERE bank = ?1")?;
    let ids = stmt
        .query_map([bank], |row| row.get(0))?
        .collect::<std::result::Result<HashSet<String>, _>>()?;
    Ok(ids)
}

fn insert_transaction(conn: &Connection, txn: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions \
         (bank, date, entry_type, txn_type, category, description, value_cents, counterpart, validated, external_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            txn.bank,
            txn.date.format("%Y-%m-%d").to_string(),
            txn.entry_type.as_str(),
            txn.txn_type,
            txn.category,
            txn.description,
            txn.value_cents,
            txn.counterpart,
            txn.validated,
            txn.external_id,
        ],
    )?;
    Ok(())
}

/// Commit a batch of normalized transactions for one bank. Records whose
/// external id is already present are dropped; that check is the sole
/// idempotence guarantee, so a re-run after a mid-batch abort picks up
/// exactly where it stopped. Each record commits on its own.
pub fn ingest(
    conn: &Connection,
    batch: Vec<Incoming>,
    bank: &str,
    decisions: &mut dyn Decisions,
) -> Result<IngestSummary> {
    if !bank_exists(conn, bank)? {
        return Err(FiscalError::UnknownBank(bank.to_string()));
    }

    let existing = existing_external_ids(conn, bank)?;
    let total = batch.len();
    let mut batch: Vec<Incoming> = batch
        .into_iter()
        .filter(|rec| !existing.contains(&rec.txn.external_id))
        .collect();
    let skipped = total - batch.len();

    let mut index = CompanyIndex::load(conn)?;

    // Date order keeps fuzzy suggestions deterministic within the batch.
    batch.sort_by_key(|rec| rec.txn.date);

    let mut inserted = 0usize;
    for rec in batch {
        let mut txn = rec.txn;
        debug_assert_eq!(txn.bank, bank);

        let label = txn.counterpart.clone().unwrap_or_default();
        println!(
            "{} | {} | {} | {}",
            label.cyan(),
            txn.entry_type.as_str(),
            txn.txn_type,
            txn.date.format("%Y-%m-%d"),
        );

        let requires = rules::requires_counterparty(&txn.txn_type)
            && txn.entry_type == EntryType::Saida;

        let company = if requires {
            let company = resolve(conn, &index, &label, &rec.tax_id, decisions)?;
            index.admit(&company, &label);
            Some(company)
        } else {
            txn.counterpart = None;
            None
        };

        txn.category = Some(categorize(txn.entry_type, &txn.txn_type, company.as_ref())?);

        insert_transaction(conn, &txn)?;
        inserted += 1;
    }

    Ok(IngestSummary { inserted, skipped })
}
