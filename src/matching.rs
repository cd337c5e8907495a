use colored::Colorize;
use rusqlite::Connection;

use crate::error::{FiscalError, Result};
use crate::fmt::money;
use crate::prompt::Decisions;
use crate::rules::MARKETPLACE_LABELS;

/// Candidate generation strategies, exhausted in this order. Each runs its
/// own interactive loop; the candidate set is recomputed from the store after
/// every accepted action because accepting a pair removes both records from
/// later pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Issuer and counterpart alias to the same company, exact value match.
    Company,
    /// Counterpart is a known payment aggregator, exact value match.
    Marketplace,
    /// Recent validations offered for reversal.
    Undo,
}

impl Strategy {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Company => "MATCH INVOICES",
            Self::Marketplace => "MATCH MARKETPLACES",
            Self::Undo => "UNDO",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            Self::Undo => "Undo a validation (index, empty to stop)",
            _ => "Accept a match (index, empty to stop)",
        }
    }

    /// Candidates are presented grouped by issuer; undo is ordered by
    /// recency instead, so grouping would only add noise.
    fn grouped(&self) -> bool {
        !matches!(self, Self::Undo)
    }
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub access_code: String,
    pub transaction_id: i64,
    pub issuer: String,
    pub counterpart: Option<String>,
    pub issue_date: String,
    pub txn_date: String,
    pub day_diff: i64,
    pub value_cents: i64,
}

// Day difference ranks candidates, it never filters them; value equality is
// exact, with no tolerance band.
const COMPANY_SQL: &str = "
SELECT  inv.access_code,
        tra.id,
        inv.issuer,
        tra.counterpart,
        inv.issue_date,
        tra.date,
        CAST(julianday(inv.issue_date) - julianday(tra.date) AS INTEGER),
        tra.value_cents
FROM invoices inv
JOIN transactions tra ON inv.net_cents = tra.value_cents
JOIN aliases emi ON emi.label = inv.issuer
JOIN aliases cpt ON cpt.label = tra.counterpart
WHERE inv.validated = 0 AND tra.validated = 0
  AND emi.company_name = cpt.company_name
ORDER BY inv.issuer, ABS(julianday(inv.issue_date) - julianday(tra.date))
";

const MARKETPLACE_SQL: &str = "
SELECT  inv.access_code,
        tra.id,
        inv.issuer,
        tra.counterpart,
        inv.issue_date,
        tra.date,
        CAST(julianday(inv.issue_date) - julianday(tra.date) AS INTEGER),
        tra.value_cents
FROM invoices inv
JOIN transactions tra ON inv.net_cents = tra.value_cents
WHERE inv.validated = 0 AND tra.validated = 0
  AND lower(tra.counterpart) IN ({labels})
ORDER BY inv.issuer, ABS(julianday(inv.issue_date) - julianday(tra.date))
";

const UNDO_SQL: &str = "
SELECT  inv.access_code,
        tra.id,
        inv.issuer,
        tra.counterpart,
        inv.issue_date,
        tra.date,
        CAST(julianday(inv.issue_date) - julianday(tra.date) AS INTEGER),
        tra.value_cents
FROM validations val
JOIN invoices inv ON inv.access_code = val.access_code
JOIN transactions tra ON tra.id = val.transaction_id
ORDER BY val.created_at DESC, val.id DESC
LIMIT 10
";

fn row_to_candidate(row: &rusqlite::Row<'_>) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        access_code: row.get(0)?,
        transaction_id: row.get(1)?,
        issuer: row.get(2)?,
        counterpart: row.get(3)?,
        issue_date: row.get(4)?,
        txn_date: row.get(5)?,
        day_diff: row.get(6)?,
        value_cents: row.get(7)?,
    })
}

pub fn candidates(conn: &Connection, strategy: Strategy) -> Result<Vec<Candidate>> {
    let rows = match strategy {
        Strategy::Company => {
            let mut stmt = conn.prepare(COMPANY_SQL)?;
            let rows = stmt
                .query_map([], row_to_candidate)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        }
        Strategy::Marketplace => {
            let placeholders = vec!["?"; MARKETPLACE_LABELS.len()].join(", ");
            let sql = MARKETPLACE_SQL.replace("{labels}", &placeholders);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(MARKETPLACE_LABELS.iter().copied()), row_to_candidate)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        }
        Strategy::Undo => {
            let mut stmt = conn.prepare(UNDO_SQL)?;
            let rows = stmt
                .query_map([], row_to_candidate)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        }
    };
    Ok(rows)
}

/// Persist a confirmed pair: one validation row, both flags set. Atomic, so
/// a failure leaves no half-linked pair behind.
pub fn accept(conn: &Connection, candidate: &Candidate) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO validations (transaction_id, access_code) VALUES (?1, ?2)",
        rusqlite::params![candidate.transaction_id, candidate.access_code],
    )?;
    tx.execute(
        "UPDATE invoices SET validated = 1 WHERE access_code = ?1",
        [&candidate.access_code],
    )?;
    tx.execute(
        "UPDATE transactions SET validated = 1 WHERE id = ?1",
        [candidate.transaction_id],
    )?;
    tx.commit()?;
    Ok(())
}

/// Reverse a validation. A missing link means the presented candidate set
/// and the store diverged; a partial reversal must not proceed.
pub fn undo(conn: &Connection, candidate: &Candidate) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let deleted = tx.execute(
        "DELETE FROM validations WHERE transaction_id = ?1 AND access_code = ?2",
        rusqlite::params![candidate.transaction_id, candidate.access_code],
    )?;
    if deleted == 0 {
        println!(
            "{} no validation links transaction {} to invoice {}",
            "STATE MISMATCH:".red().bold(),
            candidate.transaction_id,
            candidate.access_code,
        );
        return Err(FiscalError::ValidationMissing {
            transaction_id: candidate.transaction_id,
            access_code: candidate.access_code.clone(),
        });
    }
    tx.execute(
        "UPDATE invoices SET validated = 0 WHERE access_code = ?1",
        [&candidate.access_code],
    )?;
    tx.execute(
        "UPDATE transactions SET validated = 0 WHERE id = ?1",
        [candidate.transaction_id],
    )?;
    tx.commit()?;
    Ok(())
}

fn print_candidates(cands: &[Candidate], grouped: bool) {
    let mut marker: Option<&str> = None;
    for (idx, c) in cands.iter().enumerate() {
        if grouped {
            if let Some(prev) = marker {
                if prev != c.issuer {
                    println!("----------");
                }
            }
            marker = Some(&c.issuer);
        }
        println!(
            "{:>2} - Diff: {:>3}\tEmiss\u{e3}o: {}\tTransa\u{e7}\u{e3}o: {}\tValor: {}\tEmissor: {}\tCounter: {}",
            idx,
            c.day_diff,
            c.issue_date,
            c.txn_date,
            money(c.value_cents),
            c.issuer,
            c.counterpart.as_deref().unwrap_or("-"),
        );
    }
}

/// One interactive loop: present, pick, act, recompute, until the operator
/// stops or no candidates remain.
pub fn run_strategy(
    conn: &Connection,
    strategy: Strategy,
    decisions: &mut dyn Decisions,
) -> Result<usize> {
    let mut acted = 0usize;
    loop {
        let cands = candidates(conn, strategy)?;
        if cands.is_empty() {
            println!("{}", "No candidates. Done.".green());
            break;
        }
        print_candidates(&cands, strategy.grouped());
        match decisions.pick(strategy.prompt(), cands.len())? {
            Some(idx) => {
                let candidate = &cands[idx];
                match strategy {
                    Strategy::Undo => undo(conn, candidate)?,
                    _ => accept(conn, candidate)?,
                }
                acted += 1;
            }
            None => break,
        }
    }
    Ok(acted)
}

pub fn run_all(conn: &Connection, decisions: &mut dyn Decisions) -> Result<()> {
    for strategy in [Strategy::Company, Strategy::Marketplace, Strategy::Undo] {
        println!("{}", strategy.title().bold());
        run_strategy(conn, strategy, decisions)?;
    }
    Ok(())
}
