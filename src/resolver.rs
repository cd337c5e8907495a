use std::collections::{HashMap, HashSet};

use colored::Colorize;
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::{FiscalError, Result};
use crate::models::Company;
use crate::prompt::Decisions;

/// Batch-scoped snapshot of companies keyed by tax id (exact string),
/// canonical name, and every known alias label (case-insensitive).
/// Rebuilt from the store on every ingestion call; never persisted.
pub struct CompanyIndex {
    map: HashMap<String, Company>,
}

impl CompanyIndex {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut index = Self { map: HashMap::new() };

        let mut stmt = conn.prepare("SELECT name, tax_id, default_category FROM companies")?;
        let companies: Vec<Company> = stmt
            .query_map([], |row| {
                Ok(Company {
                    name: row.get(0)?,
                    tax_id: row.get(1)?,
                    default_category: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for company in &companies {
            index.admit(company, &company.name);
        }

        let mut stmt = conn.prepare(
            "SELECT a.label, c.name, c.tax_id, c.default_category \
             FROM aliases a JOIN companies c ON c.name = a.company_name",
        )?;
        let aliased: Vec<(String, Company)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    Company {
                        name: row.get(1)?,
                        tax_id: row.get(2)?,
                        default_category: row.get(3)?,
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for (label, company) in aliased {
            index.admit(&company, &label);
        }

        Ok(index)
    }

    /// Register a company under its tax id, canonical name, and `label`, so
    /// later records in the same batch reuse it without re-prompting.
    pub fn admit(&mut self, company: &Company, label: &str) {
        self.map.insert(company.tax_id.clone(), company.clone());
        self.map.insert(company.name.to_lowercase(), company.clone());
        self.map.insert(label.to_lowercase(), company.clone());
    }

    pub fn by_label(&self, label: &str) -> Option<&Company> {
        self.map.get(&label.to_lowercase())
    }

    pub fn by_tax_id(&self, tax_id: &str) -> Option<&Company> {
        self.map.get(tax_id)
    }

    /// Closest known key by token overlap, for the interactive suggestion.
    /// Digit-only keys score zero against free-text labels on their own.
    pub fn suggest(&self, label: &str) -> Option<(&str, &str)> {
        let mut best: Option<(&str, &str, f64)> = None;
        for (key, company) in &self.map {
            let score = token_score(label, key);
            if score > 0.0 && best.map_or(true, |(_, _, s)| score > s) {
                best = Some((key.as_str(), company.tax_id.as_str(), score));
            }
        }
        best.map(|(key, tax_id, _)| (key, tax_id))
    }
}

fn tokens(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2 && !w.chars().all(|c| c.is_numeric()))
        .map(str::to_string)
        .collect()
}

/// Token-set overlap in [0, 1]; containment of one label in the other is
/// treated as a strong signal regardless of token counts.
fn token_score(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokens(a), tokens(b));
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let shared = ta.intersection(&tb).count() as f64;
    let union = ta.union(&tb).count() as f64;
    let jaccard = shared / union;

    let (al, bl) = (a.to_lowercase(), b.to_lowercase());
    if al.contains(&bl) || bl.contains(&al) {
        jaccard.max(0.75)
    } else {
        jaccard
    }
}

fn insert_alias(conn: &Connection, label: &str, company_name: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO aliases (label, company_name) VALUES (?1, ?2)",
        rusqlite::params![label, company_name],
    )?;
    Ok(())
}

fn insert_company(conn: &Connection, company: &Company) -> Result<()> {
    conn.execute(
        "INSERT INTO companies (name, tax_id, default_category) VALUES (?1, ?2, ?3)",
        rusqlite::params![company.name, company.tax_id, company.default_category],
    )?;
    insert_alias(conn, &company.name, &company.name)
}

/// Map a free-text counterparty label (+ optional tax id) to a canonical
/// company, creating alias/company rows as needed. Blocks on the decision
/// port for ambiguous cases; never fails to produce a company.
pub fn resolve(
    conn: &Connection,
    index: &CompanyIndex,
    label: &str,
    tax_id: &str,
    decisions: &mut dyn Decisions,
) -> Result<Company> {
    if let Some(company) = index.by_label(label) {
        return Ok(company.clone());
    }

    let mut tax_id = tax_id.trim().to_string();
    if tax_id.is_empty() {
        match index.suggest(label) {
            Some((known, known_id)) => {
                println!("Similar named '{}' with tax id {}", known.cyan(), known_id)
            }
            None => println!("No similar company known."),
        }
        tax_id = decisions.ask(&format!("Tax id for '{label}'"), "")?;
        if tax_id.is_empty() {
            // Unidentified but distinct
            tax_id = Uuid::new_v4().to_string();
            println!("Assigned synthetic tax id {}", tax_id.dimmed());
        }
    }

    if let Some(company) = index.by_tax_id(&tax_id) {
        insert_alias(conn, label, &company.name)?;
        return Ok(company.clone());
    }

    println!("Creating company for '{}' with tax id {}", label.cyan(), tax_id);
    let name = decisions.ask("Canonical name", label)?;
    let name = if name.is_empty() { label.to_string() } else { name };
    let category = decisions.ask("Default category", "")?;
    let company = Company {
        name,
        tax_id,
        default_category: if category.is_empty() { None } else { Some(category) },
    };
    insert_company(conn, &company)?;
    insert_alias(conn, label, &company.name)?;
    Ok(company)
}

/// Non-interactive issuer registration for invoice ingestion. A label that
/// already aliases a company under a different tax id is a conflict between
/// two distinct entities and must not be merged silently.
pub fn register_issuer(
    conn: &Connection,
    index: &mut CompanyIndex,
    label: &str,
    tax_id: &str,
) -> Result<Company> {
    if let Some(company) = index.by_label(label) {
        if company.tax_id != tax_id {
            println!(
                "{} label '{}' aliases '{}' (tax id {}), incoming tax id {}",
                "CONFLICT:".red().bold(),
                label,
                company.name,
                company.tax_id,
                tax_id,
            );
            return Err(FiscalError::IdentityConflict {
                label: label.to_string(),
                existing: company.tax_id.clone(),
                supplied: tax_id.to_string(),
            });
        }
        return Ok(company.clone());
    }

    if let Some(company) = index.by_tax_id(tax_id).cloned() {
        insert_alias(conn, label, &company.name)?;
        index.admit(&company, label);
        return Ok(company);
    }

    let company = Company {
        name: label.to_string(),
        tax_id: tax_id.to_string(),
        default_category: None,
    };
    insert_company(conn, &company)?;
    index.admit(&company, label);
    Ok(company)
}
