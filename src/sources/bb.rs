use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::Result;
use crate::fmt::parse_brl;
use crate::models::{EntryType, Incoming, Transaction};

pub const BANK: &str = "bb";

// ---------------------------------------------------------------------------
// Counterpart extraction
// ---------------------------------------------------------------------------

/// Statement detail lines sometimes open with a "dd/mm HH:MM " timestamp
/// before the counterparty text.
fn strip_time_prefix(description: &str) -> &str {
    let Ok(re) = Regex::new(r"^\d{2}/\d{2} \d{2}:\d{2} ?") else {
        return description;
    };
    match re.find(description) {
        Some(m) => &description[m.end()..],
        None => description,
    }
}

fn digits(chars: &[char]) -> bool {
    !chars.is_empty() && chars.iter().all(|c| c.is_ascii_digit())
}

/// Pull an embedded tax id out of the counterparty text. Two layouts occur:
/// the id leads the text, or it sits after a 9-character routing prefix.
/// Anything else yields an empty tax id and the text untouched.
fn tax_id_in_name(name: &str) -> (String, String) {
    let chars: Vec<char> = name.chars().collect();

    if chars.len() >= 15 && digits(&chars[..15]) {
        return (
            chars[..15].iter().collect(),
            chars[15..].iter().collect::<String>().trim().to_string(),
        );
    }

    if chars.len() >= 25 && digits(&chars[9..23]) {
        return (
            chars[9..23].iter().collect(),
            chars[23..].iter().collect::<String>().trim().to_string(),
        );
    }

    (String::new(), name.trim().to_string())
}

pub fn extract_counterpart(description: &str) -> (String, String) {
    tax_id_in_name(strip_time_prefix(description).trim())
}

// ---------------------------------------------------------------------------
// Statement parser
// ---------------------------------------------------------------------------

/// Parse a Banco do Brasil statement export. Only rows between the
/// "Saldo Anterior" and "S A L D O" balance markers are movements; external
/// ids are `YYYY-MM-DD-<n>` with `n` counting rows per date in file order,
/// which is stable across re-imports of the same statement window.
pub fn parse(path: &Path) -> Result<Vec<Incoming>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut rows = Vec::new();
    let mut found_header = false;
    let (mut idx_date, mut idx_hist, mut idx_detail, mut idx_value, mut idx_inf) = (0, 1, 2, 3, 4);
    let mut in_window = false;
    let mut per_date: HashMap<String, usize> = HashMap::new();

    for result in rdr.records() {
        let Ok(record) = result else { continue };

        if !found_header {
            if record.iter().any(|f| f.trim() == "Historico") {
                for (i, field) in record.iter().enumerate() {
                    match field.trim() {
                        "Data" => idx_date = i,
                        "Historico" => idx_hist = i,
                        "Detalhamento Hist." => idx_detail = i,
                        "Valor R$" => idx_value = i,
                        "Inf." => idx_inf = i,
                        _ => {}
                    }
                }
                found_header = true;
            }
            continue;
        }

        let txn_type = record.get(idx_hist).unwrap_or("").trim().to_string();
        if !in_window {
            if txn_type == "Saldo Anterior" {
                in_window = true;
            }
            continue;
        }
        if txn_type == "S A L D O" {
            break;
        }

        let Some(date) = record
            .get(idx_date)
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok())
        else {
            continue;
        };
        let Some(value_cents) = record.get(idx_value).and_then(parse_brl) else {
            continue;
        };
        let entry_type = if record.get(idx_inf).map(str::trim) == Some("C") {
            EntryType::Entrada
        } else {
            EntryType::Saida
        };

        let description = record.get(idx_detail).unwrap_or("").trim().to_string();
        let (tax_id, counterpart) = extract_counterpart(&description);

        let date_key = date.format("%Y-%m-%d").to_string();
        let seq = per_date.entry(date_key.clone()).or_insert(0);
        let external_id = format!("{date_key}-{seq}");
        *seq += 1;

        rows.push(Incoming {
            txn: Transaction {
                id: None,
                bank: BANK.to_string(),
                date,
                entry_type,
                txn_type,
                category: None,
                description,
                value_cents,
                counterpart: if counterpart.is_empty() { None } else { Some(counterpart) },
                validated: false,
                external_id,
            },
            tax_id,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_statement(dir: &Path, rows: &[(&str, &str, &str, &str, &str)]) -> std::path::PathBuf {
        let path = dir.join("extrato.csv");
        let mut content = String::from(
            "Extrato Conta Corrente\n\nData,Historico,\"Detalhamento Hist.\",Valor R$,Inf.\n\
             31/03/2023,Saldo Anterior,,\"1.000,00\",C\n",
        );
        for (date, hist, detail, value, inf) in rows {
            content.push_str(&format!("{date},{hist},\"{detail}\",\"{value}\",{inf}\n"));
        }
        content.push_str("30/04/2023,S A L D O,,\"1.000,00\",C\n");
        std::fs::write(&path, &content).unwrap();
        path
    }

    #[test]
    fn test_parse_keeps_only_movement_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(dir.path(), &[
            ("03/04/2023", "Pix - Enviado", "12345678901234 ACME LTDA", "150,00", "D"),
            ("04/04/2023", "Impostos", "DARF 2023", "42,10", "D"),
        ]);
        let rows = parse(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].txn.txn_type, "Pix - Enviado");
        assert_eq!(rows[0].txn.value_cents, 15_000);
        assert_eq!(rows[0].txn.entry_type, EntryType::Saida);
        assert_eq!(rows[1].txn.txn_type, "Impostos");
    }

    #[test]
    fn test_parse_external_ids_count_per_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(dir.path(), &[
            ("03/04/2023", "Pix - Enviado", "x", "10,00", "D"),
            ("03/04/2023", "Pix - Enviado", "y", "20,00", "D"),
            ("04/04/2023", "Pix - Enviado", "z", "30,00", "C"),
        ]);
        let rows = parse(&path).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.txn.external_id.as_str()).collect();
        assert_eq!(ids, vec!["2023-04-03-0", "2023-04-03-1", "2023-04-04-0"]);
    }

    #[test]
    fn test_parse_credit_marker_is_inflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(dir.path(), &[
            ("03/04/2023", "Pix - Recebido", "PAYER", "99,90", "C"),
        ]);
        let rows = parse(&path).unwrap();
        assert_eq!(rows[0].txn.entry_type, EntryType::Entrada);
        assert_eq!(rows[0].txn.value_cents, 9_990);
    }

    #[test]
    fn test_extract_counterpart_leading_tax_id() {
        let (tax_id, name) = extract_counterpart("123456789012345ACME LTDA");
        assert_eq!(tax_id, "123456789012345");
        assert_eq!(name, "ACME LTDA");
    }

    #[test]
    fn test_extract_counterpart_after_routing_prefix() {
        // 9 routing chars, then a 14-digit tax id, then the name
        let (tax_id, name) = extract_counterpart("PIXQR001212345678901234ACME SUPPLIES");
        assert_eq!(tax_id, "12345678901234");
        assert_eq!(name, "ACME SUPPLIES");
    }

    #[test]
    fn test_extract_counterpart_strips_timestamp_prefix() {
        let (tax_id, name) = extract_counterpart("03/04 15:30 123456789012345ACME LTDA");
        assert_eq!(tax_id, "123456789012345");
        assert_eq!(name, "ACME LTDA");
    }

    #[test]
    fn test_extract_counterpart_plain_name() {
        let (tax_id, name) = extract_counterpart("Pix Marketplace");
        assert_eq!(tax_id, "");
        assert_eq!(name, "Pix Marketplace");
    }
}
