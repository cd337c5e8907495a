use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Entrada,
    Saida,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Saida => "saida",
        }
    }

}

/// Fixed bookkeeping taxonomy. Company defaults are stored verbatim and may
/// name any of these or a custom label.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Entrada,
    Bancos,
    Impostos,
    Fornecedores,
    Ignorar,
    Transferencia,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Bancos => "bancos",
            Self::Impostos => "impostos",
            Self::Fornecedores => "fornecedores",
            Self::Ignorar => "ignorar",
            Self::Transferencia => "transferencia",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub bank: String,
    pub date: NaiveDate,
    pub entry_type: EntryType,
    /// Source-specific transaction-type code, e.g. "pix" or "Impostos".
    pub txn_type: String,
    pub category: Option<String>,
    pub description: String,
    pub value_cents: i64,
    pub counterpart: Option<String>,
    pub validated: bool,
    /// Unique within the bank's namespace; the dedup key across re-imports.
    pub external_id: String,
}

/// A normalized transaction plus the raw counterparty tax id the source
/// extracted for it (may be empty).
#[derive(Debug, Clone)]
pub struct Incoming {
    pub txn: Transaction,
    pub tax_id: String,
}

#[derive(Debug, Clone)]
pub struct Company {
    pub name: String,
    pub tax_id: String,
    pub default_category: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Invoice {
    pub access_code: String,
    pub issuer: String,
    pub issue_date: NaiveDate,
    pub net_cents: i64,
    pub gross_cents: i64,
    pub validated: bool,
}
