use crate::models::Category;

/// Per-code ingestion policy. Codes absent from the table require
/// counterparty resolution on outflow and have no fallback category.
pub struct TypeRule {
    pub code: &'static str,
    /// Whether outflows of this type go through the identity resolver.
    pub counterparty: bool,
    /// Category assigned when no company default applies.
    pub fallback: Option<Category>,
}

pub const TYPE_RULES: &[TypeRule] = &[
    // Banco do Brasil statement codes
    TypeRule { code: "Impostos", counterparty: false, fallback: Some(Category::Impostos) },
    TypeRule { code: "BACEN-Res.An.C\u{e9}d.Encam.", counterparty: false, fallback: Some(Category::Bancos) },
    TypeRule { code: "Tarifa Pacote de Servi\u{e7}os", counterparty: false, fallback: Some(Category::Bancos) },
    TypeRule { code: "Tar DOC/TED Eletr\u{f4}nico", counterparty: false, fallback: Some(Category::Bancos) },
    TypeRule { code: "Pix - Rejeitado", counterparty: false, fallback: Some(Category::Ignorar) },
    TypeRule { code: "Dep\u{f3}sito Online", counterparty: false, fallback: Some(Category::Ignorar) },
    // Banco Inter feed codes
    TypeRule { code: "imposto", counterparty: false, fallback: Some(Category::Impostos) },
    TypeRule { code: "tarifa", counterparty: false, fallback: Some(Category::Bancos) },
    TypeRule { code: "investimento", counterparty: false, fallback: Some(Category::Ignorar) },
    TypeRule { code: "juros", counterparty: false, fallback: None },
    TypeRule { code: "saque", counterparty: false, fallback: None },
];

/// Payment-aggregator counterpart labels whose invoices never share the
/// counterparty's identity (lowercase).
pub const MARKETPLACE_LABELS: &[&str] = &["pix marketplace", "magalu pagamentos ltda"];

pub fn rule_for(code: &str) -> Option<&'static TypeRule> {
    TYPE_RULES.iter().find(|r| r.code == code)
}

pub fn requires_counterparty(code: &str) -> bool {
    rule_for(code).map_or(true, |r| r.counterparty)
}
