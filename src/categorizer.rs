use crate::error::{FiscalError, Result};
use crate::models::{Category, Company, EntryType};
use crate::rules;

/// Rule cascade: inflows are always "entrada"; outflows take the resolved
/// company's default when it has one, then the fixed per-code fallback.
/// An outflow covered by neither is a batch-aborting error, never a silent
/// default.
pub fn categorize(
    entry_type: EntryType,
    txn_type: &str,
    company: Option<&Company>,
) -> Result<String> {
    if entry_type == EntryType::Entrada {
        return Ok(Category::Entrada.as_str().to_string());
    }

    if let Some(company) = company {
        if let Some(default) = company.default_category.as_deref() {
            if !default.is_empty() {
                return Ok(default.to_string());
            }
        }
    }

    rules::rule_for(txn_type)
        .and_then(|rule| rule.fallback)
        .map(|cat| cat.as_str().to_string())
        .ok_or_else(|| FiscalError::Uncategorizable(txn_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(default: Option<&str>) -> Company {
        Company {
            name: "Acme".to_string(),
            tax_id: "999".to_string(),
            default_category: default.map(str::to_string),
        }
    }

    #[test]
    fn test_inflow_is_always_entrada() {
        assert_eq!(categorize(EntryType::Entrada, "pix", None).unwrap(), "entrada");
        assert_eq!(
            categorize(EntryType::Entrada, "anything", Some(&company(Some("fornecedores")))).unwrap(),
            "entrada"
        );
    }

    #[test]
    fn test_company_default_wins_on_outflow() {
        let c = company(Some("fornecedores"));
        assert_eq!(categorize(EntryType::Saida, "pix", Some(&c)).unwrap(), "fornecedores");
    }

    #[test]
    fn test_empty_company_default_falls_through_to_tables() {
        let c = company(Some(""));
        assert_eq!(categorize(EntryType::Saida, "tarifa", Some(&c)).unwrap(), "bancos");
    }

    #[test]
    fn test_fixed_tables_cover_fee_tax_ignore() {
        assert_eq!(categorize(EntryType::Saida, "Impostos", None).unwrap(), "impostos");
        assert_eq!(categorize(EntryType::Saida, "Tarifa Pacote de Servi\u{e7}os", None).unwrap(), "bancos");
        assert_eq!(categorize(EntryType::Saida, "Pix - Rejeitado", None).unwrap(), "ignorar");
    }

    #[test]
    fn test_every_fallback_code_is_total_for_both_directions() {
        for rule in crate::rules::TYPE_RULES {
            assert_eq!(categorize(EntryType::Entrada, rule.code, None).unwrap(), "entrada");
            if rule.fallback.is_some() {
                categorize(EntryType::Saida, rule.code, None).unwrap();
            }
        }
    }

    #[test]
    fn test_uncovered_outflow_raises() {
        let err = categorize(EntryType::Saida, "pix", None).unwrap_err();
        assert!(err.to_string().contains("pix"));
    }

    #[test]
    fn test_covered_code_without_fallback_raises_without_company() {
        assert!(categorize(EntryType::Saida, "saque", None).is_err());
        let c = company(Some("transferencia"));
        assert_eq!(categorize(EntryType::Saida, "saque", Some(&c)).unwrap(), "transferencia");
    }
}
