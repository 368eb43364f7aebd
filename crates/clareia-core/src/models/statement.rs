//! Statement data models shared by the pipeline and its consumers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date token used when the service omitted an item date.
pub const DEFAULT_DATE: &str = "N/A";

/// Description used when the service omitted an item description.
pub const DEFAULT_DESCRIPTION: &str = "Item sem descrição";

/// Category bucket used when the service omitted an item category.
pub const DEFAULT_CATEGORY: &str = "outros";

/// Explanation used when the service omitted an item explanation.
pub const DEFAULT_EXPLANATION: &str = "Sem explicação disponível";

/// Category buckets the presentation layer has dedicated icons for.
pub const KNOWN_CATEGORIES: [&str; 3] = ["seguro", "tarifa", "compra"];

/// A processed statement: the pipeline's output.
///
/// Constructed once per uploaded file and never mutated by the pipeline
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedStatement {
    /// Free-text period label (e.g. "Março 2023").
    pub statement_date: String,

    /// Statement total. Either the service's value or the sum of item amounts.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_amount: Decimal,

    /// Line items in source order.
    pub items: Vec<StatementItem>,
}

/// One transaction line on a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementItem {
    /// Identifier, unique within its statement.
    pub id: String,

    /// Short local-format date token (e.g. "04/03"), passed through unparsed.
    pub date: String,

    /// Transaction label.
    pub description: String,

    /// Signed transaction amount.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,

    /// Free-text classification bucket.
    pub category: String,

    /// Plain-language clarification generated by the extraction service.
    pub explanation: String,
}

impl StatementItem {
    /// Human label for the category bucket.
    pub fn category_label(&self) -> &str {
        match self.category.as_str() {
            "seguro" => "Seguro",
            "tarifa" => "Tarifa bancária",
            "compra" => "Compra",
            other => other,
        }
    }

    /// Whether the category is one of the buckets with a dedicated icon.
    pub fn has_known_category(&self) -> bool {
        KNOWN_CATEGORIES.contains(&self.category.as_str())
    }

    /// Whether the item looks like a charge the customer could avoid.
    ///
    /// Fees are always flagged; other items only when the explanation
    /// points at cancellation or an exemption.
    pub fn flags_avoidable_fee(&self) -> bool {
        if self.category == "tarifa" {
            return true;
        }
        let explanation = self.explanation.to_lowercase();
        ["cancelar", "isenção", "isencao", "evitar", "evitável", "evitada"]
            .iter()
            .any(|hint| explanation.contains(hint))
    }
}

impl ProcessedStatement {
    /// Sum of all item amounts, or `None` if it overflows.
    pub fn items_total(&self) -> Option<Decimal> {
        checked_total(self.items.iter().map(|i| i.amount))
    }

    /// Items flagged as avoidable charges, in source order.
    pub fn avoidable_fees(&self) -> impl Iterator<Item = &StatementItem> {
        self.items.iter().filter(|i| i.flags_avoidable_fee())
    }

    /// Plain-text read-out of the statement, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.items.len() + 2);
        lines.push(format!("Extrato de {}", self.statement_date));
        lines.push(format!("Total: {}", format_brl(self.total_amount)));

        for item in &self.items {
            lines.push(format!(
                "{} - {}: {}. {}",
                item.date,
                item.description,
                format_brl(item.amount),
                item.explanation
            ));
        }

        lines
    }
}

/// Sum `amounts`, returning `None` on overflow.
pub fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

/// Format an amount in Brazilian style (R$ 1.234,56).
pub fn format_brl(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs().round_dp(2));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn item(category: &str, explanation: &str, amount: Decimal) -> StatementItem {
        StatementItem {
            id: "1".to_string(),
            date: "04/03".to_string(),
            description: "Item".to_string(),
            amount,
            category: category.to_string(),
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn test_serializes_camel_case_with_numeric_amounts() {
        let statement = ProcessedStatement {
            statement_date: "Março 2023".to_string(),
            total_amount: dec!(29.9),
            items: vec![item("seguro", "x", dec!(29.9))],
        };

        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["statementDate"], "Março 2023");
        assert_eq!(json["totalAmount"], serde_json::json!(29.9));
        assert_eq!(json["items"][0]["amount"], serde_json::json!(29.9));
        assert_eq!(json["items"][0]["category"], "seguro");
    }

    #[test]
    fn test_amounts_serialize_exactly() {
        let statement = ProcessedStatement {
            statement_date: "X".to_string(),
            total_amount: Decimal::from(9_007_199_254_740_993i64),
            items: vec![item("compra", "x", dec!(0.10))],
        };

        let json = serde_json::to_string(&statement).unwrap();
        assert!(json.contains("\"totalAmount\":9007199254740993,"));
        assert!(json.contains("\"amount\":0.10,"));
    }

    #[test]
    fn test_items_total_reports_overflow() {
        let statement = ProcessedStatement {
            statement_date: "X".to_string(),
            total_amount: Decimal::ZERO,
            items: vec![item("compra", "a", Decimal::MAX), item("compra", "b", dec!(1))],
        };
        assert_eq!(statement.items_total(), None);

        assert_eq!(checked_total([dec!(29.9), dec!(12), dec!(78.5)]), Some(dec!(120.4)));
        assert_eq!(checked_total([]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_avoidable_fee_flag() {
        assert!(item("tarifa", "Taxa de manutenção", dec!(12)).flags_avoidable_fee());
        assert!(item("seguro", "Seguro opcional. Você pode cancelar.", dec!(29.9)).flags_avoidable_fee());
        assert!(!item("compra", "Compra no supermercado", dec!(78.5)).flags_avoidable_fee());
    }

    #[test]
    fn test_category_label_passes_unknown_through() {
        assert_eq!(item("tarifa", "", dec!(1)).category_label(), "Tarifa bancária");
        assert_eq!(item("energia", "", dec!(1)).category_label(), "energia");
        assert!(!item("energia", "", dec!(1)).has_known_category());
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(format_brl(dec!(29.9)), "R$ 29,90");
        assert_eq!(format_brl(dec!(-12)), "-R$ 12,00");
        assert_eq!(format_brl(dec!(1234567.891)), "R$ 1.234.567,89");
    }

    #[test]
    fn test_summary_lines() {
        let statement = ProcessedStatement {
            statement_date: "Março 2023".to_string(),
            total_amount: dec!(12),
            items: vec![item("tarifa", "Taxa mensal", dec!(12))],
        };

        assert_eq!(
            statement.summary_lines(),
            vec![
                "Extrato de Março 2023".to_string(),
                "Total: R$ 12,00".to_string(),
                "04/03 - Item: R$ 12,00. Taxa mensal".to_string(),
            ]
        );
    }
}
