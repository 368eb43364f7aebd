//! Fixed example statements for demo and offline use.
//!
//! These datasets are only returned when the caller explicitly asks for demo
//! mode. They never stand in for a failed live extraction.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::statement::{ProcessedStatement, StatementItem};

/// Available example datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackKind {
    /// Checking account statement with insurance, fee and purchase lines.
    #[default]
    BankStatement,
    /// Electricity bill.
    UtilityBill,
}

impl FallbackKind {
    /// All datasets, in display order.
    pub const ALL: [FallbackKind; 2] = [FallbackKind::BankStatement, FallbackKind::UtilityBill];

    /// Identifier used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankStatement => "bank-statement",
            Self::UtilityBill => "utility-bill",
        }
    }
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown dataset '{}' (expected bank-statement or utility-bill)", s))
    }
}

/// Return the example statement for `kind`.
pub fn fallback(kind: FallbackKind) -> ProcessedStatement {
    match kind {
        FallbackKind::BankStatement => bank_statement(),
        FallbackKind::UtilityBill => utility_bill(),
    }
}

fn item(id: &str, date: &str, description: &str, amount: Decimal, category: &str, explanation: &str) -> StatementItem {
    StatementItem {
        id: id.to_string(),
        date: date.to_string(),
        description: description.to_string(),
        amount,
        category: category.to_string(),
        explanation: explanation.to_string(),
    }
}

fn bank_statement() -> ProcessedStatement {
    ProcessedStatement {
        statement_date: "Março 2023".to_string(),
        total_amount: Decimal::new(12040, 2),
        items: vec![
            item(
                "1",
                "04/03",
                "Débito automático: Seguro pessoal",
                Decimal::new(2990, 2),
                "seguro",
                "Cobrança recorrente do seguro opcional contratado no banco. Você pode cancelar.",
            ),
            item(
                "2",
                "05/03",
                "Tarifa bancária mensal",
                Decimal::new(1200, 2),
                "tarifa",
                "Taxa de manutenção da sua conta corrente. Confirme com seu banco se você tem direito a isenção desta tarifa.",
            ),
            item(
                "3",
                "06/03",
                "Compra no Market ABC",
                Decimal::new(7850, 2),
                "compra",
                "Transação de débito feita no supermercado localizado em São Paulo.",
            ),
        ],
    }
}

fn utility_bill() -> ProcessedStatement {
    ProcessedStatement {
        statement_date: "Abril 2023".to_string(),
        total_amount: Decimal::new(16607, 2),
        items: vec![
            item(
                "1",
                "10/04",
                "Consumo de energia (215 kWh)",
                Decimal::new(14235, 2),
                "energia",
                "Valor da energia que você usou no mês, calculado pelos quilowatts-hora medidos no seu relógio.",
            ),
            item(
                "2",
                "10/04",
                "Adicional bandeira amarela",
                Decimal::new(812, 2),
                "tarifa",
                "Acréscimo cobrado quando a geração de energia fica mais cara. Reduzir o consumo diminui este valor.",
            ),
            item(
                "3",
                "10/04",
                "Contribuição de iluminação pública",
                Decimal::new(1560, 2),
                "imposto",
                "Taxa municipal que financia a iluminação das ruas. É obrigatória e vem junto com a conta de luz.",
            ),
        ],
    }
}
