//! Validation and normalization of the located JSON payload.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::statement::{
    DEFAULT_CATEGORY, DEFAULT_DATE, DEFAULT_DESCRIPTION, DEFAULT_EXPLANATION, ProcessedStatement,
    StatementItem, checked_total,
};

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Parse `json` and normalize it into a [`ProcessedStatement`].
pub fn normalize(json: &str) -> Result<ProcessedStatement> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ExtractionError::JsonParse(e.to_string()))?;
    normalize_value(&value)
}

/// Normalize an already parsed payload.
///
/// Only the top level is validated: `statementDate` must be a string and
/// `items` an array. Item fields are defaulted one by one and never cause an
/// error. `totalAmount` is kept when it is a number and recomputed from the
/// items otherwise.
pub fn normalize_value(value: &Value) -> Result<ProcessedStatement> {
    let root = value
        .as_object()
        .ok_or_else(|| schema_error("payload is not a JSON object"))?;

    let statement_date = match root.get("statementDate") {
        None | Some(Value::Null) => return Err(schema_error("missing statementDate")),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(schema_error("statementDate must be a string")),
    };

    let raw_items = match root.get("items") {
        None | Some(Value::Null) => return Err(schema_error("missing items")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(schema_error("items must be an array")),
    };

    let empty = Map::new();
    let mut defaulted_fields = 0usize;

    let items: Vec<StatementItem> = raw_items
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let fields = raw.as_object().unwrap_or(&empty);
            let (item, defaulted) = normalize_item(index, fields);
            defaulted_fields += defaulted;
            item
        })
        .collect();

    warn_on_duplicate_ids(&items);

    let total_amount = match root.get("totalAmount").and_then(as_number).and_then(decimal_from_number) {
        Some(total) => total,
        None => {
            let sum = checked_total(items.iter().map(|i| i.amount))
                .ok_or_else(|| schema_error("item amounts overflow the total"))?;
            debug!("totalAmount absent or not numeric, recomputed as {}", sum);
            sum
        }
    };

    debug!(
        "Normalized statement with {} items ({} fields defaulted)",
        items.len(),
        defaulted_fields
    );

    Ok(ProcessedStatement {
        statement_date,
        total_amount,
        items,
    })
}

/// Build a complete item, returning it with the number of defaulted fields.
fn normalize_item(index: usize, fields: &Map<String, Value>) -> (StatementItem, usize) {
    let mut defaulted = 0;
    let mut text = |key: &str, default: String| {
        text_field(fields, key).unwrap_or_else(|| {
            defaulted += 1;
            default
        })
    };

    let id = text("id", (index + 1).to_string());
    let date = text("date", DEFAULT_DATE.to_string());
    let description = text("description", DEFAULT_DESCRIPTION.to_string());
    let category = text("category", DEFAULT_CATEGORY.to_string());
    let explanation = text("explanation", DEFAULT_EXPLANATION.to_string());

    let amount = match fields.get("amount").and_then(as_number).and_then(decimal_from_number) {
        Some(amount) => amount,
        None => {
            defaulted += 1;
            Decimal::ZERO
        }
    };

    let item = StatementItem {
        id,
        date,
        description,
        amount,
        category,
        explanation,
    };

    (item, defaulted)
}

/// A usable text value: a non-blank string, or a number rendered as text.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<&Number> {
    match value {
        Value::Number(n) => Some(n),
        _ => None,
    }
}

/// Convert a JSON number to a decimal without binary floating-point noise.
///
/// Numbers outside the decimal range are treated as not numeric.
fn decimal_from_number(number: &Number) -> Option<Decimal> {
    if let Some(i) = number.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Some(Decimal::from(u));
    }

    let repr = number.to_string();
    Decimal::from_str(&repr)
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}

fn warn_on_duplicate_ids(items: &[StatementItem]) {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id.as_str()) {
            warn!("Duplicate item id {:?} in service payload", item.id);
        }
    }
}

fn schema_error(reason: &str) -> ExtractionError {
    ExtractionError::SchemaValidation(reason.to_string())
}
