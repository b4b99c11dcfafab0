pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Keys that describe an analysis rather than report a metric.
pub const ENVELOPE_KEYS: [&str; 4] = ["strategy", "warnings", "methodology", "metadata"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The metric fields of an output: the nested `result` of a computation
/// envelope, or the top-level object of a flat analysis response minus its
/// envelope keys.
pub fn result_body(map: &Map<String, Value>) -> Value {
    if let Some(result) = map.get("result") {
        return result.clone();
    }
    Value::Object(
        map.iter()
            .filter(|(k, _)| !ENVELOPE_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

/// Flatten a result object into `(field, value)` rows.
///
/// Nested objects become dotted keys (`expense_breakdown.total`,
/// `refinance.net_proceeds`). Labelled line items such as
/// `expense_breakdown.lines` become one row per label.
pub fn flatten_fields(value: &Value) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into("", value, &mut rows);
    rows
}

fn flatten_into(prefix: &str, value: &Value, rows: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_into(&join_key(prefix, key), val, rows);
            }
        }
        Value::Array(items) if items.iter().all(is_labelled_line) && !items.is_empty() => {
            for item in items {
                let label = item.get("label").and_then(Value::as_str).unwrap_or_default();
                let amount = item
                    .as_object()
                    .and_then(|m| m.iter().find(|(k, _)| k.as_str() != "label"))
                    .map(|(_, v)| v.clone())
                    .unwrap_or(Value::Null);
                rows.push((join_key(prefix, label), amount));
            }
        }
        other => rows.push((prefix.to_string(), other.clone())),
    }
}

fn is_labelled_line(value: &Value) -> bool {
    value
        .as_object()
        .map(|m| m.len() == 2 && m.get("label").map(Value::is_string).unwrap_or(false))
        .unwrap_or(false)
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Render a scalar for text output.
pub fn format_scalar(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| format_scalar(v, null))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_breakdown() {
        let result = json!({
            "noi": 13440.0,
            "expense_breakdown": {
                "total": 18360.0,
                "lines": [
                    { "label": "yearly_taxes", "annual_amount": 2400.0 },
                    { "label": "vacancy", "annual_amount": 1590.0 }
                ]
            }
        });
        let rows = flatten_fields(&result);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();

        assert!(keys.contains(&"noi"));
        assert!(keys.contains(&"expense_breakdown.total"));
        assert!(keys.contains(&"expense_breakdown.lines.vacancy"));
        let vacancy = rows
            .iter()
            .find(|(k, _)| k == "expense_breakdown.lines.vacancy")
            .map(|(_, v)| v.clone());
        assert_eq!(vacancy, Some(json!(1590.0)));
    }

    #[test]
    fn test_plain_arrays_stay_whole() {
        let rows = flatten_fields(&json!({ "warnings": ["a", "b"] }));
        assert_eq!(rows, vec![("warnings".to_string(), json!(["a", "b"]))]);
    }

    #[test]
    fn test_result_body_of_flat_response() {
        let response = json!({
            "strategy": "buy_and_rent",
            "noi": 13440.0,
            "cap_rate": 4.5,
            "warnings": ["DSCR below 1.20"]
        });
        let body = result_body(response.as_object().unwrap());
        assert_eq!(body, json!({ "noi": 13440.0, "cap_rate": 4.5 }));
    }

    #[test]
    fn test_result_body_of_envelope() {
        let envelope = json!({
            "result": { "monthly_payment": 1516.96 },
            "methodology": "Fixed-rate level payment amortization"
        });
        let body = result_body(envelope.as_object().unwrap());
        assert_eq!(body, json!({ "monthly_payment": 1516.96 }));
    }

    #[test]
    fn test_format_scalar_null() {
        assert_eq!(format_scalar(&Value::Null, ""), "");
        assert_eq!(format_scalar(&Value::Null, "null"), "null");
        assert_eq!(format_scalar(&json!(4.5), ""), "4.5");
    }
}
