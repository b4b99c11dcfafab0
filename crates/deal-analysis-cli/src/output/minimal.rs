use serde_json::Value;

use super::{format_scalar, result_body};

/// Headline figure per result shape, most decisive first.
const PRIORITY_KEYS: [&str; 6] = [
    "mao",
    "monthly_cash_flow",
    "coc_return",
    "cap_rate",
    "noi",
    "monthly_payment",
];

/// Print just the headline number of the output.
///
/// Flips answer with the maximum allowable offer, rentals with monthly cash
/// flow, amortization with the monthly payment. Falls back to the first
/// field of the result body.
pub fn print_minimal(value: &Value) {
    if let Some(Value::Array(results)) = value.get("results") {
        for row in results {
            let strategy = row.get("strategy").map(|s| format_scalar(s, "")).unwrap_or_default();
            let headline = PRIORITY_KEYS
                .iter()
                .filter_map(|k| row.get(*k))
                .find(|v| !v.is_null())
                .map(|v| format_scalar(v, "null"))
                .unwrap_or_else(|| "error".to_string());
            println!("{}: {}", strategy, headline);
        }
        return;
    }

    let result_obj = match value {
        Value::Object(map) => result_body(map),
        other => other.clone(),
    };

    if let Value::Object(map) = &result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val, "null"));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val, "null"));
            return;
        }
    }

    println!("{}", format_scalar(&result_obj, "null"));
}
