use serde_json::Value;
use std::io;

use super::{flatten_fields, format_scalar, result_body};

/// Write output as CSV to stdout.
///
/// A single analysis becomes `field,value` rows; comparisons and schedules
/// become one row per entry.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(results)) = map.get("results") {
                write_array_csv(&mut wtr, results);
            } else {
                let body = result_body(map);
                let _ = wtr.write_record(["field", "value"]);
                if let Some(Value::String(strategy)) = map.get("strategy") {
                    let _ = wtr.write_record(["strategy", strategy.as_str()]);
                }
                for (key, val) in flatten_fields(&body) {
                    let _ = wtr.write_record([key.as_str(), &format_scalar(&val, "")]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_scalar(value, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item, "")]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(|v| format_scalar(v, "")).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
