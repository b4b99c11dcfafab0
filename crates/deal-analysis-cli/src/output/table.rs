use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_scalar, result_body};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(results)) = map.get("results") {
                print_array_table(results);
            } else if map.contains_key("result") || map.contains_key("strategy") {
                print_result_table(&result_body(map), map);
            } else {
                print_field_table(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Some(Value::String(strategy)) = envelope.get("strategy") {
        println!("Strategy: {}", strategy);
    }

    print_field_table(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_fields(value) {
        builder.push_record([key, format_scalar(&val, "n/a")]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_scalar(item, "n/a"));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| format_scalar(v, "n/a"))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
