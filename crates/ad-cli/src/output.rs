//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Outputs rows in the specified format.
pub fn output<T: Tabled + Serialize>(data: &[T], format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Outputs a single value. Tables render it as key/value rows.
pub fn output_single<T: Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            let rows = key_value_rows(&serde_json::to_value(item)?);
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// One attribute row.
#[derive(Debug, Tabled)]
struct KeyValue {
    #[tabled(rename = "Attribute")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Flattens a JSON object into rows; arrays join with newlines, nulls are skipped.
fn key_value_rows(value: &serde_json::Value) -> Vec<KeyValue> {
    let serde_json::Value::Object(map) = value else {
        return vec![KeyValue {
            key: String::new(),
            value: value.to_string(),
        }];
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(key, v)| KeyValue {
            key: key.clone(),
            value: match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|i| i.as_str().map_or_else(|| i.to_string(), String::from))
                    .collect::<Vec<_>>()
                    .join("\n"),
                other => other.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_from_object() {
        let rows = key_value_rows(&json!({
            "name": "John Doe",
            "groups": ["Admins", "Staff"],
            "email": null,
            "disabled": false,
        }));
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert!(!keys.contains(&"email"));
        let groups = rows.iter().find(|r| r.key == "groups").unwrap();
        assert_eq!(groups.value, "Admins\nStaff");
        let disabled = rows.iter().find(|r| r.key == "disabled").unwrap();
        assert_eq!(disabled.value, "false");
    }
}
