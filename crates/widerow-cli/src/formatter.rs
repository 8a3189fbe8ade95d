//! Output formatting for command results.
//!
//! Supports table, JSON, and raw output formats.

use std::fmt;
use std::str::FromStr;

use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::json;

use widerow_driver::{Entry, OperationStats};

use crate::commands::Outcome;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output.
    Json,
    /// Raw output (name and value separated by a tab).
    Raw,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "raw" => Ok(OutputFormat::Raw),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Raw => write!(f, "raw"),
        }
    }
}

type StringEntry = Entry<String, String, String>;

/// Formats a command outcome according to the specified format.
pub fn format_outcome(outcome: &Outcome, format: OutputFormat) -> String {
    match outcome {
        Outcome::Entries(entries) => match format {
            OutputFormat::Table => format_table(entries),
            OutputFormat::Json => format_json(entries),
            OutputFormat::Raw => format_raw(entries),
        },
        Outcome::Applied { row_key, mutations } => match format {
            OutputFormat::Json => json!({ "row_key": row_key, "mutations": mutations }).to_string(),
            OutputFormat::Table | OutputFormat::Raw => {
                format!("OK ({mutations} mutation(s) on '{row_key}')")
            }
        },
    }
}

fn ttl_text(ttl: Option<u32>) -> String {
    ttl.map_or_else(|| "-".to_string(), |t| format!("{t}s"))
}

fn format_table(entries: &[StringEntry]) -> String {
    let mut table = Table::new();

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_header(vec!["name", "value", "ttl"]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.column.name),
            Cell::new(&entry.column.value),
            Cell::new(ttl_text(entry.column.ttl_seconds)),
        ]);
    }

    format!("{table}\n({} column(s))", entries.len())
}

fn format_json(entries: &[StringEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}

fn format_raw(entries: &[StringEntry]) -> String {
    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.column.name);
        output.push('\t');
        output.push_str(&entry.column.value);
        output.push('\n');
    }
    output
}

/// Formats per-operation timings, one line per operation.
pub fn format_stats(stats: &[(&'static str, OperationStats)]) -> String {
    stats
        .iter()
        .map(|(operation, s)| {
            format!(
                "{operation}: {} call(s), {} failed, mean {:.3}ms, max {:.3}ms",
                s.calls,
                s.failures,
                s.mean().as_secs_f64() * 1000.0,
                s.max.as_secs_f64() * 1000.0,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use widerow_driver::EntryColumn;

    fn make_entries() -> Vec<StringEntry> {
        vec![
            Entry::new("user-1", EntryColumn::new("email", "alice@example.com")),
            Entry::new("user-1", EntryColumn::new("session", "abc123").with_ttl(60)),
        ]
    }

    #[test]
    fn test_format_table() {
        let output = format_outcome(&Outcome::Entries(make_entries()), OutputFormat::Table);
        assert!(output.contains("name"));
        assert!(output.contains("alice@example.com"));
        assert!(output.contains("60s"));
        assert!(output.ends_with("(2 column(s))"));
    }

    #[test]
    fn test_format_json() {
        let output = format_outcome(&Outcome::Entries(make_entries()), OutputFormat::Json);
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["row_key"], "user-1");
        assert_eq!(parsed[0]["column"]["ttl_seconds"], serde_json::Value::Null);
        assert_eq!(parsed[1]["column"]["ttl_seconds"], 60);
    }

    #[test]
    fn test_format_raw() {
        let output = format_outcome(&Outcome::Entries(make_entries()), OutputFormat::Raw);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["email\talice@example.com", "session\tabc123"]);
    }

    #[test]
    fn test_format_applied() {
        let outcome = Outcome::Applied {
            row_key: "r".to_string(),
            mutations: 3,
        };
        assert_eq!(
            format_outcome(&outcome, OutputFormat::Raw),
            "OK (3 mutation(s) on 'r')"
        );
        let parsed: serde_json::Value =
            serde_json::from_str(&format_outcome(&outcome, OutputFormat::Json)).unwrap();
        assert_eq!(parsed["mutations"], 3);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Raw.to_string(), "raw");
    }

    #[test]
    fn test_format_stats() {
        let stats = OperationStats {
            calls: 2,
            failures: 1,
            slow: 0,
            total: Duration::from_millis(3),
            max: Duration::from_millis(2),
        };
        assert_eq!(
            format_stats(&[("update", stats)]),
            "update: 2 call(s), 1 failed, mean 1.500ms, max 2.000ms"
        );
    }
}
