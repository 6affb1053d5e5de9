//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cli::args::{OutputFormat, SyncArgs};
use crate::error::Result;

/// Result structure for a bulk payload written to a file.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkResult {
    pub records_file: String,
    pub output: String,
    pub records_seen: usize,
    pub documents_indexed: usize,
    pub records_skipped: usize,
    pub batches: usize,
    pub duration_ms: u64,
}

/// Resolved connection hosts.
#[derive(Debug, Serialize, Deserialize)]
pub struct HostsResult {
    pub hosts: Vec<String>,
    pub transport: Map<String, Value>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SyncArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SyncArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(&val);
                println!("{key}: {formatted_val}");
            }
        }
        other => println!("{}", format_value(&other)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SyncArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(obj) if obj.is_empty() => "{}".to_string(),
        Value::Object(obj) => {
            let formatted_values = obj
                .iter()
                .map(|(k, v)| format!("{k}={}", format_value(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{formatted_values}}}")
        }
        Value::Null => "null".to_string(),
    }
}
