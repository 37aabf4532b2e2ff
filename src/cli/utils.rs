use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::{FormEffect, Notice};

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `✓ message` on stdout, or `{ success: true, message, data? }` in JSON mode
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Text => {
            println!("✓ {}", message);
            Ok(())
        }
        OutputFormat::Json => {
            let mut body = json!({ "success": true, "message": message });
            if let Some(data) = data {
                body["data"] = data;
            }
            print_json(&body)
        }
    }
}

/// Text mode writes to stderr
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
            Ok(())
        }
        OutputFormat::Json => print_json(&json!({ "success": false, "error": message })),
    }
}

/// Output a list of records, one `id  label` line each in text mode
pub fn output_collection<T, F>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    line: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            let mut body = serde_json::Map::new();
            body.insert(collection_name.to_string(), serde_json::to_value(items)?);
            print_json(&Value::Object(body))?;
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No {} found", collection_name);
            }
            for item in items {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}

/// Render the notices a form produced; navigation and refresh only matter to a UI
pub fn output_effects(output_format: &OutputFormat, effects: Vec<FormEffect>, data: Option<Value>) -> anyhow::Result<()> {
    let mut data = data;
    for effect in effects {
        match effect {
            FormEffect::Notify(Notice::Success(message)) => output_success(output_format, &message, data.take())?,
            FormEffect::Notify(Notice::Error(message)) => output_error(output_format, &message)?,
            FormEffect::Navigate(path) => tracing::debug!("navigate to {}", path),
            FormEffect::Refresh => tracing::debug!("refresh"),
        }
    }
    Ok(())
}
