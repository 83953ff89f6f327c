use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Prints a command outcome. JSON goes to stdout; text failures go to stderr.
fn report(output_format: OutputFormat, ok: bool, message: &str, extra: Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut document = json!({ "success": ok, "message": message });
            if let (Value::Object(target), Value::Object(fields)) = (&mut document, extra) {
                target.extend(fields);
            }
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Text if ok => {
            println!("✓ {}", message);
            if let Value::Object(fields) = extra.get("data").cloned().unwrap_or(Value::Null) {
                for (key, value) in fields {
                    println!("  {}: {}", key, value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()));
                }
            }
        }
        OutputFormat::Text => eprintln!("Error: {}", message),
    }
    Ok(())
}

pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    let extra = data.map(|d| json!({ "data": d })).unwrap_or(Value::Null);
    report(output_format, true, message, extra)
}

pub fn output_error(output_format: OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    let extra = error_code.map(|code| json!({ "error_code": code })).unwrap_or(Value::Null);
    report(output_format, false, message, extra)
}
