use anyhow::Context;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

/// GET `<url>/health` and report the server's own verdict.
pub async fn handle(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));
    let response = reqwest::get(&endpoint)
        .await
        .with_context(|| format!("could not reach {}", endpoint))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(output_format, &format!("{} is healthy", url), body.get("data").cloned())
    } else {
        output_error(
            output_format,
            &format!("{} reported {}", url, status),
            body.get("code").and_then(Value::as_str),
        )?;
        anyhow::bail!("server unhealthy: {}", status)
    }
}
