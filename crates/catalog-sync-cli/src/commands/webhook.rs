use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use catalog_sync::{SyncReport, SyncServices, WebhookDispatcher};

/// Read a webhook body from `file`, or stdin when `None`.
pub fn read_body(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read webhook body from {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("failed to read webhook body from stdin")?;
            Ok(body)
        }
    }
}

/// Dispatch one webhook delivery and print the outcome.
pub async fn run(services: SyncServices, body: &str) -> Result<SyncReport> {
    let report = WebhookDispatcher::new(services).handle(body).await?;
    println!("{report}");
    Ok(report)
}
