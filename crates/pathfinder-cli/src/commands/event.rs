//! The `pathfinder event` command.

use anyhow::{Context, Result};

use pathfinder_core::traits::{AnalyticsEvent, GuidanceApi};

use super::{call, print_json, Settings};

pub async fn execute(settings: &Settings, name: String, metadata: Option<String>) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "event name must not be empty");

    let event = match metadata {
        Some(raw) => {
            let metadata: serde_json::Value =
                serde_json::from_str(&raw).context("--metadata must be valid JSON")?;
            anyhow::ensure!(metadata.is_object(), "--metadata must be a JSON object");
            AnalyticsEvent::with_metadata(name, metadata)
        }
        None => AnalyticsEvent::named(name),
    };

    let client = settings.http_client()?;
    let response = call(settings, client.analytics_event(&event)).await?;
    print_json(&response)
}
