//! Subcommand implementations.

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use pathfinder_client::config::{load_config_from, PathfinderConfig, BASE_URL_ENV};
use pathfinder_client::{ClientConfig, HttpGuidanceClient};
use pathfinder_core::error::ApiError;
use pathfinder_core::submit::{with_deadline, CancelToken};

pub mod account;
pub mod event;
pub mod init;
pub mod recommend;
pub mod recommendations;
pub mod take;
pub mod upload;
pub mod validate;

/// Configuration resolved once at startup.
pub struct Settings {
    pub config: PathfinderConfig,
    pub client: ClientConfig,
}

impl Settings {
    pub fn load(config_path: Option<&Path>, api_base: Option<&str>) -> Result<Self> {
        let config = load_config_from(config_path)?;
        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        let client = config.client_config(api_base, env_base_url.as_deref());
        tracing::debug!(base_url = %client.base_url, "resolved back end");
        Ok(Self { config, client })
    }

    pub fn http_client(&self) -> Result<HttpGuidanceClient> {
        HttpGuidanceClient::new(&self.client)
    }

    /// `explicit`, else the configured token.
    pub fn token(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .filter(|t| !t.is_empty())
            .or_else(|| self.client.token.clone())
    }

    pub fn require_token(&self, explicit: Option<String>) -> Result<String> {
        self.token(explicit).context(
            "no token given; pass --token, set PATHFINDER_TOKEN, or add `token` under [api]",
        )
    }
}

/// A token cancelled by the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancelToken {
    let token = CancelToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling request");
            handle.cancel();
        }
    });
    token
}

/// Run one back end call under the configured timeout, cancellable by Ctrl-C.
pub async fn call<T, F>(settings: &Settings, request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let cancel = cancel_on_ctrl_c();
    with_deadline(request, settings.client.timeout, Some(&cancel)).await
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
