//! The `pathfinder register`, `login`, and `me` commands.

use anyhow::Result;

use pathfinder_core::traits::{GuidanceApi, LoginRequest, RegisterRequest};

use super::{call, print_json, Settings};

pub async fn register(
    settings: &Settings,
    name: String,
    email: String,
    password: String,
) -> Result<()> {
    let client = settings.http_client()?;
    let request = RegisterRequest {
        name,
        email,
        password,
    };
    let response = call(settings, client.register(&request)).await?;
    tracing::info!(user_id = response.user.id, "registered");
    print_json(&response)
}

pub async fn login(settings: &Settings, email: String, password: String) -> Result<()> {
    let client = settings.http_client()?;
    let request = LoginRequest { email, password };
    let response = call(settings, client.login(&request)).await?;
    tracing::info!(user_id = response.user.id, "signed in");
    print_json(&response)
}

pub async fn me(settings: &Settings, token: Option<String>) -> Result<()> {
    let token = settings.require_token(token)?;
    let client = settings.http_client()?;
    let response = call(settings, client.me(&token)).await?;
    print_json(&response)
}
