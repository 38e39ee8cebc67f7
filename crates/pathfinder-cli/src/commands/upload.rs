//! The `pathfinder upload-resume` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use pathfinder_core::traits::{GuidanceApi, ResumeUpload};

use super::{call, print_json, Settings};

pub async fn execute(settings: &Settings, file: PathBuf, token: Option<String>) -> Result<()> {
    let bytes = std::fs::read(&file)
        .with_context(|| format!("failed to read resume: {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("not a file path: {}", file.display()))?;

    let upload = ResumeUpload {
        content_type: content_type_for(&file_name).map(str::to_string),
        file_name,
        bytes,
    };

    let client = settings.http_client()?;
    let token = settings.token(token);
    let response = call(settings, client.upload_resume(&upload, token.as_deref())).await?;
    tracing::info!(upload_id = response.upload_id, "resume uploaded");
    print_json(&response)
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
