//! The guidance back end API and its wire types.
//!
//! `GuidanceApi` is implemented by `pathfinder-client` over HTTP and by a
//! mock for tests. Every method maps to exactly one back end endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Guidance API trait
// ---------------------------------------------------------------------------

/// Operations offered by the Pathfinder back end.
#[async_trait]
pub trait GuidanceApi: Send + Sync {
    /// Create an account and sign in.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// Exchange credentials for a token.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// Fetch the account behind a token.
    async fn me(&self, token: &str) -> Result<MeResponse, ApiError>;

    /// Upload a resume document.
    async fn upload_resume(
        &self,
        upload: &ResumeUpload,
        token: Option<&str>,
    ) -> Result<UploadResponse, ApiError>;

    /// Ask for a career recommendation from an assessment profile.
    async fn ai_recommend(
        &self,
        request: &RecommendRequest,
        token: Option<&str>,
    ) -> Result<RecommendResponse, ApiError>;

    /// Record an analytics event.
    async fn analytics_event(&self, event: &AnalyticsEvent) -> Result<EventResponse, ApiError>;
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An account as returned by the back end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// A resume file to upload.
#[derive(Clone, PartialEq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ResumeUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub upload_id: i64,
    pub filename: String,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// One answered question as sent to the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnswer {
    pub section_id: String,
    pub question_id: u32,
    pub question: String,
    pub answer: String,
}

/// The respondent's assessment answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentProfile {
    #[serde(default)]
    pub quiz_id: String,
    #[serde(default)]
    pub answers: Vec<ProfileAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub profile: AssessmentProfile,
    #[serde(default)]
    pub goals: String,
}

/// The recommender's result.
///
/// `recommendation` is free-form: plain text from the fallback path, or
/// whatever structured output the upstream model returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResult {
    pub recommendation: serde_json::Value,
    /// Set when the upstream model call failed and a fallback was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecommendResult {
    /// The recommendation as display text.
    pub fn text(&self) -> String {
        match &self.recommendation {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub session_id: i64,
    pub result: RecommendResult,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl AnalyticsEvent {
    /// An event with no metadata.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: empty_object(),
        }
    }

    pub fn with_metadata(name: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    pub status: String,
    pub event_id: i64,
}
