//! reqwest implementation of `GuidanceApi`.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

use pathfinder_core::traits::{
    AnalyticsEvent, AuthResponse, EventResponse, GuidanceApi, LoginRequest, MeResponse,
    RecommendRequest, RecommendResponse, RegisterRequest, ResumeUpload, UploadResponse,
};

use crate::config::ClientConfig;
use crate::error::{from_status, from_transport, ApiError};

/// Longest body excerpt quoted in decode errors.
const BODY_EXCERPT_CHARS: usize = 200;

/// HTTP client for the Pathfinder back end.
pub struct HttpGuidanceClient {
    base_url: String,
    timeout_secs: u64,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpGuidanceClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pathfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout.as_secs(),
            token: config.token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// An explicit token wins over the configured one.
    fn bearer<'a>(&'a self, token: Option<&'a str>) -> Option<&'a str> {
        token.or(self.token.as_deref())
    }

    /// Send a request and decode a successful JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let start = Instant::now();
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| from_transport(e, self.timeout_secs))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| from_transport(e, self.timeout_secs))?;

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "response received"
        );

        if !status.is_success() {
            return Err(from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
            ApiError::Decode(format!("{e} (body: {excerpt})"))
        })
    }
}

#[async_trait]
impl GuidanceApi for HttpGuidanceClient {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url("/api/auth/register")).json(request);
        self.send(req, None).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url("/api/auth/login")).json(request);
        self.send(req, None).await
    }

    #[instrument(skip_all)]
    async fn me(&self, token: &str) -> Result<MeResponse, ApiError> {
        let req = self.client.get(self.url("/api/auth/me"));
        self.send(req, Some(token)).await
    }

    #[instrument(skip_all, fields(file = %upload.file_name, bytes = upload.bytes.len()))]
    async fn upload_resume(
        &self,
        upload: &ResumeUpload,
        token: Option<&str>,
    ) -> Result<UploadResponse, ApiError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone());
        let part = match &upload.content_type {
            Some(content_type) => part
                .mime_str(content_type)
                .map_err(|e| from_transport(e, self.timeout_secs))?,
            None => part,
        };
        let form = reqwest::multipart::Form::new().part("file", part);

        let req = self
            .client
            .post(self.url("/api/upload_resume"))
            .multipart(form);
        self.send(req, self.bearer(token)).await
    }

    #[instrument(skip_all, fields(answers = request.profile.answers.len()))]
    async fn ai_recommend(
        &self,
        request: &RecommendRequest,
        token: Option<&str>,
    ) -> Result<RecommendResponse, ApiError> {
        let req = self.client.post(self.url("/api/ai/recommend")).json(request);
        self.send(req, self.bearer(token)).await
    }

    #[instrument(skip_all, fields(event = %event.name))]
    async fn analytics_event(&self, event: &AnalyticsEvent) -> Result<EventResponse, ApiError> {
        let req = self.client.post(self.url("/api/analytics/event")).json(event);
        self.send(req, None).await
    }
}
