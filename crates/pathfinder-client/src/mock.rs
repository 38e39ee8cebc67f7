//! Mock guidance API for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use pathfinder_core::error::ApiError;
use pathfinder_core::traits::{
    AnalyticsEvent, AuthResponse, EventResponse, GuidanceApi, LoginRequest, MeResponse,
    RecommendRequest, RecommendResponse, RecommendResult, RegisterRequest, ResumeUpload,
    UploadResponse, User,
};

/// An in-memory stand-in for the back end.
///
/// Accepts one account (`email`/`password`), issues a fixed token, returns a
/// configurable recommendation, and records every analytics event.
pub struct MockGuidanceApi {
    email: String,
    password: String,
    token: String,
    recommendation: String,
    /// Returned by `ai_recommend` instead of a response when set.
    recommend_error: Option<ApiError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last recommendation request received.
    last_recommend: Mutex<Option<RecommendRequest>>,
    events: Mutex<Vec<AnalyticsEvent>>,
    uploads: Mutex<Vec<String>>,
}

impl MockGuidanceApi {
    /// A mock with a single account and the given recommendation text.
    pub fn new(email: &str, password: &str, recommendation: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            token: "mock-token".to_string(),
            recommendation: recommendation.to_string(),
            recommend_error: None,
            call_count: AtomicU32::new(0),
            last_recommend: Mutex::new(None),
            events: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Make every `ai_recommend` call fail with `error`.
    pub fn failing_recommend(mut self, error: ApiError) -> Self {
        self.recommend_error = Some(error);
        self
    }

    /// The token the mock issues and accepts.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last recommendation request made to this mock.
    pub fn last_recommend(&self) -> Option<RecommendRequest> {
        self.last_recommend
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Names of analytics events received, in order.
    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    /// File names of uploaded resumes, in order.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn user(&self) -> User {
        User {
            id: 1,
            name: Some("Mock User".to_string()),
            email: self.email.clone(),
        }
    }

    fn check_token(&self, token: Option<&str>) -> Result<(), ApiError> {
        match token {
            Some(t) if t == self.token => Ok(()),
            _ => Err(ApiError::HttpStatus {
                status: 401,
                message: "missing or invalid token".to_string(),
            }),
        }
    }

    fn record_call(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl GuidanceApi for MockGuidanceApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record_call();
        if request.email.is_empty() || request.password.is_empty() {
            return Err(ApiError::HttpStatus {
                status: 400,
                message: "email and password required".to_string(),
            });
        }
        if request.email == self.email {
            return Err(ApiError::HttpStatus {
                status: 400,
                message: "email already exists".to_string(),
            });
        }
        Ok(AuthResponse {
            user: User {
                id: 2,
                name: Some(request.name.clone()),
                email: request.email.clone(),
            },
            token: self.token.clone(),
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record_call();
        if request.email != self.email || request.password != self.password {
            return Err(ApiError::HttpStatus {
                status: 401,
                message: "invalid credentials".to_string(),
            });
        }
        Ok(AuthResponse {
            user: self.user(),
            token: self.token.clone(),
        })
    }

    async fn me(&self, token: &str) -> Result<MeResponse, ApiError> {
        self.record_call();
        self.check_token(Some(token))?;
        Ok(MeResponse { user: self.user() })
    }

    async fn upload_resume(
        &self,
        upload: &ResumeUpload,
        _token: Option<&str>,
    ) -> Result<UploadResponse, ApiError> {
        self.record_call();
        let mut uploads = self.uploads.lock().unwrap_or_else(|e| e.into_inner());
        uploads.push(upload.file_name.clone());
        Ok(UploadResponse {
            upload_id: uploads.len() as i64,
            filename: upload.file_name.clone(),
        })
    }

    async fn ai_recommend(
        &self,
        request: &RecommendRequest,
        _token: Option<&str>,
    ) -> Result<RecommendResponse, ApiError> {
        self.record_call();
        *self
            .last_recommend
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        if let Some(err) = &self.recommend_error {
            return Err(err.clone());
        }
        Ok(RecommendResponse {
            session_id: i64::from(self.call_count()),
            result: RecommendResult {
                recommendation: serde_json::Value::String(self.recommendation.clone()),
                api_error: None,
                error: None,
            },
        })
    }

    async fn analytics_event(&self, event: &AnalyticsEvent) -> Result<EventResponse, ApiError> {
        self.record_call();
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event.clone());
        Ok(EventResponse {
            status: "ok".to_string(),
            event_id: events.len() as i64,
        })
    }
}
