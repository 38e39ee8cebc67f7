//! Assessment submission.
//!
//! Turns a completed tracker into a recommendation request and sends it
//! through a [`GuidanceApi`], bounded by a timeout and a cancellation token,
//! retrying transient failures with exponential backoff.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::{ApiError, SubmitError};
use crate::tracker::QuizTracker;
use crate::traits::{
    AnalyticsEvent, AssessmentProfile, GuidanceApi, ProfileAnswer, RecommendRequest,
    RecommendResponse,
};

/// Name of the analytics event emitted after a successful submission.
pub const SUBMITTED_EVENT: &str = "assessment_submitted";

/// A cloneable handle for cancelling in-flight requests.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Cancel every request observing this token. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so `changed` cannot fail here.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Run a request under a deadline, aborting early if `cancel` fires.
pub async fn with_deadline<T, F>(
    request: F,
    timeout: Duration,
    cancel: Option<&CancelToken>,
) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let bounded = async {
        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(timeout.as_secs())),
        }
    };

    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = bounded => result,
            }
        }
        None => bounded.await,
    }
}

/// How a submission is sent.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Free-text goals sent alongside the answers.
    pub goals: String,
    /// Bearer token, if signed in.
    pub token: Option<String>,
    /// Deadline for each attempt.
    pub timeout: Duration,
    /// Retries on transient failures (network, timeout, 5xx).
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time.
    pub retry_delay: Duration,
    pub cancel: Option<CancelToken>,
    /// Emit an analytics event after a successful submission.
    pub emit_analytics: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            goals: String::new(),
            token: None,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
            cancel: None,
            emit_analytics: true,
        }
    }
}

/// A successfully submitted assessment.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub quiz_id: String,
    pub submitted_at: DateTime<Utc>,
    pub attempts: u32,
    pub response: RecommendResponse,
}

/// Collect the tracker's answers, in quiz order, into a profile.
pub fn build_profile(tracker: &QuizTracker) -> AssessmentProfile {
    let quiz = tracker.quiz();
    let answers = quiz
        .sections
        .iter()
        .flat_map(|section| {
            section.questions.iter().filter_map(move |q| {
                tracker.answer_for(q.id).map(|answer| ProfileAnswer {
                    section_id: section.id.clone(),
                    question_id: q.id,
                    question: q.text.clone(),
                    answer: answer.to_string(),
                })
            })
        })
        .collect();

    AssessmentProfile {
        quiz_id: quiz.id.clone(),
        answers,
    }
}

/// Submit a completed assessment for recommendations.
///
/// Every question must be answered. Analytics failures are logged and
/// otherwise ignored.
pub async fn submit_assessment(
    api: &dyn GuidanceApi,
    tracker: &QuizTracker,
    options: &SubmitOptions,
) -> Result<Submission, SubmitError> {
    let unanswered = tracker.unanswered();
    if !unanswered.is_empty() {
        return Err(SubmitError::Incomplete { unanswered });
    }

    let request = RecommendRequest {
        profile: build_profile(tracker),
        goals: options.goals.clone(),
    };
    let token = options.token.as_deref();
    let cancel = options.cancel.as_ref();

    let mut retry_delay = options.retry_delay;
    let mut attempt = 0u32;
    let response = loop {
        attempt += 1;
        let result = with_deadline(api.ai_recommend(&request, token), options.timeout, cancel).await;
        match result {
            Ok(response) => break response,
            Err(e) if e.is_retryable() && attempt <= options.max_retries => {
                tracing::warn!(attempt, error = %e, "submission failed, retrying in {retry_delay:?}");
                let sleep = tokio::time::sleep(retry_delay);
                match cancel {
                    Some(token) => {
                        tokio::select! {
                            _ = token.cancelled() => return Err(ApiError::Cancelled.into()),
                            _ = sleep => {}
                        }
                    }
                    None => sleep.await,
                }
                retry_delay = (retry_delay * 2).min(Duration::from_secs(30));
            }
            Err(e) => return Err(e.into()),
        }
    };

    let submission = Submission {
        id: Uuid::new_v4(),
        quiz_id: tracker.quiz().id.clone(),
        submitted_at: Utc::now(),
        attempts: attempt,
        response,
    };
    tracing::info!(
        submission = %submission.id,
        session = submission.response.session_id,
        attempts = attempt,
        "assessment submitted"
    );

    if options.emit_analytics {
        let event = AnalyticsEvent::with_metadata(
            SUBMITTED_EVENT,
            serde_json::json!({
                "quiz_id": submission.quiz_id,
                "session_id": submission.response.session_id,
                "answered": tracker.answers().len(),
            }),
        );
        if let Err(e) = with_deadline(api.analytics_event(&event), options.timeout, cancel).await {
            tracing::warn!(error = %e, "failed to record submission event");
        }
    }

    Ok(submission)
}
