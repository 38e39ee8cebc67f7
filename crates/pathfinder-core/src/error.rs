//! Error types for quiz progression and the guidance API.
//!
//! `ApiError` lives here rather than in `pathfinder-client` so the
//! submission flow can classify failures without string matching.

use thiserror::Error;

/// Errors raised by the quiz tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The current question must be answered before moving forward.
    #[error("question {question_id} must be answered before continuing")]
    AnswerRequired { question_id: u32 },

    /// The answer is not one of the question's options.
    #[error("'{option}' is not an option of question {question_id}")]
    InvalidAnswerOption { question_id: u32, option: String },

    /// No question with this id exists in the quiz.
    #[error("unknown question id: {0}")]
    UnknownQuestion(u32),

    /// A 1-based option number outside the question's option list.
    #[error("option {index} is out of range for question {question_id} ({count} options)")]
    OptionOutOfRange {
        question_id: u32,
        index: usize,
        count: usize,
    },

    /// The quiz has no sections.
    #[error("quiz has no sections")]
    EmptyQuiz,

    /// A section has no questions.
    #[error("section '{0}' has no questions")]
    EmptySection(String),

    /// A multiple-choice question has no options.
    #[error("question {0} has no options")]
    NoOptions(u32),

    /// Two questions share the same id.
    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(u32),

    /// A snapshot was taken from a different quiz.
    #[error("snapshot belongs to quiz '{found}', expected '{expected}'")]
    SnapshotMismatch { expected: String, found: String },

    /// A snapshot cursor does not point at a question.
    #[error("cursor ({section}, {question}) is out of bounds")]
    CursorOutOfBounds { section: usize, question: usize },
}

/// Errors that can occur when talking to the Pathfinder back end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Returns `true` if repeating the request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::HttpStatus { status, .. } => *status >= 500,
            ApiError::Decode(_) | ApiError::Cancelled => false,
        }
    }

    /// Returns the HTTP status code, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from submitting a completed assessment.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Some questions are still unanswered.
    #[error("assessment incomplete: {} unanswered question(s)", unanswered.len())]
    Incomplete { unanswered: Vec<u32> },

    /// The back end call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ApiError::Network("reset".into()).is_retryable());
        assert!(ApiError::Timeout(15).is_retryable());
        assert!(ApiError::HttpStatus {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(!ApiError::HttpStatus {
            status: 401,
            message: "invalid credentials".into()
        }
        .is_retryable());
        assert!(!ApiError::Decode("eof".into()).is_retryable());
        assert!(!ApiError::Cancelled.is_retryable());
    }

    #[test]
    fn incomplete_message_counts_questions() {
        let err = SubmitError::Incomplete {
            unanswered: vec![4, 6],
        };
        assert_eq!(err.to_string(), "assessment incomplete: 2 unanswered question(s)");
    }
}
