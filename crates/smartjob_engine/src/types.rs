use std::fmt;

use crate::wire::{RecommendationResponse, SkillsResponse};

pub type AttemptId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ProbeCompleted(Result<(), ApiError>),
    AccountCreated(Result<(), ApiError>),
    RecommendationCompleted {
        attempt: AttemptId,
        result: Result<RecommendationResponse, ApiError>,
    },
    SkillsCompleted {
        attempt: AttemptId,
        result: Result<SkillsResponse, ApiError>,
    },
    FeedbackCompleted(Result<(), ApiError>),
}

/// A failed backend call.
///
/// `detail` is the backend's own `detail` string when the error body had one.
/// For `HttpStatus` failures `message` is the reason phrase (may be empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub detail: Option<String>,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            detail: None,
            message: message.into(),
        }
    }

    pub(crate) fn status(status: reqwest::StatusCode, detail: Option<String>) -> Self {
        Self {
            kind: FailureKind::HttpStatus(status.as_u16()),
            detail,
            message: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.kind, detail),
            None if self.message.is_empty() => write!(f, "{}", self.kind),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::InvalidResponse => write!(f, "invalid response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
