use thiserror::Error;

/// Local input problems, reported without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a PDF file.")]
    NoFileSelected,
    #[error("Only PDF files are supported (got {mime_type}).")]
    NotPdf { mime_type: String },
    #[error("Please select a rating.")]
    NoRatingSelected,
    #[error("Rating must be between 1 and 5 (got {0}).")]
    RatingOutOfRange(u8),
    #[error("Please log in first.")]
    NotAuthenticated,
}

/// Every failure the client shows to the user. `Display` is the text that
/// lands in the status area of the operation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Auth(String),
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("An unexpected error occurred: {0}")]
    Transport(String),
}

/// How a backend call went wrong, as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFailure {
    /// A response arrived with a non-2xx status.
    Rejected {
        status: u16,
        status_text: String,
        detail: Option<String>,
    },
    /// No usable response: connection, timeout or body decoding failure.
    Transport(String),
}

impl ServiceFailure {
    pub fn rejected(status: u16, status_text: impl Into<String>, detail: Option<String>) -> Self {
        Self::Rejected {
            status,
            status_text: status_text.into(),
            detail,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// Login-path failure: backend detail, else `fallback`.
    pub(crate) fn into_auth_error(self, fallback: &str) -> ClientError {
        match self {
            Self::Rejected { detail, .. } => {
                ClientError::Auth(detail.unwrap_or_else(|| fallback.to_string()))
            }
            Self::Transport(reason) => ClientError::Transport(reason),
        }
    }

    /// Data-call failure: backend detail, else `HTTP status N`.
    pub(crate) fn into_backend_error(self) -> ClientError {
        match self {
            Self::Rejected { status, detail, .. } => ClientError::Backend {
                status,
                message: detail.unwrap_or_else(|| format!("HTTP status {status}")),
            },
            Self::Transport(reason) => ClientError::Transport(reason),
        }
    }

    /// Feedback failure: backend detail, else the raw status text.
    pub(crate) fn into_feedback_error(self) -> ClientError {
        match self {
            Self::Rejected {
                status,
                status_text,
                detail,
            } => {
                let message = match detail {
                    Some(detail) => detail,
                    None if !status_text.is_empty() => status_text,
                    None => format!("HTTP status {status}"),
                };
                ClientError::Backend { status, message }
            }
            Self::Transport(reason) => ClientError::Transport(reason),
        }
    }
}
