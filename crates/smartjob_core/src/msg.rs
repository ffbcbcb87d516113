use crate::{
    AttemptId, Credential, Password, Recommendations, SelectedFile, ServiceFailure, SkillScore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Credential read from the store at startup (or absent).
    CredentialRestored(Option<Credential>),
    /// User submitted the login form.
    LoginSubmitted { username: String, password: Password },
    /// Result of the authenticated probe call.
    ProbeFinished(Result<(), ServiceFailure>),
    /// Result of the first-time account creation call.
    AccountCreationFinished(Result<(), ServiceFailure>),
    /// User asked to log out.
    LogoutClicked,
    /// User clicked upload; `None` when no file was picked.
    UploadSubmitted(Option<SelectedFile>),
    /// Recommendation call settled for an upload attempt.
    RecommendationFinished {
        attempt: AttemptId,
        result: Result<Recommendations, ServiceFailure>,
    },
    /// Skill extraction call settled for an upload attempt.
    SkillsFinished {
        attempt: AttemptId,
        result: Result<Vec<SkillScore>, ServiceFailure>,
    },
    /// User submitted the feedback form.
    FeedbackSubmitted { rating: Option<u8>, comment: String },
    /// Feedback call settled.
    FeedbackFinished(Result<(), ServiceFailure>),
}
