use crate::{AttemptId, Credential, FeedbackSubmission, Password, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// GET an authenticated resource to test a freshly derived credential.
    ProbeCredential { credential: Credential },
    /// Unauthenticated account creation after a rejected probe.
    CreateAccount { username: String, password: Password },
    PersistCredential(Credential),
    ClearCredential,
    /// Upload call A. Carries its own copy of the file.
    RequestRecommendations {
        attempt: AttemptId,
        credential: Credential,
        file: SelectedFile,
    },
    /// Upload call B. Carries its own copy of the file.
    RequestSkills {
        attempt: AttemptId,
        credential: Credential,
        file: SelectedFile,
    },
    SendFeedback {
        credential: Credential,
        feedback: FeedbackSubmission,
    },
    /// Tell the host to clear the feedback inputs.
    ResetFeedbackForm,
}
