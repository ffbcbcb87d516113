use smartjob_logging::{smartjob_debug, smartjob_info, smartjob_warn};

use crate::view_model::AppViewModel;
use crate::{
    AttemptId, ClientError, Credential, Password, Recommendations, ServiceFailure, Session,
    SkillScore,
};

/// Lifecycle of one of the two upload calls.
///
/// Within an attempt it moves `Idle -> Loading -> Succeeded | Failed` once.
#[derive(Debug, Clone, PartialEq)]
pub enum SubOperation<T> {
    Idle,
    Loading,
    Succeeded(T),
    Failed(ClientError),
}

impl<T> SubOperation<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    fn begin(&mut self) {
        if matches!(self, Self::Idle) {
            *self = Self::Loading;
        }
    }

    /// Applies a result if still loading. Returns false when the result was dropped.
    fn settle(&mut self, result: Result<T, ServiceFailure>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match result {
            Ok(value) => Self::Succeeded(value),
            Err(failure) => Self::Failed(failure.into_backend_error()),
        };
        true
    }
}

/// One upload click and its two independent sub-operations.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadAttempt {
    pub id: AttemptId,
    pub file_name: String,
    pub recommendation: SubOperation<Recommendations>,
    pub skills: SubOperation<Vec<SkillScore>>,
}

impl UploadAttempt {
    fn new(id: AttemptId, file_name: &str) -> Self {
        Self {
            id,
            file_name: file_name.to_string(),
            recommendation: SubOperation::Idle,
            skills: SubOperation::Idle,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.recommendation.is_terminal() && self.skills.is_terminal()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLogin {
    pub(crate) username: String,
    pub(crate) password: Password,
    pub(crate) credential: Credential,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginStatus {
    #[default]
    Idle,
    Probing,
    CreatingAccount,
    Failed(ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedbackStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed(ClientError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: Session,
    login: LoginStatus,
    pending_login: Option<PendingLogin>,
    upload_notice: Option<ClientError>,
    upload: Option<UploadAttempt>,
    last_attempt: AttemptId,
    feedback: FeedbackStatus,
    upload_notice_revision: u64,
    feedback_revision: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn login_status(&self) -> &LoginStatus {
        &self.login
    }

    pub fn upload_notice(&self) -> Option<&ClientError> {
        self.upload_notice.as_ref()
    }

    pub fn upload(&self) -> Option<&UploadAttempt> {
        self.upload.as_ref()
    }

    pub fn feedback_status(&self) -> &FeedbackStatus {
        &self.feedback
    }

    pub fn upload_notice_revision(&self) -> u64 {
        self.upload_notice_revision
    }

    pub fn feedback_revision(&self) -> u64 {
        self.feedback_revision
    }

    /// True while any backend call this state is waiting on is outstanding.
    pub fn has_pending_work(&self) -> bool {
        let upload_pending = self
            .upload
            .as_ref()
            .is_some_and(|attempt| !attempt.is_settled());
        self.login_in_flight() || upload_pending || self.feedback == FeedbackStatus::Sending
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore_session(&mut self, credential: Option<Credential>) {
        match credential {
            Some(credential) => self.session.set(credential),
            None => self.session.clear(),
        }
        self.mark_dirty();
    }

    pub(crate) fn login_in_flight(&self) -> bool {
        matches!(
            self.login,
            LoginStatus::Probing | LoginStatus::CreatingAccount
        )
    }

    pub(crate) fn begin_login(&mut self, username: String, password: Password) -> Credential {
        let credential = Credential::derive(&username, password.expose());
        self.pending_login = Some(PendingLogin {
            username,
            password,
            credential: credential.clone(),
        });
        self.login = LoginStatus::Probing;
        self.mark_dirty();
        credential
    }

    /// Moves a probing login to account creation, handing back what the
    /// creation call needs.
    pub(crate) fn escalate_to_account_creation(&mut self) -> Option<(String, Password)> {
        if self.login != LoginStatus::Probing {
            return None;
        }
        let pending = self.pending_login.as_ref()?;
        let request = (pending.username.clone(), pending.password.clone());
        self.login = LoginStatus::CreatingAccount;
        self.mark_dirty();
        Some(request)
    }

    /// Completes the pending login and returns the credential to persist.
    pub(crate) fn complete_login(&mut self) -> Option<Credential> {
        let pending = self.pending_login.take()?;
        smartjob_info!("Login succeeded for user {}", pending.username);
        self.session.set(pending.credential.clone());
        self.login = LoginStatus::Idle;
        self.mark_dirty();
        Some(pending.credential)
    }

    pub(crate) fn fail_login(&mut self, error: ClientError) {
        if let Some(pending) = self.pending_login.take() {
            smartjob_warn!("Login failed for user {}: {}", pending.username, error);
        }
        self.login = LoginStatus::Failed(error);
        self.mark_dirty();
    }

    pub(crate) fn logout(&mut self) {
        self.session.clear();
        self.login = LoginStatus::Idle;
        self.pending_login = None;
        self.upload = None;
        self.upload_notice = None;
        self.feedback = FeedbackStatus::Idle;
        self.mark_dirty();
    }

    pub(crate) fn set_upload_notice(&mut self, error: ClientError) {
        self.upload_notice = Some(error);
        self.upload_notice_revision += 1;
        self.mark_dirty();
    }

    /// Replaces any previous attempt (in flight or not) with a fresh one whose
    /// two sub-operations are both loading.
    pub(crate) fn start_upload_attempt(&mut self, file_name: &str) -> AttemptId {
        self.last_attempt += 1;
        let id = self.last_attempt;
        if let Some(previous) = &self.upload {
            if !previous.is_settled() {
                smartjob_info!(
                    "Upload attempt {} superseded by attempt {} while in flight",
                    previous.id,
                    id
                );
            }
        }
        let mut attempt = UploadAttempt::new(id, file_name);
        attempt.recommendation.begin();
        attempt.skills.begin();
        self.upload = Some(attempt);
        self.upload_notice = None;
        self.mark_dirty();
        id
    }

    /// Resolves the attempt a result belongs to, or `None` if it is stale.
    fn current_attempt_mut(&mut self, attempt: AttemptId, call: &str) -> Option<&mut UploadAttempt> {
        match self.upload.as_mut() {
            Some(current) if current.id == attempt => Some(current),
            Some(current) => {
                smartjob_debug!(
                    "Discarding {} result for stale attempt {} (current {})",
                    call,
                    attempt,
                    current.id
                );
                None
            }
            None => {
                smartjob_debug!(
                    "Discarding {} result for attempt {} with no attempt active",
                    call,
                    attempt
                );
                None
            }
        }
    }

    pub(crate) fn apply_recommendation(
        &mut self,
        attempt: AttemptId,
        result: Result<Recommendations, ServiceFailure>,
    ) {
        let Some(current) = self.current_attempt_mut(attempt, "recommendation") else {
            return;
        };
        if current.recommendation.settle(result) {
            self.mark_dirty();
        } else {
            smartjob_warn!(
                "Recommendation result for attempt {} arrived after it settled",
                attempt
            );
        }
    }

    pub(crate) fn apply_skills(
        &mut self,
        attempt: AttemptId,
        result: Result<Vec<SkillScore>, ServiceFailure>,
    ) {
        let Some(current) = self.current_attempt_mut(attempt, "skills") else {
            return;
        };
        if current.skills.settle(result) {
            self.mark_dirty();
        } else {
            smartjob_warn!(
                "Skills result for attempt {} arrived after it settled",
                attempt
            );
        }
    }

    pub(crate) fn set_feedback(&mut self, status: FeedbackStatus) {
        self.feedback = status;
        self.feedback_revision += 1;
        self.mark_dirty();
    }
}
