use crate::render::{job_table_rows, narrative, skill_chart};
use crate::{
    AppState, AttemptId, ClientError, FeedbackStatus, JobRowView, LoginStatus, NarrativeView,
    Recommendations, SkillChart, SkillScore, SubOperation,
};

pub const FEEDBACK_SENT_TEXT: &str = "Feedback submitted. Thank you!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginView {
    pub in_progress: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecommendationSection {
    pub loading: bool,
    pub error: Option<String>,
    pub narrative: Option<NarrativeView>,
    pub rows: Vec<JobRowView>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillsSection {
    pub loading: bool,
    pub error: Option<String>,
    pub chart: Option<SkillChart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackView {
    pub sending: bool,
    pub notice: Option<Notice>,
    /// Bumped on every status change, so a repeated identical failure still
    /// differs from the previous view.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub authenticated: bool,
    pub login: LoginView,
    pub upload_notice: Option<Notice>,
    /// Bumped each time an upload notice is set, even to the same text.
    pub upload_notice_revision: u64,
    pub attempt: Option<AttemptId>,
    pub file_name: Option<String>,
    pub recommendations: RecommendationSection,
    pub skills: SkillsSection,
    pub feedback: FeedbackView,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let login = match state.login_status() {
            LoginStatus::Idle => LoginView::default(),
            LoginStatus::Probing | LoginStatus::CreatingAccount => LoginView {
                in_progress: true,
                error: None,
            },
            LoginStatus::Failed(err) => LoginView {
                in_progress: false,
                error: Some(err.to_string()),
            },
        };

        let (attempt, file_name, recommendations, skills) = match state.upload() {
            Some(attempt) => (
                Some(attempt.id),
                Some(attempt.file_name.clone()),
                recommendation_section(&attempt.recommendation),
                skills_section(&attempt.skills),
            ),
            None => (
                None,
                None,
                RecommendationSection::default(),
                SkillsSection::default(),
            ),
        };

        let feedback_notice = match state.feedback_status() {
            FeedbackStatus::Idle | FeedbackStatus::Sending => None,
            FeedbackStatus::Sent => Some(Notice::Success(FEEDBACK_SENT_TEXT.to_string())),
            FeedbackStatus::Failed(ClientError::Validation(err)) => {
                Some(Notice::Warning(err.to_string()))
            }
            // Transport text already carries its own lead-in.
            FeedbackStatus::Failed(err @ ClientError::Transport(_)) => {
                Some(Notice::Error(err.to_string()))
            }
            FeedbackStatus::Failed(err) => {
                Some(Notice::Error(format!("Error submitting feedback: {err}")))
            }
        };
        let feedback = FeedbackView {
            sending: *state.feedback_status() == FeedbackStatus::Sending,
            notice: feedback_notice,
            revision: state.feedback_revision(),
        };

        Self {
            authenticated: state.is_authenticated(),
            login,
            upload_notice: state
                .upload_notice()
                .map(|err| Notice::Warning(err.to_string())),
            upload_notice_revision: state.upload_notice_revision(),
            attempt,
            file_name,
            recommendations,
            skills,
            feedback,
        }
    }
}

fn recommendation_section(op: &SubOperation<Recommendations>) -> RecommendationSection {
    match op {
        SubOperation::Idle => RecommendationSection::default(),
        SubOperation::Loading => RecommendationSection {
            loading: true,
            ..RecommendationSection::default()
        },
        SubOperation::Succeeded(payload) => RecommendationSection {
            loading: false,
            error: None,
            narrative: Some(narrative(&payload.career_text)),
            rows: job_table_rows(&payload.jobs),
        },
        SubOperation::Failed(err) => RecommendationSection {
            error: Some(failure_text(err)),
            ..RecommendationSection::default()
        },
    }
}

fn skills_section(op: &SubOperation<Vec<SkillScore>>) -> SkillsSection {
    match op {
        SubOperation::Idle => SkillsSection::default(),
        SubOperation::Loading => SkillsSection {
            loading: true,
            ..SkillsSection::default()
        },
        SubOperation::Succeeded(skills) => SkillsSection {
            loading: false,
            error: None,
            chart: Some(skill_chart(skills)),
        },
        SubOperation::Failed(err) => SkillsSection {
            error: Some(failure_text(err)),
            ..SkillsSection::default()
        },
    }
}

fn failure_text(err: &ClientError) -> String {
    match err {
        ClientError::Transport(_) => err.to_string(),
        _ => format!("Error: {err}"),
    }
}
