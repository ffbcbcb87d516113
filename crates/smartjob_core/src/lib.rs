//! SmartJob core: pure state machine, session gate and result renderers.
mod credential;
mod effect;
mod error;
mod model;
mod msg;
mod render;
mod state;
mod update;
mod view_model;

pub use credential::{Credential, CredentialStore, MemoryCredentialStore, Password, Session};
pub use effect::Effect;
pub use error::{ClientError, ServiceFailure, ValidationError};
pub use model::{
    AttemptId, FeedbackSubmission, JobRecommendation, Recommendations, SelectedFile, SkillScore,
    PDF_MIME_TYPE,
};
pub use msg::Msg;
pub use render::{
    job_table_rows, narrative, skill_chart, BarSeries, JobRowView, NarrativeView, SkillChart,
    CAREER_HEADING, CHART_TITLE, CHART_X_TITLE, CHART_Y_RANGE, CHART_Y_TITLE, NO_RESULTS_TEXT,
    NO_SKILLS_TEXT,
};
pub use state::{AppState, FeedbackStatus, LoginStatus, SubOperation, UploadAttempt};
pub use update::update;
pub use view_model::{
    AppViewModel, FeedbackView, LoginView, Notice, RecommendationSection, SkillsSection,
    FEEDBACK_SENT_TEXT,
};
