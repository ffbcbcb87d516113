use std::sync::Arc;

/// Monotonic identifier of one upload click.
pub type AttemptId = u64;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A user-picked file, as reported by the host (name, MIME type, content).
///
/// The content is shared; every request builds its own payload from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecommendation {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
}

/// Success payload of the recommendation call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recommendations {
    pub jobs: Vec<JobRecommendation>,
    pub career_text: String,
}

/// Score is expected in [0, 100] but is neither clamped nor validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillScore {
    pub skill: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub rating: u8,
    pub comment: String,
}
