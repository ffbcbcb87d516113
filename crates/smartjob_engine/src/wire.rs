//! JSON bodies exchanged with the backend.
use serde::{Deserialize, Serialize};

/// Job entry as returned by the recommender. Missing fields are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRecommendationDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommended_jobs: Vec<JobRecommendationDto>,
    #[serde(default)]
    pub career_recommendation_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillScoreDto {
    pub skill: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillsResponse {
    #[serde(default)]
    pub extracted_skills: Vec<SkillScoreDto>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewAccountRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeedbackRequest<'a> {
    pub rating: u8,
    pub comment: &'a str,
}

/// Error body convention: `{"detail": "..."}`. Non-string details (e.g.
/// validation error lists) are treated as absent.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

pub(crate) fn parse_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}
