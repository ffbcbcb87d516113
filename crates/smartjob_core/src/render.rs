//! Result renderers: pure functions from backend payloads to display state.
use crate::{JobRecommendation, SkillScore};

pub const NO_RESULTS_TEXT: &str = "No job recommendations found.";
pub const NO_SKILLS_TEXT: &str = "No skills extracted.";
pub const CAREER_HEADING: &str = "Career recommendation:";
pub const CHART_TITLE: &str = "Extracted skills from CV";
pub const CHART_X_TITLE: &str = "Skill";
pub const CHART_Y_TITLE: &str = "Score (0-100)";
pub const CHART_Y_RANGE: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRowView {
    Job {
        title: String,
        company: String,
        location: String,
        description: String,
    },
    /// Single placeholder row spanning every column.
    NoResults { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeView {
    pub heading: String,
    pub text: String,
}

/// Labeled bar series, one bar per skill, on a fixed y range.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub y_range: (f64, f64),
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkillChart {
    Bars(BarSeries),
    NoSkills { message: String },
}

/// Table rows for a recommendation list. Never empty.
pub fn job_table_rows(jobs: &[JobRecommendation]) -> Vec<JobRowView> {
    if jobs.is_empty() {
        return vec![JobRowView::NoResults {
            message: NO_RESULTS_TEXT.to_string(),
        }];
    }
    jobs.iter()
        .map(|job| JobRowView::Job {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            description: job.description.clone(),
        })
        .collect()
}

/// Career text is shown verbatim under a fixed heading.
pub fn narrative(text: &str) -> NarrativeView {
    NarrativeView {
        heading: CAREER_HEADING.to_string(),
        text: text.to_string(),
    }
}

/// Scores are passed through unclamped; the axis range stays [0, 100].
pub fn skill_chart(skills: &[SkillScore]) -> SkillChart {
    if skills.is_empty() {
        return SkillChart::NoSkills {
            message: NO_SKILLS_TEXT.to_string(),
        };
    }
    SkillChart::Bars(BarSeries {
        title: CHART_TITLE.to_string(),
        x_title: CHART_X_TITLE.to_string(),
        y_title: CHART_Y_TITLE.to_string(),
        y_range: CHART_Y_RANGE,
        labels: skills.iter().map(|s| s.skill.clone()).collect(),
        values: skills.iter().map(|s| s.score).collect(),
    })
}
