use std::sync::Once;

use pretty_assertions::assert_eq;
use smartjob_core::{
    update, AppState, Credential, Effect, JobRecommendation, JobRowView, Msg, Notice,
    Recommendations, SelectedFile, ServiceFailure, SkillChart, SkillScore, SubOperation,
    PDF_MIME_TYPE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(smartjob_logging::initialize_for_tests);
}

fn logged_in() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::CredentialRestored(Some(Credential::derive("alice", "pw"))),
    );
    state
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, PDF_MIME_TYPE, b"%PDF-1.4 test".to_vec())
}

fn submit(state: AppState, file: SelectedFile) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::UploadSubmitted(Some(file)));
    let attempt = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RequestRecommendations { attempt, .. } => Some(*attempt),
            _ => None,
        })
        .expect("recommendation effect");
    (state, attempt)
}

fn sample_recommendations() -> Recommendations {
    Recommendations {
        jobs: vec![JobRecommendation {
            title: "Data Scientist".into(),
            company: "Acme".into(),
            location: "Paris".into(),
            description: "Build models".into(),
        }],
        career_text: "Consider data roles.".into(),
    }
}

fn sample_skills() -> Vec<SkillScore> {
    vec![
        SkillScore {
            skill: "Python".into(),
            score: 90.0,
        },
        SkillScore {
            skill: "SQL".into(),
            score: 65.5,
        },
    ]
}

#[test]
fn valid_pdf_fans_out_two_requests_each_with_own_file() {
    init_logging();
    let credential = Credential::derive("alice", "pw");
    let file = pdf("cv.pdf");
    let (state, effects) = update(logged_in(), Msg::UploadSubmitted(Some(file.clone())));

    assert_eq!(
        effects,
        vec![
            Effect::RequestRecommendations {
                attempt: 1,
                credential: credential.clone(),
                file: file.clone(),
            },
            Effect::RequestSkills {
                attempt: 1,
                credential,
                file,
            },
        ]
    );

    let view = state.view();
    assert_eq!(view.attempt, Some(1));
    assert_eq!(view.file_name.as_deref(), Some("cv.pdf"));
    assert!(view.recommendations.loading);
    assert!(view.skills.loading);
    assert!(state.has_pending_work());
}

#[test]
fn non_pdf_is_rejected_without_effects() {
    init_logging();
    let file = SelectedFile::new("cv.docx", "application/msword", b"doc".to_vec());
    let (state, effects) = update(logged_in(), Msg::UploadSubmitted(Some(file)));

    assert!(effects.is_empty());
    assert!(state.upload().is_none());
    assert_eq!(
        state.view().upload_notice,
        Some(Notice::Warning(
            "Only PDF files are supported (got application/msword).".into()
        ))
    );
}

#[test]
fn missing_file_is_rejected_without_effects() {
    init_logging();
    let (state, effects) = update(logged_in(), Msg::UploadSubmitted(None));

    assert!(effects.is_empty());
    assert_eq!(
        state.view().upload_notice,
        Some(Notice::Warning("Please select a PDF file.".into()))
    );
}

#[test]
fn upload_requires_a_session() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::UploadSubmitted(Some(pdf("cv.pdf"))));

    assert!(effects.is_empty());
    assert_eq!(
        state.view().upload_notice,
        Some(Notice::Warning("Please log in first.".into()))
    );
}

#[test]
fn failing_recommendation_does_not_affect_skills() {
    init_logging();
    let (state, attempt) = submit(logged_in(), pdf("cv.pdf"));

    let (state, _) = update(
        state,
        Msg::RecommendationFinished {
            attempt,
            result: Err(ServiceFailure::rejected(
                500,
                "Internal Server Error",
                Some("AI model unavailable".into()),
            )),
        },
    );
    let view = state.view();
    assert!(!view.recommendations.loading);
    assert_eq!(
        view.recommendations.error.as_deref(),
        Some("Error: AI model unavailable")
    );
    assert!(view.skills.loading, "skills still loading on its own");
    assert!(state.has_pending_work());

    let (state, _) = update(
        state,
        Msg::SkillsFinished {
            attempt,
            result: Ok(sample_skills()),
        },
    );
    let view = state.view();
    assert!(!view.skills.loading);
    assert_eq!(view.skills.error, None);
    match view.skills.chart {
        Some(SkillChart::Bars(series)) => {
            assert_eq!(series.labels, vec!["Python", "SQL"]);
            assert_eq!(series.values, vec![90.0, 65.5]);
        }
        other => panic!("expected bars, got {other:?}"),
    }
    assert_eq!(
        view.recommendations.error.as_deref(),
        Some("Error: AI model unavailable")
    );
    assert!(view.recommendations.rows.is_empty());
    assert!(!state.has_pending_work());
}

#[test]
fn skills_can_settle_before_recommendations() {
    init_logging();
    let (state, attempt) = submit(logged_in(), pdf("cv.pdf"));

    let (state, _) = update(
        state,
        Msg::SkillsFinished {
            attempt,
            result: Err(ServiceFailure::rejected(502, "Bad Gateway", None)),
        },
    );
    assert_eq!(
        state.view().skills.error.as_deref(),
        Some("Error: HTTP status 502")
    );
    assert!(state.view().recommendations.loading);

    let (state, _) = update(
        state,
        Msg::RecommendationFinished {
            attempt,
            result: Ok(sample_recommendations()),
        },
    );
    let view = state.view();
    assert_eq!(view.recommendations.error, None);
    assert_eq!(
        view.recommendations.narrative.map(|n| n.text),
        Some("Consider data roles.".to_string())
    );
    assert_eq!(
        view.recommendations.rows,
        vec![JobRowView::Job {
            title: "Data Scientist".into(),
            company: "Acme".into(),
            location: "Paris".into(),
            description: "Build models".into(),
        }]
    );
    assert_eq!(
        view.skills.error.as_deref(),
        Some("Error: HTTP status 502")
    );
}

#[test]
fn stale_attempt_results_are_discarded() {
    init_logging();
    let (state, first) = submit(logged_in(), pdf("old.pdf"));
    let (state, second) = submit(state, pdf("new.pdf"));
    assert!(second > first);

    let view = state.view();
    assert_eq!(view.file_name.as_deref(), Some("new.pdf"));
    assert!(view.recommendations.loading);
    assert!(view.skills.loading);

    let mut state = state;
    assert!(state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::RecommendationFinished {
            attempt: first,
            result: Ok(sample_recommendations()),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::SkillsFinished {
            attempt: first,
            result: Ok(sample_skills()),
        },
    );
    assert!(!state.consume_dirty(), "stale results must not dirty state");
    let view = state.view();
    assert!(view.recommendations.loading);
    assert!(view.recommendations.rows.is_empty());
    assert!(view.skills.loading);
    assert_eq!(view.skills.chart, None);

    let (state, _) = update(
        state,
        Msg::RecommendationFinished {
            attempt: second,
            result: Ok(Recommendations::default()),
        },
    );
    let view = state.view();
    assert_eq!(view.attempt, Some(second));
    assert_eq!(view.recommendations.rows.len(), 1);
    assert!(matches!(
        view.recommendations.rows[0],
        JobRowView::NoResults { .. }
    ));
}

#[test]
fn sub_operation_settles_only_once() {
    init_logging();
    let (state, attempt) = submit(logged_in(), pdf("cv.pdf"));
    let (state, _) = update(
        state,
        Msg::SkillsFinished {
            attempt,
            result: Ok(sample_skills()),
        },
    );
    let (state, _) = update(
        state,
        Msg::SkillsFinished {
            attempt,
            result: Err(ServiceFailure::Transport("late duplicate".into())),
        },
    );

    let skills = &state.upload().expect("attempt").skills;
    assert!(matches!(skills, SubOperation::Succeeded(_)));
}

#[test]
fn new_attempt_clears_previous_results_and_notice() {
    init_logging();
    let (state, attempt) = submit(logged_in(), pdf("cv.pdf"));
    let (state, _) = update(
        state,
        Msg::RecommendationFinished {
            attempt,
            result: Ok(sample_recommendations()),
        },
    );
    let (state, _) = update(state, Msg::UploadSubmitted(None));
    assert!(state.view().upload_notice.is_some());
    assert_eq!(state.view().recommendations.rows.len(), 1, "invalid input keeps results");

    let (state, _) = submit(state, pdf("again.pdf"));
    let view = state.view();
    assert_eq!(view.upload_notice, None);
    assert!(view.recommendations.rows.is_empty());
    assert_eq!(view.recommendations.narrative, None);
    assert_eq!(view.skills.chart, None);
    assert!(view.recommendations.loading && view.skills.loading);
}

#[test]
fn results_after_logout_are_discarded() {
    init_logging();
    let (state, attempt) = submit(logged_in(), pdf("cv.pdf"));
    let (state, _) = update(state, Msg::LogoutClicked);
    let (state, _) = update(
        state,
        Msg::SkillsFinished {
            attempt,
            result: Ok(sample_skills()),
        },
    );

    assert!(state.upload().is_none());
    assert_eq!(state.view().skills.chart, None);
}

#[test]
fn transport_failures_are_shown_without_extra_prefix() {
    init_logging();
    let (state, attempt) = submit(logged_in(), pdf("cv.pdf"));
    let (state, _) = update(
        state,
        Msg::RecommendationFinished {
            attempt,
            result: Err(ServiceFailure::Transport("timed out".into())),
        },
    );

    assert_eq!(
        state.view().recommendations.error.as_deref(),
        Some("An unexpected error occurred: timed out")
    );
}

#[test]
fn same_upload_warning_twice_still_changes_the_view() {
    init_logging();
    let notes = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let (state, _) = update(logged_in(), Msg::UploadSubmitted(Some(notes.clone())));
    let first = state.view();
    let (state, effects) = update(state, Msg::UploadSubmitted(Some(notes)));
    let second = state.view();

    assert!(effects.is_empty());
    assert_eq!(first.upload_notice, second.upload_notice);
    assert!(second.upload_notice_revision > first.upload_notice_revision);
}
