use smartjob_logging::{smartjob_debug, smartjob_info};

use crate::{
    AppState, Effect, FeedbackStatus, FeedbackSubmission, LoginStatus, Msg, Password,
    SelectedFile, ServiceFailure, ValidationError,
};

const UNAUTHORIZED: u16 = 401;
const LOGIN_FAILED: &str = "Login failed.";
const ACCOUNT_CREATION_FAILED: &str = "Account creation failed.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CredentialRestored(credential) => {
            state.restore_session(credential);
            Vec::new()
        }
        Msg::LoginSubmitted { username, password } => login(&mut state, username, password),
        Msg::ProbeFinished(result) => probe_finished(&mut state, result),
        Msg::AccountCreationFinished(result) => account_creation_finished(&mut state, result),
        Msg::LogoutClicked => {
            if state.is_authenticated() {
                state.logout();
                vec![Effect::ClearCredential]
            } else {
                Vec::new()
            }
        }
        Msg::UploadSubmitted(file) => upload(&mut state, file),
        Msg::RecommendationFinished { attempt, result } => {
            state.apply_recommendation(attempt, result);
            Vec::new()
        }
        Msg::SkillsFinished { attempt, result } => {
            state.apply_skills(attempt, result);
            Vec::new()
        }
        Msg::FeedbackSubmitted { rating, comment } => feedback(&mut state, rating, comment),
        Msg::FeedbackFinished(result) => feedback_finished(&mut state, result),
    };

    (state, effects)
}

fn login(state: &mut AppState, username: String, password: Password) -> Vec<Effect> {
    if state.login_in_flight() {
        smartjob_debug!("Ignoring login submission while another login is in flight");
        return Vec::new();
    }
    smartjob_info!("Probing credential for user {}", username);
    let credential = state.begin_login(username, password);
    vec![Effect::ProbeCredential { credential }]
}

// An existing account with a wrong password also answers 401, so it takes the
// account creation branch too and fails there. The two cases are not
// distinguishable from the probe alone.
fn probe_finished(state: &mut AppState, result: Result<(), ServiceFailure>) -> Vec<Effect> {
    if *state.login_status() != LoginStatus::Probing {
        smartjob_debug!("Ignoring probe result with no probe in flight");
        return Vec::new();
    }
    match result {
        Ok(()) => persist_login(state),
        Err(failure) if failure.status() == Some(UNAUTHORIZED) => {
            match state.escalate_to_account_creation() {
                Some((username, password)) => {
                    smartjob_info!("Probe rejected; creating account for user {}", username);
                    vec![Effect::CreateAccount { username, password }]
                }
                None => Vec::new(),
            }
        }
        Err(failure) => {
            state.fail_login(failure.into_auth_error(LOGIN_FAILED));
            Vec::new()
        }
    }
}

fn account_creation_finished(
    state: &mut AppState,
    result: Result<(), ServiceFailure>,
) -> Vec<Effect> {
    if *state.login_status() != LoginStatus::CreatingAccount {
        smartjob_debug!("Ignoring account creation result with no creation in flight");
        return Vec::new();
    }
    match result {
        // The derived credential is assumed valid now; no second probe.
        Ok(()) => persist_login(state),
        Err(failure) => {
            state.fail_login(failure.into_auth_error(ACCOUNT_CREATION_FAILED));
            Vec::new()
        }
    }
}

fn persist_login(state: &mut AppState) -> Vec<Effect> {
    match state.complete_login() {
        Some(credential) => vec![Effect::PersistCredential(credential)],
        None => Vec::new(),
    }
}

fn upload(state: &mut AppState, file: Option<SelectedFile>) -> Vec<Effect> {
    let Some(credential) = state.session().get().cloned() else {
        state.set_upload_notice(ValidationError::NotAuthenticated.into());
        return Vec::new();
    };
    let Some(file) = file else {
        state.set_upload_notice(ValidationError::NoFileSelected.into());
        return Vec::new();
    };
    if !file.is_pdf() {
        state.set_upload_notice(
            ValidationError::NotPdf {
                mime_type: file.mime_type.clone(),
            }
            .into(),
        );
        return Vec::new();
    }

    let attempt = state.start_upload_attempt(&file.name);
    smartjob_info!(
        "Upload attempt {} started for {} ({} bytes)",
        attempt,
        file.name,
        file.bytes.len()
    );
    // One file per call: each request consumes its own payload.
    vec![
        Effect::RequestRecommendations {
            attempt,
            credential: credential.clone(),
            file: file.clone(),
        },
        Effect::RequestSkills {
            attempt,
            credential,
            file,
        },
    ]
}

fn feedback(state: &mut AppState, rating: Option<u8>, comment: String) -> Vec<Effect> {
    if *state.feedback_status() == FeedbackStatus::Sending {
        smartjob_debug!("Ignoring feedback submission while one is in flight");
        return Vec::new();
    }
    let Some(credential) = state.session().get().cloned() else {
        state.set_feedback(FeedbackStatus::Failed(
            ValidationError::NotAuthenticated.into(),
        ));
        return Vec::new();
    };
    let rating = match rating {
        None => {
            state.set_feedback(FeedbackStatus::Failed(
                ValidationError::NoRatingSelected.into(),
            ));
            return Vec::new();
        }
        Some(rating) if !(1..=5).contains(&rating) => {
            state.set_feedback(FeedbackStatus::Failed(
                ValidationError::RatingOutOfRange(rating).into(),
            ));
            return Vec::new();
        }
        Some(rating) => rating,
    };

    state.set_feedback(FeedbackStatus::Sending);
    vec![Effect::SendFeedback {
        credential,
        feedback: FeedbackSubmission { rating, comment },
    }]
}

fn feedback_finished(state: &mut AppState, result: Result<(), ServiceFailure>) -> Vec<Effect> {
    if *state.feedback_status() != FeedbackStatus::Sending {
        smartjob_debug!("Ignoring feedback result with no submission in flight");
        return Vec::new();
    }
    match result {
        Ok(()) => {
            state.set_feedback(FeedbackStatus::Sent);
            vec![Effect::ResetFeedbackForm]
        }
        Err(failure) => {
            state.set_feedback(FeedbackStatus::Failed(failure.into_feedback_error()));
            Vec::new()
        }
    }
}
