use std::sync::{mpsc, Arc};

use smartjob_core::{
    Effect, JobRecommendation, Msg, Recommendations, SelectedFile, ServiceFailure, SkillScore,
};
use smartjob_engine::{
    ApiError, ClientSettings, CvUpload, EngineEvent, EngineHandle, EventSink,
    RecommendationResponse, SkillsResponse,
};
use smartjob_logging::{smartjob_debug, smartjob_info, smartjob_warn};

use super::app::AppEvent;

/// Executes the network effects of the state machine on the engine.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: ClientSettings,
        tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, ApiError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    #[cfg(test)]
    pub(crate) fn with_backend(
        backend: Arc<dyn smartjob_engine::Backend>,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            engine: EngineHandle::with_backend(backend, Arc::new(MsgSink { tx })),
        }
    }

    pub(crate) fn run(&self, effect: Effect) {
        match effect {
            Effect::ProbeCredential { credential } => {
                smartjob_info!("Probing credential");
                self.engine.probe(credential.token());
            }
            Effect::CreateAccount { username, password } => {
                smartjob_info!("Creating account for {}", username);
                self.engine.create_account(username, password.expose());
            }
            Effect::RequestRecommendations {
                attempt,
                credential,
                file,
            } => {
                smartjob_info!(
                    "Requesting recommendations attempt={} file={} bytes={}",
                    attempt,
                    file.name,
                    file.bytes.len()
                );
                self.engine
                    .recommend(attempt, credential.token(), to_upload(&file));
            }
            Effect::RequestSkills {
                attempt,
                credential,
                file,
            } => {
                smartjob_info!(
                    "Requesting skill extraction attempt={} file={} bytes={}",
                    attempt,
                    file.name,
                    file.bytes.len()
                );
                self.engine
                    .extract_skills(attempt, credential.token(), to_upload(&file));
            }
            Effect::SendFeedback {
                credential,
                feedback,
            } => {
                smartjob_info!("Sending feedback rating={}", feedback.rating);
                self.engine
                    .submit_feedback(credential.token(), feedback.rating, feedback.comment);
            }
            Effect::PersistCredential(_) | Effect::ClearCredential | Effect::ResetFeedbackForm => {
                smartjob_debug!("Local effect reached the engine runner; ignored");
            }
        }
    }
}

/// Every request gets its own payload built from the shared file content.
fn to_upload(file: &SelectedFile) -> CvUpload {
    CvUpload::new(file.name.clone(), file.bytes.to_vec())
}

/// Forwards engine events into the controller inbox as core messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if self.tx.send(AppEvent::Core(to_msg(event))).is_err() {
            smartjob_debug!("Controller gone; engine event dropped");
        }
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProbeCompleted(result) => Msg::ProbeFinished(result.map_err(to_failure)),
        EngineEvent::AccountCreated(result) => {
            Msg::AccountCreationFinished(result.map_err(to_failure))
        }
        EngineEvent::RecommendationCompleted { attempt, result } => Msg::RecommendationFinished {
            attempt,
            result: result.map(to_recommendations).map_err(to_failure),
        },
        EngineEvent::SkillsCompleted { attempt, result } => Msg::SkillsFinished {
            attempt,
            result: result.map(to_skills).map_err(to_failure),
        },
        EngineEvent::FeedbackCompleted(result) => Msg::FeedbackFinished(result.map_err(to_failure)),
    }
}

fn to_failure(err: ApiError) -> ServiceFailure {
    match err.http_status() {
        Some(status) => ServiceFailure::rejected(status, err.message, err.detail),
        None => {
            smartjob_warn!("Backend call failed without a response: {}", err);
            ServiceFailure::Transport(err.to_string())
        }
    }
}

fn to_recommendations(response: RecommendationResponse) -> Recommendations {
    Recommendations {
        jobs: response
            .recommended_jobs
            .into_iter()
            .map(|job| JobRecommendation {
                title: job.title.unwrap_or_default(),
                company: job.company.unwrap_or_default(),
                location: job.location.unwrap_or_default(),
                description: job.description.unwrap_or_default(),
            })
            .collect(),
        career_text: response.career_recommendation_text,
    }
}

fn to_skills(response: SkillsResponse) -> Vec<SkillScore> {
    response
        .extracted_skills
        .into_iter()
        .map(|entry| SkillScore {
            skill: entry.skill,
            score: entry.score,
        })
        .collect()
}
