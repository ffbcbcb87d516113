use std::future::Future;
use std::sync::{mpsc, Arc};
use std::thread;

use smartjob_logging::{smartjob_debug, smartjob_error, smartjob_info};
use tokio_util::sync::CancellationToken;

use crate::backend::{Backend, ClientSettings, ReqwestBackend};
use crate::{ApiError, AttemptId, CvUpload, EngineEvent};

/// Receives engine events on whatever thread the request finished on.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

enum EngineCommand {
    Probe {
        token: String,
    },
    CreateAccount {
        username: String,
        password: String,
    },
    Recommend {
        attempt: AttemptId,
        token: String,
        upload: CvUpload,
    },
    ExtractSkills {
        attempt: AttemptId,
        token: String,
        upload: CvUpload,
    },
    Feedback {
        token: String,
        rating: u8,
        comment: String,
    },
}

impl EngineCommand {
    fn upload_attempt(&self) -> Option<AttemptId> {
        match self {
            Self::Recommend { attempt, .. } | Self::ExtractSkills { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }
}

/// Runs backend calls on a background tokio runtime.
///
/// Every command becomes its own task, so calls overlap and finish in any
/// order. Upload calls are grouped per attempt: when a newer attempt arrives
/// the older attempt's calls are cancelled and report nothing.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, ApiError> {
        let backend = ReqwestBackend::new(settings)?;
        Ok(Self::with_backend(Arc::new(backend), sink))
    }

    pub fn with_backend(backend: Arc<dyn Backend>, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    smartjob_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut attempts = AttemptTokens::default();
            while let Ok(command) = cmd_rx.recv() {
                let cancel = command
                    .upload_attempt()
                    .map(|attempt| attempts.token_for(attempt));
                let backend = backend.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, cancel, sink.as_ref()).await;
                });
            }
            smartjob_debug!("Engine command channel closed; shutting down runtime");
        });

        Self { cmd_tx }
    }

    pub fn probe(&self, token: impl Into<String>) {
        self.send(EngineCommand::Probe {
            token: token.into(),
        });
    }

    pub fn create_account(&self, username: impl Into<String>, password: impl Into<String>) {
        self.send(EngineCommand::CreateAccount {
            username: username.into(),
            password: password.into(),
        });
    }

    pub fn recommend(&self, attempt: AttemptId, token: impl Into<String>, upload: CvUpload) {
        self.send(EngineCommand::Recommend {
            attempt,
            token: token.into(),
            upload,
        });
    }

    pub fn extract_skills(&self, attempt: AttemptId, token: impl Into<String>, upload: CvUpload) {
        self.send(EngineCommand::ExtractSkills {
            attempt,
            token: token.into(),
            upload,
        });
    }

    pub fn submit_feedback(&self, token: impl Into<String>, rating: u8, comment: impl Into<String>) {
        self.send(EngineCommand::Feedback {
            token: token.into(),
            rating,
            comment: comment.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            smartjob_error!("Engine thread is gone; command dropped");
        }
    }
}

/// Cancellation token of the newest upload attempt seen so far.
#[derive(Default)]
struct AttemptTokens {
    current: Option<(AttemptId, CancellationToken)>,
}

impl AttemptTokens {
    fn token_for(&mut self, attempt: AttemptId) -> CancellationToken {
        match &self.current {
            Some((current, token)) if *current == attempt => return token.clone(),
            Some((current, _)) if *current > attempt => {
                smartjob_debug!(
                    "Upload attempt {} already superseded by {}",
                    attempt,
                    current
                );
                let token = CancellationToken::new();
                token.cancel();
                return token;
            }
            _ => {}
        }
        if let Some((previous, token)) = self.current.take() {
            smartjob_info!(
                "Cancelling upload attempt {} in favour of {}",
                previous,
                attempt
            );
            token.cancel();
        }
        let token = CancellationToken::new();
        self.current = Some((attempt, token.clone()));
        token
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    cancel: Option<CancellationToken>,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Probe { token } => {
            let result = backend.probe_credential(&token).await;
            sink.emit(EngineEvent::ProbeCompleted(result));
        }
        EngineCommand::CreateAccount { username, password } => {
            let result = backend.create_account(&username, &password).await;
            sink.emit(EngineEvent::AccountCreated(result));
        }
        EngineCommand::Recommend {
            attempt,
            token,
            upload,
        } => {
            let call = backend.recommend_from_cv(&token, upload);
            if let Some(result) = unless_cancelled(cancel, call).await {
                sink.emit(EngineEvent::RecommendationCompleted { attempt, result });
            } else {
                smartjob_debug!("Recommendation call for attempt {} cancelled", attempt);
            }
        }
        EngineCommand::ExtractSkills {
            attempt,
            token,
            upload,
        } => {
            let call = backend.extract_skills_from_cv(&token, upload);
            if let Some(result) = unless_cancelled(cancel, call).await {
                sink.emit(EngineEvent::SkillsCompleted { attempt, result });
            } else {
                smartjob_debug!("Skills call for attempt {} cancelled", attempt);
            }
        }
        EngineCommand::Feedback {
            token,
            rating,
            comment,
        } => {
            let result = backend.submit_feedback(&token, rating, &comment).await;
            sink.emit(EngineEvent::FeedbackCompleted(result));
        }
    }
}

async fn unless_cancelled<F: Future>(cancel: Option<CancellationToken>, call: F) -> Option<F::Output> {
    match cancel {
        Some(cancel) => tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            output = call => Some(output),
        },
        None => Some(call.await),
    }
}
