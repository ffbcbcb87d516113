use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use smartjob_core::{Credential, CredentialStore};
use smartjob_engine::AtomicFileWriter;
use smartjob_logging::{smartjob_error, smartjob_info, smartjob_warn};

const SESSION_FILENAME: &str = ".smartjob_session.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    saved_utc: String,
}

/// Credential store backed by one RON file in the state directory.
pub(crate) struct FileCredentialStore {
    writer: AtomicFileWriter,
}

impl FileCredentialStore {
    pub(crate) fn new(state_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(state_dir),
        }
    }

    fn path(&self) -> PathBuf {
        self.writer.dir().join(SESSION_FILENAME)
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&mut self, credential: &Credential) -> bool {
        let session = PersistedSession {
            token: credential.token().to_string(),
            saved_utc: Utc::now().to_rfc3339(),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&session, pretty) {
            Ok(text) => text,
            Err(err) => {
                smartjob_error!("Failed to serialize session: {}", err);
                return false;
            }
        };
        match self.writer.write(SESSION_FILENAME, &content) {
            Ok(path) => {
                smartjob_info!("Saved session to {:?}", path);
                true
            }
            Err(err) => {
                smartjob_error!(
                    "Failed to write session to {:?}: {}",
                    self.writer.dir(),
                    err
                );
                false
            }
        }
    }

    fn load(&self) -> Option<Credential> {
        read_session(&self.path()).map(|session| Credential::from_token(session.token))
    }

    fn clear(&mut self) {
        if let Err(err) = self.writer.remove(SESSION_FILENAME) {
            smartjob_error!("Failed to remove session file {:?}: {}", self.path(), err);
        }
    }
}

fn read_session(path: &Path) -> Option<PersistedSession> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            smartjob_warn!("Failed to read session from {:?}: {}", path, err);
            return None;
        }
    };
    match ron::from_str::<PersistedSession>(&content) {
        Ok(session) => {
            smartjob_info!(
                "Loaded session saved at {} from {:?}",
                session.saved_utc,
                path
            );
            Some(session)
        }
        Err(err) => {
            smartjob_warn!("Failed to parse session from {:?}: {}", path, err);
            None
        }
    }
}
