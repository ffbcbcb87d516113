//! SmartJob engine: backend calls and effect execution.
mod backend;
mod engine;
mod persist;
mod types;
mod upload;
mod wire;

pub use backend::{Backend, ClientSettings, ReqwestBackend};
pub use engine::{EngineHandle, EventSink};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use types::{ApiError, AttemptId, EngineEvent, FailureKind};
pub use upload::{CvUpload, CV_FIELD_NAME, PDF_MIME};
pub use wire::{JobRecommendationDto, RecommendationResponse, SkillScoreDto, SkillsResponse};
