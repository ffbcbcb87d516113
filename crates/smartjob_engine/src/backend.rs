use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use smartjob_logging::{smartjob_debug, smartjob_warn};
use url::Url;

use crate::wire::{
    parse_detail, FeedbackRequest, NewAccountRequest, RecommendationResponse, SkillsResponse,
};
use crate::{ApiError, CvUpload, FailureKind};

const USERS_PATH: &str = "users/";
const RECOMMEND_PATH: &str = "ai_smartjob/recommend_from_cv/";
const EXTRACT_SKILLS_PATH: &str = "ai_smartjob/extract_skills_from_cv/";
const FEEDBACK_PATH: &str = "feedback/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` lets a hung call wait forever.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The five backend calls the client makes. `token` is the Basic credential.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// GET an authenticated resource; any 2xx means the credential works.
    async fn probe_credential(&self, token: &str) -> Result<(), ApiError>;

    async fn create_account(&self, username: &str, password: &str) -> Result<(), ApiError>;

    async fn recommend_from_cv(
        &self,
        token: &str,
        upload: CvUpload,
    ) -> Result<RecommendationResponse, ApiError>;

    async fn extract_skills_from_cv(
        &self,
        token: &str,
        upload: CvUpload,
    ) -> Result<SkillsResponse, ApiError>;

    async fn submit_feedback(&self, token: &str, rating: u8, comment: &str)
        -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Endpoint paths are joined relative to the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Basic {token}"))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn probe_credential(&self, token: &str) -> Result<(), ApiError> {
        let url = self.endpoint(USERS_PATH)?;
        let response = self
            .authorized(self.client.get(url), token)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await.map(drop)
    }

    async fn create_account(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint(USERS_PATH)?;
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&NewAccountRequest { username, password })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await.map(drop)
    }

    async fn recommend_from_cv(
        &self,
        token: &str,
        upload: CvUpload,
    ) -> Result<RecommendationResponse, ApiError> {
        let url = self.endpoint(RECOMMEND_PATH)?;
        smartjob_debug!("POST {} ({} bytes)", url, upload.len());
        let form = upload.into_form()?;
        let response = self
            .authorized(self.client.post(url), token)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(ensure_success(response).await?).await
    }

    async fn extract_skills_from_cv(
        &self,
        token: &str,
        upload: CvUpload,
    ) -> Result<SkillsResponse, ApiError> {
        let url = self.endpoint(EXTRACT_SKILLS_PATH)?;
        smartjob_debug!("POST {} ({} bytes)", url, upload.len());
        let form = upload.into_form()?;
        let response = self
            .authorized(self.client.post(url), token)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(ensure_success(response).await?).await
    }

    async fn submit_feedback(
        &self,
        token: &str,
        rating: u8,
        comment: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(FEEDBACK_PATH)?;
        let response = self
            .authorized(self.client.post(url), token)
            .json(&FeedbackRequest { rating, comment })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await.map(drop)
    }
}

/// Passes 2xx responses through; otherwise reads the body for a `detail`.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let detail = match response.bytes().await {
        Ok(body) => parse_detail(&body),
        Err(err) => {
            smartjob_warn!("Failed to read error body from {}: {}", url, err);
            None
        }
    };
    smartjob_warn!("{} answered {} (detail: {:?})", url, status, detail);
    Err(ApiError::status(status, detail))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidRequest, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
