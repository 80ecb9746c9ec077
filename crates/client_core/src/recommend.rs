//! HTTP client for the remote recommendation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::PreferenceInput,
    error::ApiError,
    protocol::{Recommendation, RecommendationRequest, RecommendationResponse, RECOMMEND_PATH},
};
use tracing::{error, info};
use url::Url;

use crate::{
    config::{Settings, DEFAULT_REQUEST_TIMEOUT},
    error::RecommendError,
};

/// Ranked songs in service order, or why the single attempt failed.
pub type RecommendationOutcome = Result<Vec<Recommendation>, RecommendError>;

#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(
        &self,
        preferences: &PreferenceInput,
        result_count: u32,
    ) -> RecommendationOutcome;
}

pub struct RecommendationClient {
    http: Client,
    endpoint: Url,
}

impl RecommendationClient {
    pub fn new(base_url: &str) -> Result<Self, RecommendError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RecommendError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RecommendError::Transport)?;
        Ok(Self {
            http,
            endpoint: recommend_endpoint(base_url)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RecommendError> {
        Self::with_timeout(settings.resolved_base_url(), settings.request_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issues exactly one `POST /recommend`; no retry on failure.
    pub async fn submit(
        &self,
        preferences: &PreferenceInput,
        result_count: u32,
    ) -> RecommendationOutcome {
        let request = RecommendationRequest {
            preferences: preferences.clone(),
            n: result_count,
        };
        info!(endpoint = %self.endpoint, n = result_count, "requesting recommendations");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                error!(endpoint = %self.endpoint, "recommendation request failed: {err}");
                RecommendError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ApiError>().await.ok();
            error!(status = status.as_u16(), "recommendation service returned an error status");
            return Err(RecommendError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await.map_err(RecommendError::Transport)?;
        let parsed: RecommendationResponse = serde_json::from_slice(&body).map_err(|err| {
            error!("recommendation payload did not match the expected shape: {err}");
            RecommendError::Shape(err.to_string())
        })?;

        info!(count = parsed.data.len(), "received recommendations");
        Ok(parsed.data)
    }
}

#[async_trait]
impl RecommendationService for RecommendationClient {
    async fn recommend(
        &self,
        preferences: &PreferenceInput,
        result_count: u32,
    ) -> RecommendationOutcome {
        self.submit(preferences, result_count).await
    }
}

fn recommend_endpoint(base_url: &str) -> Result<Url, RecommendError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?.join(RECOMMEND_PATH)?)
}

#[cfg(test)]
#[path = "tests/recommend_tests.rs"]
mod tests;
