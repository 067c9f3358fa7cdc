use futures::future::BoxFuture;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::{
    config::ApiConfig,
    domain::{DashboardResponse, HealthResponse},
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response body is not valid status JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Anything that can produce one `/api/status` payload per call.
pub trait StatusSource: Send + Sync {
    fn fetch_status(&self) -> BoxFuture<'_, Result<DashboardResponse, FetchError>>;
}

#[derive(Clone)]
pub struct StatusClient {
    http: Client,
    config: ApiConfig,
}

impl StatusClient {
    pub fn new(http: Client, config: ApiConfig) -> Self {
        Self { http, config }
    }

    pub async fn status(&self) -> Result<DashboardResponse, FetchError> {
        let url = self.config.status_url()?;
        self.get_json(url).await
    }

    pub async fn health(&self) -> Result<HealthResponse, FetchError> {
        let url = self.config.health_url()?;
        self.get_json(url).await
    }

    // The server reports logical failures as JSON with a 5xx status, so the
    // body is decoded regardless of the HTTP status code.
    async fn get_json<T>(&self, url: Url) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(url.clone())
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let http_status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(
            target: "api",
            url = %url,
            status = http_status.as_u16(),
            bytes = body.len(),
            "response received"
        );
        Ok(serde_json::from_slice(&body)?)
    }
}

impl StatusSource for StatusClient {
    fn fetch_status(&self) -> BoxFuture<'_, Result<DashboardResponse, FetchError>> {
        Box::pin(self.status())
    }
}
