use std::env;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::ApiError;

mod course_repo;
mod dto;
mod mapping;
mod progress_repo;
mod test_repo;

/// Connection settings for the remote API.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    /// Bearer token. `None` is tolerated: requests go out unauthenticated and
    /// the server answers with 401/403, which maps into `ApiError`.
    pub token: Option<String>,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Read `BRAINBOOST_API_BASE_URL` and `BRAINBOOST_API_TOKEN` from the
    /// environment. Falls back to a localhost base URL.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("BRAINBOOST_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());
        let token = env::var("BRAINBOOST_API_TOKEN").ok();
        Self::new(base_url, token)
    }
}

/// reqwest-backed client implementing the repository traits against the
/// remote REST API.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    config: RestConfig,
}

impl RestClient {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(RestConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorize(self.http.get(self.url(path)));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authorize(self.http.post(self.url(path)).json(body));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Self::decode(response).await
    }

    /// POST where the response body is irrelevant (progress write-back).
    pub(crate) async fn post_ignored<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.authorize(self.http.post(self.url(path)).json(body));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), body))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
