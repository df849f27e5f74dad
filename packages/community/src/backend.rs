//! Review sources: the zanza backend over HTTP, and local snapshot files.

use std::path::PathBuf;

use zanza_community_models::AuthToken;
use zanza_config::BackendSettings;

use crate::wire::{self, ReviewSnapshot};
use crate::{CommunityError, ReviewSource};

/// Client for the backend's review and user collections.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    settings: BackendSettings,
}

impl BackendClient {
    #[must_use]
    pub const fn new(client: reqwest::Client, settings: BackendSettings) -> Self {
        Self { client, settings }
    }

    async fn get_collection(
        &self,
        url: &str,
        token: Option<&AuthToken>,
    ) -> Result<serde_json::Value, CommunityError> {
        log::debug!("Backend request: {url}");

        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        let resp = request.send().await?;
        if matches!(
            resp.status(),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
        ) {
            log::warn!("Backend rejected {url} with {}", resp.status());
            return Err(CommunityError::Unauthorized);
        }

        Ok(resp.error_for_status()?.json().await?)
    }
}

#[async_trait::async_trait]
impl ReviewSource for BackendClient {
    async fn fetch_reviews(
        &self,
        token: Option<&AuthToken>,
    ) -> Result<ReviewSnapshot, CommunityError> {
        let body = self
            .get_collection(&self.settings.reviews_url(), token)
            .await?;
        Ok(wire::parse_reviews(&body))
    }

    async fn count_users(&self, token: Option<&AuthToken>) -> Result<u64, CommunityError> {
        let body = self.get_collection(&self.settings.users_url(), token).await?;
        Ok(wire::count_records(&body))
    }
}

/// Reads reviews from a JSON file in the backend's record format.
///
/// Has no user collection; [`ReviewSource::count_users`] reports `0`.
#[derive(Debug, Clone)]
pub struct FileReviewSource {
    path: PathBuf,
}

impl FileReviewSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ReviewSource for FileReviewSource {
    async fn fetch_reviews(
        &self,
        _token: Option<&AuthToken>,
    ) -> Result<ReviewSnapshot, CommunityError> {
        log::debug!("Reading reviews from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;
        Ok(wire::parse_reviews(&body))
    }

    async fn count_users(&self, _token: Option<&AuthToken>) -> Result<u64, CommunityError> {
        Ok(0)
    }
}
