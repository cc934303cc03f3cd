//! HTTP client for the fleet API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::filter::ReleaseFilter;

use super::{validate_hashes, ReleaseSource, SourceError, TitlesPage, TorrentAction, TorrentActions};

const API_KEY_HEADER: &str = "X-API-Key";

/// Fleet API client implementing both [`ReleaseSource`] and [`TorrentActions`].
pub struct FleetClient {
    client: Client,
    config: UpstreamConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkActionBody<'a> {
    hashes: &'a [String],
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

impl<'a> BulkActionBody<'a> {
    fn new(hashes: &'a [String], action: &'a TorrentAction) -> Self {
        let (delete_files, category) = match action {
            TorrentAction::Delete { delete_files } => (Some(*delete_files), None),
            TorrentAction::SetCategory { category } => (None, Some(category.as_str())),
            _ => (None, None),
        };
        Self {
            hashes,
            action: action.as_str(),
            delete_files,
            category,
        }
    }
}

fn map_request_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_connect() {
        SourceError::ConnectionFailed(e.to_string())
    } else {
        SourceError::ApiError(e.to_string())
    }
}

impl FleetClient {
    /// Create a new fleet client.
    pub fn new(config: UpstreamConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SourceError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn instance_url(&self, instance_id: &str, endpoint: &str) -> String {
        format!(
            "{}/api/instances/{}/torrents/{}",
            self.base_url(),
            urlencoding::encode(instance_id),
            endpoint
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn check_status(response: Response) -> Result<Response, SourceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SourceError::ApiError(format!(
            "HTTP {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        )))
    }
}

#[async_trait]
impl ReleaseSource for FleetClient {
    fn name(&self) -> &str {
        "fleet"
    }

    async fn fetch_titles(
        &self,
        instance_id: &str,
        filter: &ReleaseFilter,
    ) -> Result<TitlesPage, SourceError> {
        let url = self.instance_url(instance_id, "titles");
        let request = self
            .client
            .get(&url)
            .query(&filter.query_pairs());

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(map_request_error)?;
        let response = Self::check_status(response).await?;

        let mut page: TitlesPage = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;
        page.total = page.total.max(page.titles.len());

        debug!(
            instance = instance_id,
            titles = page.titles.len(),
            total = page.total,
            "Fetched titles"
        );
        Ok(page)
    }
}

#[async_trait]
impl TorrentActions for FleetClient {
    fn name(&self) -> &str {
        "fleet"
    }

    async fn apply(
        &self,
        instance_id: &str,
        hashes: &[String],
        action: &TorrentAction,
    ) -> Result<(), SourceError> {
        let hashes = validate_hashes(hashes)?;
        let url = self.instance_url(instance_id, "bulk-action");
        let body = BulkActionBody::new(&hashes, action);

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(map_request_error)?;

        if let Err(e) = Self::check_status(response).await {
            warn!(
                instance = instance_id,
                action = action.as_str(),
                count = hashes.len(),
                error = %e,
                "Bulk action rejected"
            );
            return Err(e);
        }

        debug!(
            instance = instance_id,
            action = action.as_str(),
            count = hashes.len(),
            "Applied bulk action"
        );
        Ok(())
    }
}
