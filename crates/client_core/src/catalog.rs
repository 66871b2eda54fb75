use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::EventId,
    error::ApiError,
    protocol::{EventRaw, SearchParams, SearchResponse, VenueSearchResponse},
};
use tracing::debug;

use crate::error::CatalogError;

/// Search, event and venue lookups against the catalog proxy.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, CatalogError>;
    async fn get_event(&self, id: &EventId) -> Result<EventRaw, CatalogError>;
    async fn find_venue(&self, keyword: &str) -> Result<VenueSearchResponse, CatalogError>;
}

pub struct MissingCatalogApi;

#[async_trait]
impl CatalogApi for MissingCatalogApi {
    async fn search(&self, _params: &SearchParams) -> Result<SearchResponse, CatalogError> {
        Err(CatalogError::Unavailable("catalog client is not configured".into()))
    }

    async fn get_event(&self, _id: &EventId) -> Result<EventRaw, CatalogError> {
        Err(CatalogError::Unavailable("catalog client is not configured".into()))
    }

    async fn find_venue(&self, _keyword: &str) -> Result<VenueSearchResponse, CatalogError> {
        Err(CatalogError::Unavailable("catalog client is not configured".into()))
    }
}

pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}/api/search", self.base_url)
    }

    pub fn event_url(&self) -> String {
        format!("{}/api/event", self.base_url)
    }

    pub fn venue_url(&self) -> String {
        format!("{}/api/venue", self.base_url)
    }
}

/// Non-success bodies carry `{"error": ...}`; that text only goes to logs.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        let detail = match response.json::<ApiError>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        return Err(CatalogError::Status {
            status: status.as_u16(),
            detail,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| CatalogError::Decode(err.to_string()))
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, CatalogError> {
        debug!(keyword = %params.keyword, distance = %params.distance, "catalog: search");
        let response = self.http.get(self.search_url()).query(params).send().await?;
        read_json(response).await
    }

    async fn get_event(&self, id: &EventId) -> Result<EventRaw, CatalogError> {
        debug!(event_id = %id, "catalog: get event");
        let response = self
            .http
            .get(self.event_url())
            .query(&[("id", id.as_str())])
            .send()
            .await?;
        read_json(response).await
    }

    async fn find_venue(&self, keyword: &str) -> Result<VenueSearchResponse, CatalogError> {
        debug!(%keyword, "catalog: find venue");
        let response = self
            .http
            .get(self.venue_url())
            .query(&[("keyword", keyword)])
            .send()
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
