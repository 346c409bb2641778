//! REST implementation of the content-management API.
//!
//! Works against the standard JSON endpoints:
//! - `GET  /units/{unit_id}/outcomes`
//! - `GET  /units/{unit_id}/materials`
//! - `GET  /materials/{id}?includeLocalOutcomes=bool`
//! - `GET  /outcomes/{id}/capability-mappings`
//! - `POST /outcomes/{id}/capability-mappings`

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiError, UnitApi};
use crate::types::{MappingWrite, Material, Outcome, SavedMapping};

/// REST client for the content-management API.
pub struct RestUnitApi {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RestUnitApi {
    /// Create a new client for the given base URL.
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: trim_trailing_slash(base_url.into()),
            auth_token,
        }
    }

    /// Build authorization header if a token is set.
    fn auth_header(&self) -> Option<String> {
        self.auth_token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        debug!(url = %url, "GET");

        let mut request = self.client.get(&url);
        if let Some(auth) = self.auth_header() {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[async_trait]
impl UnitApi for RestUnitApi {
    async fn fetch_outcomes_by_unit(&self, unit_id: &str) -> Result<Vec<Outcome>, ApiError> {
        self.get_json(format!("{}/units/{}/outcomes", self.base_url, unit_id))
            .await
    }

    async fn fetch_materials_by_unit(&self, unit_id: &str) -> Result<Vec<Material>, ApiError> {
        self.get_json(format!("{}/units/{}/materials", self.base_url, unit_id))
            .await
    }

    async fn fetch_material_detail(
        &self,
        material_id: &str,
        include_local_outcomes: bool,
    ) -> Result<Material, ApiError> {
        self.get_json(format!(
            "{}/materials/{}?includeLocalOutcomes={}",
            self.base_url, material_id, include_local_outcomes
        ))
        .await
    }

    async fn fetch_capability_mappings(
        &self,
        outcome_id: &str,
    ) -> Result<Vec<SavedMapping>, ApiError> {
        self.get_json(format!(
            "{}/outcomes/{}/capability-mappings",
            self.base_url, outcome_id
        ))
        .await
    }

    async fn persist_capability_mappings(
        &self,
        outcome_id: &str,
        write: &MappingWrite,
    ) -> Result<(), ApiError> {
        let url = format!("{}/outcomes/{}/capability-mappings", self.base_url, outcome_id);
        debug!(url = %url, codes = write.capability_codes.len(), "POST");

        let mut request = self.client.post(&url).json(write);
        if let Some(auth) = self.auth_header() {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
