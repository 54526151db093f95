//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::error::ProviderResult;
use super::http::{GcpHttpClient, HttpTimeouts};
use crate::config::ApiEndpoints;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub project_id: String,
    pub endpoints: ApiEndpoints,
    pub timeouts: HttpTimeouts,
}

impl GcpClient {
    /// Create a new GCP client
    pub fn new(
        credentials: GcpCredentials,
        project_id: &str,
        endpoints: ApiEndpoints,
        timeouts: HttpTimeouts,
    ) -> ProviderResult<Self> {
        let http = GcpHttpClient::new(timeouts)?;

        Ok(Self {
            credentials,
            http,
            project_id: project_id.to_string(),
            endpoints,
            timeouts,
        })
    }

    /// Get the current access token
    pub async fn get_token(&self) -> ProviderResult<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> ProviderResult<T> {
        self.get_with_query(url, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let token = self.get_token().await?;
        self.http.get(url, &token, query).await
    }

    /// Fetch every page of a list call and decode the array found under `items_field`.
    ///
    /// Follows `nextPageToken` until the API stops returning one. A page without
    /// the field (Google omits empty arrays) contributes no items.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        url: &str,
        items_field: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = query.to_vec();
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let mut page: Value = self.get_with_query(url, &params).await?;

            if let Some(items) = page.get_mut(items_field).map(Value::take) {
                if !items.is_null() {
                    let items: Vec<T> = serde_json::from_value(items)?;
                    all_items.extend(items);
                }
            }

            page_token = page
                .get("nextPageToken")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());

            if page_token.is_none() {
                break;
            }
        }

        Ok(all_items)
    }

    // =========================================================================
    // BigQuery API helpers
    // =========================================================================

    /// Build BigQuery project-scoped URL
    pub fn bigquery_url(&self, project: &str, path: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.endpoints.bigquery,
            encode(project),
            path
        )
    }

    // =========================================================================
    // Pub/Sub API helpers
    // =========================================================================

    /// Build Pub/Sub URL for the configured project
    pub fn pubsub_url(&self, resource: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.endpoints.pubsub,
            encode(&self.project_id),
            resource
        )
    }

    // =========================================================================
    // GKE API helpers
    // =========================================================================

    /// Build GKE location URL (region or zone)
    pub fn container_location_url(&self, location: &str, resource: &str) -> String {
        format!(
            "{}/projects/{}/locations/{}/{}",
            self.endpoints.container,
            encode(&self.project_id),
            encode(location),
            resource
        )
    }

    // =========================================================================
    // Composer API helpers
    // =========================================================================

    /// Build Composer environments URL for an arbitrary project and location
    pub fn composer_environments_url(&self, project: &str, location: &str) -> String {
        format!(
            "{}/projects/{}/locations/{}/environments",
            self.endpoints.composer,
            encode(project),
            encode(location)
        )
    }

    // =========================================================================
    // Cloud Storage API helpers
    // =========================================================================

    /// Build Cloud Storage objects URL
    pub fn storage_objects_url(&self, bucket: &str) -> String {
        format!("{}/b/{}/o", self.endpoints.storage, encode(bucket))
    }
}

/// Percent-encode a single path segment
pub fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GcpClient {
        GcpClient::new(
            GcpCredentials::from_static_token("t"),
            "tflabs",
            ApiEndpoints::default(),
            HttpTimeouts::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_url_builders() {
        let client = client();
        assert_eq!(
            client.bigquery_url("p", "datasets"),
            "https://bigquery.googleapis.com/bigquery/v2/projects/p/datasets"
        );
        assert_eq!(
            client.pubsub_url("topics"),
            "https://pubsub.googleapis.com/v1/projects/tflabs/topics"
        );
        assert_eq!(
            client.container_location_url("us-central1-c", "clusters/cluster-1"),
            "https://container.googleapis.com/v1/projects/tflabs/locations/us-central1-c/clusters/cluster-1"
        );
        assert_eq!(
            client.composer_environments_url("p", "us-central1"),
            "https://composer.googleapis.com/v1/projects/p/locations/us-central1/environments"
        );
        assert_eq!(
            client.storage_objects_url("bucket"),
            "https://storage.googleapis.com/storage/v1/b/bucket/o"
        );
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let client = client();
        assert_eq!(
            client.bigquery_url("a/b", "datasets"),
            "https://bigquery.googleapis.com/bigquery/v2/projects/a%2Fb/datasets"
        );
    }
}
