//! Cloud Composer environments

use super::client::{encode, GcpClient};
use super::error::ProviderResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SoftwareConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_version: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env_variables: BTreeMap<String, String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Environment configuration.
///
/// Unmodelled fields are retained so the whole blob can be displayed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentConfig {
    /// `gs://bucket/dags` location of the DAG files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dag_gcs_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_config: Option<SoftwareConfig>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    /// `projects/{project}/locations/{location}/environments/{name}`
    pub name: String,
    pub state: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub config: Option<EnvironmentConfig>,
}

/// List Composer environments in a project and location
pub async fn list_environments(
    client: &GcpClient,
    project: &str,
    location: &str,
) -> ProviderResult<Vec<Environment>> {
    let url = client.composer_environments_url(project, location);
    client.list_all(&url, "environments", &[]).await
}

/// Fetch one environment by short name
pub async fn get_environment(
    client: &GcpClient,
    project: &str,
    location: &str,
    environment: &str,
) -> ProviderResult<Environment> {
    let url = format!(
        "{}/{}",
        client.composer_environments_url(project, location),
        encode(environment)
    );
    client.get(&url).await
}
