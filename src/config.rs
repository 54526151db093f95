//! Configuration Management
//!
//! Settings are resolved as defaults < config file < environment variables,
//! and `main` applies command line overrides last. The resolved [`Config`] is
//! handed to the web layer explicitly; handlers never read process state.

use crate::gcp::http::HttpTimeouts;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_GKE_CLUSTER: &str = "cluster-1";
pub const DEFAULT_GKE_ZONE: &str = "us-central1-c";
pub const DEFAULT_GKE_NAMESPACE: &str = "kube-system";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

/// Base URLs of the Google APIs the dashboard reads from.
///
/// Overridable so the client can be pointed at emulators or mock servers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiEndpoints {
    pub bigquery: String,
    pub pubsub: String,
    pub container: String,
    pub composer: String,
    pub storage: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            bigquery: "https://bigquery.googleapis.com/bigquery/v2".to_string(),
            pubsub: "https://pubsub.googleapis.com/v1".to_string(),
            container: "https://container.googleapis.com/v1".to_string(),
            composer: "https://composer.googleapis.com/v1".to_string(),
            storage: "https://storage.googleapis.com/storage/v1".to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Point every API at the same base URL (used with a single mock server)
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            bigquery: format!("{}/bigquery/v2", base),
            pubsub: format!("{}/pubsub/v1", base),
            container: format!("{}/container/v1", base),
            composer: format!("{}/composer/v1", base),
            storage: format!("{}/storage/v1", base),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Project whose datasets, topics and subscriptions are listed
    pub project_id: Option<String>,
    pub gke_cluster: String,
    pub gke_zone: Option<String>,
    /// Namespace used when a GKE route carries no `?namespace=`
    pub gke_namespace: String,
    pub composer_project_id: Option<String>,
    pub composer_location: Option<String>,
    pub bind_address: String,
    /// Per provider call
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Whole inbound request, enforced by the server
    pub handler_timeout_secs: u64,
    /// Talk to this Kubernetes API server instead of discovering the GKE endpoint
    pub kube_api_endpoint: Option<String>,
    pub api_endpoints: ApiEndpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            gke_cluster: DEFAULT_GKE_CLUSTER.to_string(),
            gke_zone: None,
            gke_namespace: DEFAULT_GKE_NAMESPACE.to_string(),
            composer_project_id: None,
            composer_location: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            handler_timeout_secs: 120,
            kube_api_endpoint: None,
            api_endpoints: ApiEndpoints::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcpstatus").join("config.json"))
    }

    /// Load the config file (if any) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        for (key, secs) in [
            ("request_timeout_secs", config.request_timeout_secs),
            ("connect_timeout_secs", config.connect_timeout_secs),
            ("handler_timeout_secs", config.handler_timeout_secs),
        ] {
            ensure!(secs > 0, "{} in {} must be at least 1 second", key, path.display());
        }

        Ok(config)
    }

    /// Overlay values from environment variables, read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("GOOGLE_CLOUD_PROJECT") {
            self.project_id = Some(v);
        }
        if let Some(v) = non_empty("GKE_CLUSTER") {
            self.gke_cluster = v;
        }
        if let Some(v) = non_empty("GKE_ZONE") {
            self.gke_zone = Some(v);
        }
        if let Some(v) = non_empty("GKE_NAMESPACE") {
            self.gke_namespace = v;
        }
        if let Some(v) = non_empty("GCP_PROJECT_ID") {
            self.composer_project_id = Some(v);
        }
        if let Some(v) = non_empty("GCP_LOCATION") {
            self.composer_location = Some(v);
        }
        if let Some(v) = non_empty("GCPSTATUS_BIND") {
            self.bind_address = v;
        }
        if let Some(v) = non_empty("GCPSTATUS_KUBE_API_ENDPOINT") {
            self.kube_api_endpoint = Some(v);
        }
        if let Some(v) = non_empty("GCPSTATUS_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_secs("GCPSTATUS_REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = non_empty("GCPSTATUS_CONNECT_TIMEOUT_SECS") {
            self.connect_timeout_secs = parse_secs("GCPSTATUS_CONNECT_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = non_empty("GCPSTATUS_HANDLER_TIMEOUT_SECS") {
            self.handler_timeout_secs = parse_secs("GCPSTATUS_HANDLER_TIMEOUT_SECS", &v)?;
        }

        Ok(())
    }

    /// Get effective project (config > gcloud default)
    pub fn effective_project(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(crate::gcp::auth::get_default_project)
    }

    /// Get effective zone (config > gcloud default > built-in default)
    pub fn effective_zone(&self) -> String {
        self.gke_zone
            .clone()
            .or_else(crate::gcp::auth::get_default_zone)
            .unwrap_or_else(|| DEFAULT_GKE_ZONE.to_string())
    }

    /// Composer project and location, if both are configured
    pub fn composer_target(&self) -> Option<(&str, &str)> {
        match (&self.composer_project_id, &self.composer_location) {
            (Some(project), Some(location)) => Some((project.as_str(), location.as_str())),
            _ => None,
        }
    }

    pub fn http_timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            request: Duration::from_secs(self.request_timeout_secs),
            connect: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, value))?;
    ensure!(secs > 0, "{} must be at least 1 second", key);
    Ok(secs)
}
