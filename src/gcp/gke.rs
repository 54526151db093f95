//! GKE and Kubernetes
//!
//! The cluster is located through the GKE control-plane API, after which the
//! Kubernetes API server is queried directly with the same Google OAuth
//! token. Only the fields the dashboard reads are modelled.

use super::auth::GcpCredentials;
use super::client::{encode, GcpClient};
use super::error::{ProviderError, ProviderResult};
use super::http::GcpHttpClient;
use base64::Engine;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

// =============================================================================
// GKE control plane
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterAuth {
    /// Base64-encoded PEM bundle of the cluster CA
    pub cluster_ca_certificate: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cluster {
    pub name: String,
    pub endpoint: String,
    pub status: Option<String>,
    pub master_auth: MasterAuth,
}

/// Describe a GKE cluster
pub async fn get_cluster(client: &GcpClient, location: &str, cluster: &str) -> ProviderResult<Cluster> {
    let url = client.container_location_url(location, &format!("clusters/{}", encode(cluster)));
    client.get(&url).await
}

// =============================================================================
// Kubernetes objects
// =============================================================================

/// Label key/value pairs in the order the API server returned them.
///
/// Selector strings are compared verbatim, so the order must survive
/// deserialization rather than depend on a map's iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(pub Vec<(String, String)>);

impl Labels {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LabelsVisitor;

        impl<'de> Visitor<'de> for LabelsVisitor {
            type Value = Labels;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of label keys to values")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Labels, E> {
                Ok(Labels::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Labels, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    pairs.push((key, value));
                }
                Ok(Labels(pairs))
            }
        }

        deserializer.deserialize_any(LabelsVisitor)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: Option<String>,
    /// RFC 3339 timestamp
    pub creation_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelector {
    pub match_labels: Labels,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodSpec {
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodTemplateSpec {
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeploymentSpec {
    pub replicas: Option<i32>,
    pub selector: LabelSelector,
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStatus {
    pub name: String,
    pub ready: bool,
    pub restart_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodStatus {
    pub phase: Option<String>,
    pub container_statuses: Option<Vec<ContainerStatus>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pod {
    pub metadata: ObjectMeta,
    pub status: PodStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Deserialize)]
struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

// =============================================================================
// Kubernetes API client
// =============================================================================

/// Read-only client for one cluster's Kubernetes API server
#[derive(Clone)]
pub struct KubeClient {
    http: GcpHttpClient,
    credentials: GcpCredentials,
    base_url: String,
}

impl KubeClient {
    /// Locate the cluster through GKE and trust its CA
    pub async fn connect(client: &GcpClient, location: &str, cluster: &str) -> ProviderResult<Self> {
        let cluster = get_cluster(client, location, cluster).await?;

        if cluster.endpoint.is_empty() {
            return Err(ProviderError::Config(format!(
                "Cluster {} has no endpoint (status: {})",
                cluster.name,
                cluster.status.as_deref().unwrap_or("UNKNOWN")
            )));
        }

        let http = match cluster.master_auth.cluster_ca_certificate.as_deref() {
            Some(ca) if !ca.is_empty() => {
                let pem = base64::engine::general_purpose::STANDARD
                    .decode(ca)
                    .map_err(|e| ProviderError::Config(format!("Invalid cluster CA: {}", e)))?;
                GcpHttpClient::with_root_certificate(client.timeouts, &pem)?
            }
            _ => client.http.clone(),
        };

        tracing::debug!("Connected to cluster {} at {}", cluster.name, cluster.endpoint);

        Ok(Self {
            http,
            credentials: client.credentials.clone(),
            base_url: format!("https://{}", cluster.endpoint),
        })
    }

    /// Talk to an explicit API server URL (e.g. `kubectl proxy`)
    pub fn with_endpoint(client: &GcpClient, endpoint: &str) -> Self {
        Self {
            http: client.http.clone(),
            credentials: client.credentials.clone(),
            base_url: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let token = self.credentials.get_token().await?;
        let url = format!("{}{}", self.base_url, path);
        self.http.get(&url, &token, query).await
    }

    pub async fn list_deployments(&self, namespace: &str) -> ProviderResult<Vec<Deployment>> {
        let path = format!("/apis/apps/v1/namespaces/{}/deployments", encode(namespace));
        let list: ObjectList<Deployment> = self.get(&path, &[]).await?;
        Ok(list.items)
    }

    /// Read one deployment; a missing deployment is [`ProviderError::NotFound`]
    pub async fn read_deployment(&self, namespace: &str, name: &str) -> ProviderResult<Deployment> {
        let path = format!(
            "/apis/apps/v1/namespaces/{}/deployments/{}",
            encode(namespace),
            encode(name)
        );
        self.get(&path, &[]).await
    }

    /// List pods matching a `key=value,...` selector; an empty selector matches all
    pub async fn list_pods(&self, namespace: &str, label_selector: &str) -> ProviderResult<Vec<Pod>> {
        let path = format!("/api/v1/namespaces/{}/pods", encode(namespace));
        let selector_param = [("labelSelector", label_selector)];
        let query: &[(&str, &str)] = if label_selector.is_empty() {
            &[]
        } else {
            &selector_param
        };
        let list: ObjectList<Pod> = self.get(&path, query).await?;
        Ok(list.items)
    }

    pub async fn list_namespaces(&self) -> ProviderResult<Vec<Namespace>> {
        let list: ObjectList<Namespace> = self.get("/api/v1/namespaces", &[]).await?;
        Ok(list.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labels_keep_document_order() {
        let selector: LabelSelector = serde_json::from_str(
            r#"{"matchLabels": {"tier": "web", "app": "shop", "env": "prod"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = selector.match_labels.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["tier", "app", "env"]);
    }

    #[test]
    fn test_null_labels_are_empty() {
        let selector: LabelSelector = serde_json::from_str(r#"{"matchLabels": null}"#).unwrap();
        assert!(selector.match_labels.is_empty());
    }

    #[test]
    fn test_deployment_fixture_deserializes() {
        let deployment: Deployment = serde_json::from_value(json!({
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {
                "replicas": 2,
                "selector": {"matchLabels": {"app": "web"}},
                "template": {"spec": {"containers": [
                    {"name": "web", "image": "gcr.io/p/web:1.2.3"},
                    {"name": "sidecar", "image": "envoy:1.29"}
                ]}}
            }
        }))
        .unwrap();
        assert_eq!(deployment.metadata.name, "web");
        assert_eq!(deployment.spec.template.spec.containers.len(), 2);
        assert_eq!(deployment.spec.replicas, Some(2));
    }

    #[test]
    fn test_pending_pod_without_statuses() {
        let pod: Pod = serde_json::from_value(json!({
            "metadata": {"name": "web-abc", "creationTimestamp": "2024-05-01T10:00:00Z"},
            "status": {"phase": "Pending"}
        }))
        .unwrap();
        assert_eq!(pod.status.phase.as_deref(), Some("Pending"));
        assert!(pod.status.container_statuses.is_none());
    }
}
