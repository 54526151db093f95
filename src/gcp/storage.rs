//! Cloud Storage object listing

use super::client::GcpClient;
use super::error::{ProviderError, ProviderResult};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Object {
    pub name: String,
}

/// Split `gs://bucket/some/prefix` into `("bucket", "some/prefix")`
pub fn parse_gcs_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("gs://")?;
    let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return None;
    }
    Some((bucket, prefix))
}

/// List objects in a bucket under a prefix
pub async fn list_objects(client: &GcpClient, bucket: &str, prefix: &str) -> ProviderResult<Vec<Object>> {
    let url = client.storage_objects_url(bucket);
    let query: Vec<(&str, &str)> = if prefix.is_empty() {
        Vec::new()
    } else {
        vec![("prefix", prefix)]
    };
    client.list_all(&url, "items", &query).await
}

/// File names of the Python DAG definitions stored under `dag_gcs_prefix`
pub async fn list_dag_files(client: &GcpClient, dag_gcs_prefix: &str) -> ProviderResult<Vec<String>> {
    let (bucket, prefix) = parse_gcs_uri(dag_gcs_prefix).ok_or_else(|| {
        ProviderError::Config(format!("Not a gs:// location: {}", dag_gcs_prefix))
    })?;

    let objects = list_objects(client, bucket, prefix).await?;
    Ok(dag_file_names(&objects))
}

/// Keep `.py` objects and reduce each to its final path segment
pub fn dag_file_names(objects: &[Object]) -> Vec<String> {
    objects
        .iter()
        .filter(|o| o.name.ends_with(".py"))
        .filter_map(|o| o.name.rsplit('/').next())
        .map(str::to_string)
        .collect()
}
