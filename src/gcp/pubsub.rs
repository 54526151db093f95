//! Pub/Sub topics and subscriptions

use super::client::GcpClient;
use super::error::ProviderResult;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Topic {
    /// Full resource name, `projects/{project}/topics/{topic}`
    pub name: String,
}

/// Push delivery settings.
///
/// Kept as the raw object: only its presence matters to the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushConfig(pub Map<String, Value>);

impl PushConfig {
    pub fn endpoint(&self) -> Option<&str> {
        self.0.get("pushEndpoint").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExpirationPolicy {
    /// Duration string such as `"2678400s"`; absent means never expires
    pub ttl: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscription {
    pub name: String,
    pub topic: String,
    #[serde(deserialize_with = "non_empty_push_config")]
    pub push_config: Option<PushConfig>,
    pub message_retention_duration: Option<String>,
    pub enable_message_ordering: bool,
    pub enable_exactly_once_delivery: bool,
    pub expiration_policy: Option<ExpirationPolicy>,
}

/// The REST API renders an unset message field as `{}`; treat that as absent.
fn non_empty_push_config<'de, D>(deserializer: D) -> Result<Option<PushConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|m| !m.is_empty()).map(PushConfig))
}

/// Parse a protobuf JSON duration (`"604800s"`, `"1.5s"`) into whole seconds
pub fn parse_duration_secs(duration: &str) -> Option<u64> {
    let secs = duration.trim().strip_suffix('s')?;
    let whole = secs.split('.').next()?;
    whole.parse().ok()
}

/// List topics in the client's project
pub async fn list_topics(client: &GcpClient) -> ProviderResult<Vec<Topic>> {
    let url = client.pubsub_url("topics");
    client.list_all(&url, "topics", &[]).await
}

/// List subscriptions in the client's project
pub async fn list_subscriptions(client: &GcpClient) -> ProviderResult<Vec<Subscription>> {
    let url = client.pubsub_url("subscriptions");
    client.list_all(&url, "subscriptions", &[]).await
}
