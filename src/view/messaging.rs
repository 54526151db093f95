//! Topic and subscription rows

use super::short_name;
use crate::gcp::pubsub::{parse_duration_secs, Subscription, Topic};
use serde::{Serialize, Serializer};
use std::fmt;

/// Retention Pub/Sub applies when a subscription does not set one (7 days)
pub const DEFAULT_RETENTION_SECS: u64 = 604_800;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DeliveryMode {
    Push,
    Pull,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Push => f.write_str("Push"),
            DeliveryMode::Pull => f.write_str("Pull"),
        }
    }
}

/// Subscription expiration: a TTL in seconds, or the literal `Never`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    Never,
    TtlSeconds(u64),
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiration::Never => f.write_str("Never"),
            Expiration::TtlSeconds(secs) => write!(f, "{}", secs),
        }
    }
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expiration::Never => serializer.serialize_str("Never"),
            Expiration::TtlSeconds(secs) => serializer.serialize_u64(*secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TopicRow {
    pub short_name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubscriptionRow {
    pub short_name: String,
    pub topic_short_name: String,
    pub delivery_mode: DeliveryMode,
    pub retention_seconds: u64,
    pub ordering_enabled: bool,
    pub exactly_once_enabled: bool,
    pub expiration: Expiration,
}

pub fn to_topic_rows(listing: &[Topic]) -> Vec<TopicRow> {
    listing
        .iter()
        .map(|topic| TopicRow {
            short_name: short_name(&topic.name).to_string(),
            full_name: topic.name.clone(),
        })
        .collect()
}

pub fn delivery_mode(subscription: &Subscription) -> DeliveryMode {
    if subscription.push_config.is_some() {
        DeliveryMode::Push
    } else {
        DeliveryMode::Pull
    }
}

pub fn retention_seconds(subscription: &Subscription) -> u64 {
    subscription
        .message_retention_duration
        .as_deref()
        .and_then(parse_duration_secs)
        .unwrap_or(DEFAULT_RETENTION_SECS)
}

pub fn expiration(subscription: &Subscription) -> Expiration {
    subscription
        .expiration_policy
        .as_ref()
        .and_then(|policy| policy.ttl.as_deref())
        .and_then(parse_duration_secs)
        .map(Expiration::TtlSeconds)
        .unwrap_or(Expiration::Never)
}

pub fn to_subscription_rows(listing: &[Subscription]) -> Vec<SubscriptionRow> {
    listing
        .iter()
        .map(|sub| SubscriptionRow {
            short_name: short_name(&sub.name).to_string(),
            topic_short_name: short_name(&sub.topic).to_string(),
            delivery_mode: delivery_mode(sub),
            retention_seconds: retention_seconds(sub),
            ordering_enabled: sub.enable_message_ordering,
            exactly_once_enabled: sub.enable_exactly_once_delivery,
            expiration: expiration(sub),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription(value: serde_json::Value) -> Subscription {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_topic_rows() {
        let topics = vec![
            Topic { name: "projects/p/topics/orders".into() },
            Topic { name: "bare".into() },
        ];
        let rows = to_topic_rows(&topics);
        assert_eq!(rows[0].short_name, "orders");
        assert_eq!(rows[0].full_name, "projects/p/topics/orders");
        assert_eq!(rows[1].short_name, "bare");
    }

    #[test]
    fn test_pull_subscription_defaults() {
        let rows = to_subscription_rows(&[subscription(json!({
            "name": "projects/p/subscriptions/orders-worker",
            "topic": "projects/p/topics/orders",
            "pushConfig": {}
        }))]);

        let row = &rows[0];
        assert_eq!(row.short_name, "orders-worker");
        assert_eq!(row.topic_short_name, "orders");
        assert_eq!(row.delivery_mode, DeliveryMode::Pull);
        assert_eq!(row.retention_seconds, 604_800);
        assert!(!row.ordering_enabled);
        assert!(!row.exactly_once_enabled);
        assert_eq!(row.expiration, Expiration::Never);
        assert_eq!(row.expiration.to_string(), "Never");
    }

    #[test]
    fn test_push_subscription_with_policy() {
        let rows = to_subscription_rows(&[subscription(json!({
            "name": "projects/p/subscriptions/hook",
            "topic": "projects/p/topics/orders",
            "pushConfig": {"pushEndpoint": "https://example.com/hook"},
            "messageRetentionDuration": "86400s",
            "enableMessageOrdering": true,
            "enableExactlyOnceDelivery": true,
            "expirationPolicy": {"ttl": "2678400s"}
        }))]);

        let row = &rows[0];
        assert_eq!(row.delivery_mode, DeliveryMode::Push);
        assert_eq!(row.retention_seconds, 86_400);
        assert!(row.ordering_enabled);
        assert!(row.exactly_once_enabled);
        assert_eq!(row.expiration, Expiration::TtlSeconds(2_678_400));
        assert_eq!(row.expiration.to_string(), "2678400");
    }

    #[test]
    fn test_empty_expiration_policy_never_expires() {
        let sub = subscription(json!({
            "name": "projects/p/subscriptions/s",
            "topic": "projects/p/topics/t",
            "expirationPolicy": {}
        }));
        assert_eq!(expiration(&sub), Expiration::Never);
    }

    #[test]
    fn test_expiration_serializes_sentinel() {
        assert_eq!(serde_json::to_value(Expiration::Never).unwrap(), json!("Never"));
        assert_eq!(serde_json::to_value(Expiration::TtlSeconds(60)).unwrap(), json!(60));
    }
}
