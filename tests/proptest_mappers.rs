//! Property-based tests for the record-to-row mappers
//!
//! Provider records are generated as Google/Kubernetes JSON and fed through
//! the same deserializers the clients use.

use gcpstatus::gcp::gke::{Deployment, Pod};
use gcpstatus::gcp::pubsub::{parse_duration_secs, Subscription};
use gcpstatus::view::messaging::{self, DeliveryMode, Expiration, DEFAULT_RETENTION_SECS};
use gcpstatus::view::orchestration::{self, DeploymentStatus, PodIndex};
use gcpstatus::view::{format_gb, group_thousands, short_name};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,30}"
}

fn arb_phase() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("Running"),
        Just("Pending"),
        Just("Succeeded"),
        Just("Failed"),
        Just("Unknown"),
    ]
}

fn pod(name: &str, phase: &str) -> Value {
    json!({"metadata": {"name": name}, "status": {"phase": phase}})
}

fn subscription(push_endpoint: Option<&str>, retention: Option<u64>) -> Subscription {
    let mut value = json!({
        "name": "projects/p/subscriptions/s",
        "topic": "projects/p/topics/t",
    });
    if let Some(endpoint) = push_endpoint {
        value["pushConfig"] = json!({"pushEndpoint": endpoint});
    }
    if let Some(secs) = retention {
        value["messageRetentionDuration"] = json!(format!("{secs}s"));
    }
    serde_json::from_value(value).unwrap()
}

proptest! {
    #[test]
    fn short_name_is_last_segment(segments in prop::collection::vec(arb_segment(), 1..6)) {
        let full = segments.join("/");
        prop_assert_eq!(short_name(&full), segments.last().unwrap().as_str());
    }

    #[test]
    fn short_name_without_slash_is_identity(name in arb_segment()) {
        prop_assert_eq!(short_name(&name), name.as_str());
    }

    #[test]
    fn group_thousands_round_trips_digits(n in any::<u64>()) {
        let grouped = group_thousands(n);
        prop_assert_eq!(grouped.replace(',', ""), n.to_string());
        for group in grouped.split(',').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
    }

    #[test]
    fn format_gb_has_two_decimals(bytes in 0u64..1u64 << 50) {
        let formatted = format_gb(bytes);
        let (_, decimals) = formatted.split_once('.').unwrap();
        prop_assert_eq!(decimals.len(), 2);
    }

    #[test]
    fn duration_seconds_are_parsed(secs in 0u64..10_000_000, nanos in 0u32..1_000_000_000) {
        prop_assert_eq!(parse_duration_secs(&format!("{secs}s")), Some(secs));
        prop_assert_eq!(parse_duration_secs(&format!("{secs}.{nanos:09}s")), Some(secs));
    }

    #[test]
    fn delivery_mode_follows_push_endpoint(host in "[a-z]{1,12}", push in any::<bool>()) {
        let endpoint = format!("https://{host}.example.com/push");
        let sub = subscription(push.then_some(endpoint.as_str()), None);
        let expected = if push { DeliveryMode::Push } else { DeliveryMode::Pull };
        prop_assert_eq!(messaging::delivery_mode(&sub), expected);
    }

    #[test]
    fn retention_defaults_to_seven_days(retention in prop::option::of(1u64..10_000_000)) {
        let sub = subscription(None, retention);
        prop_assert_eq!(
            messaging::retention_seconds(&sub),
            retention.unwrap_or(DEFAULT_RETENTION_SECS)
        );
        prop_assert_eq!(messaging::expiration(&sub), Expiration::Never);
    }

    #[test]
    fn deployment_is_up_iff_a_pod_runs(phases in prop::collection::vec(arb_phase(), 0..12)) {
        let deployment: Deployment = serde_json::from_value(json!({
            "metadata": {"name": "web"},
            "spec": {"selector": {"matchLabels": {"app": "web"}}}
        }))
        .unwrap();

        let pods: Vec<Pod> = phases
            .iter()
            .enumerate()
            .map(|(i, phase)| serde_json::from_value(pod(&format!("web-{i}"), phase)).unwrap())
            .collect();
        let running = phases.iter().filter(|p| **p == "Running").count();

        let mut index = PodIndex::new();
        index.insert(orchestration::label_selector(&deployment), pods);

        let rows = orchestration::to_deployment_rows(&[deployment], &index);
        prop_assert_eq!(rows[0].running_pod_count, running);
        let expected = if running > 0 { DeploymentStatus::Up } else { DeploymentStatus::Down };
        prop_assert_eq!(rows[0].status, expected);
    }

    #[test]
    fn label_selector_preserves_order(keys in prop::collection::btree_set("[a-z]{1,8}", 1..5)) {
        let keys: Vec<String> = keys.into_iter().rev().collect();
        let labels: String = keys
            .iter()
            .map(|k| format!("\"{k}\": \"v-{k}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let raw = format!(
            r#"{{"metadata": {{"name": "d"}}, "spec": {{"selector": {{"matchLabels": {{{labels}}}}}}}}}"#
        );
        let deployment: Deployment = serde_json::from_str(&raw).unwrap();

        let expected: Vec<String> = keys.iter().map(|k| format!("{k}=v-{k}")).collect();
        prop_assert_eq!(orchestration::label_selector(&deployment), expected.join(","));
    }
}
