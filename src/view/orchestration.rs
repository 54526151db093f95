//! Deployment, pod and container rows
//!
//! A deployment's health is approximated from the pods its `matchLabels`
//! selector picks up at request time: at least one `Running` pod means UP.
//! Deployments scaled to zero therefore report DOWN.

use crate::gcp::gke::{Deployment, DeploymentSpec, Namespace, Pod};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const RUNNING_PHASE: &str = "Running";
const UNKNOWN_PHASE: &str = "Unknown";

/// Pods keyed by the exact selector string they were listed with
pub type PodIndex = HashMap<String, Vec<Pod>>;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DeploymentStatus {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Up => f.write_str("UP"),
            DeploymentStatus::Down => f.write_str("DOWN"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeploymentRow {
    pub name: String,
    pub running_pod_count: usize,
    pub status: DeploymentStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PodRow {
    pub name: String,
    pub phase: String,
    /// `ready/total` containers
    pub ready_ratio: String,
    pub restart_count: u32,
    pub age: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContainerRow {
    pub name: String,
    pub image: String,
    /// Same as `image`; digests are not resolved
    pub image_id: String,
}

/// `key=value` pairs of `spec.selector.matchLabels`, comma-joined in API order
pub fn label_selector(deployment: &Deployment) -> String {
    deployment
        .spec
        .selector
        .match_labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn count_running(pods: &[Pod]) -> usize {
    pods.iter()
        .filter(|pod| pod.status.phase.as_deref() == Some(RUNNING_PHASE))
        .count()
}

pub fn to_deployment_rows(deployments: &[Deployment], pod_index: &PodIndex) -> Vec<DeploymentRow> {
    deployments
        .iter()
        .map(|deployment| {
            let running = pod_index
                .get(&label_selector(deployment))
                .map(|pods| count_running(pods))
                .unwrap_or(0);

            DeploymentRow {
                name: deployment.metadata.name.clone(),
                running_pod_count: running,
                status: if running > 0 {
                    DeploymentStatus::Up
                } else {
                    DeploymentStatus::Down
                },
            }
        })
        .collect()
}

pub fn to_pod_rows(pods: &[Pod]) -> Vec<PodRow> {
    pods.iter()
        .map(|pod| {
            let statuses = pod.status.container_statuses.as_deref().unwrap_or(&[]);
            let ready = statuses.iter().filter(|c| c.ready).count();

            PodRow {
                name: pod.metadata.name.clone(),
                phase: pod
                    .status
                    .phase
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_PHASE.to_string()),
                ready_ratio: format!("{}/{}", ready, statuses.len()),
                restart_count: statuses.iter().map(|c| c.restart_count).sum(),
                age: pod.metadata.creation_timestamp.clone().unwrap_or_default(),
            }
        })
        .collect()
}

pub fn to_container_rows(spec: &DeploymentSpec) -> Vec<ContainerRow> {
    spec.template
        .spec
        .containers
        .iter()
        .map(|container| {
            let image = container.image.clone().unwrap_or_default();
            ContainerRow {
                name: container.name.clone(),
                image_id: image.clone(),
                image,
            }
        })
        .collect()
}

pub fn to_namespace_names(namespaces: &[Namespace]) -> Vec<String> {
    namespaces.iter().map(|ns| ns.metadata.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deployment(name: &str, labels: serde_json::Value) -> Deployment {
        serde_json::from_value(json!({
            "metadata": {"name": name},
            "spec": {"selector": {"matchLabels": labels}}
        }))
        .unwrap()
    }

    fn pod(name: &str, phase: &str) -> Pod {
        serde_json::from_value(json!({
            "metadata": {"name": name},
            "status": {"phase": phase}
        }))
        .unwrap()
    }

    #[test]
    fn test_label_selector_keeps_api_order() {
        let d: Deployment = serde_json::from_str(
            r#"{"metadata":{"name":"web"},"spec":{"selector":{"matchLabels":{"tier":"frontend","app":"web"}}}}"#,
        )
        .unwrap();
        assert_eq!(label_selector(&d), "tier=frontend,app=web");
    }

    #[test]
    fn test_deployment_status_from_running_pods() {
        let deployments = vec![
            deployment("web", json!({"app": "web"})),
            deployment("worker", json!({"app": "worker"})),
            deployment("idle", json!({"app": "idle"})),
        ];

        let mut index = PodIndex::new();
        index.insert(
            "app=web".into(),
            vec![pod("web-1", "Running"), pod("web-2", "Running"), pod("web-3", "Pending")],
        );
        index.insert("app=worker".into(), vec![pod("worker-1", "Failed")]);

        let rows = to_deployment_rows(&deployments, &index);
        assert_eq!(rows[0].running_pod_count, 2);
        assert_eq!(rows[0].status, DeploymentStatus::Up);
        assert_eq!(rows[1].running_pod_count, 0);
        assert_eq!(rows[1].status, DeploymentStatus::Down);
        assert_eq!(rows[2].status, DeploymentStatus::Down);
        assert_eq!(rows[2].status.to_string(), "DOWN");
    }

    #[test]
    fn test_reordered_selector_does_not_match() {
        let deployments = vec![deployment("web", json!({"tier": "frontend", "app": "web"}))];
        let mut index = PodIndex::new();
        index.insert("app=web,tier=frontend".into(), vec![pod("web-1", "Running")]);

        let rows = to_deployment_rows(&deployments, &index);
        assert_eq!(rows[0].status, DeploymentStatus::Down);
    }

    #[test]
    fn test_pod_rows() {
        let pods: Vec<Pod> = serde_json::from_value(json!([
            {
                "metadata": {"name": "web-1", "creationTimestamp": "2024-05-01T10:00:00Z"},
                "status": {
                    "phase": "Running",
                    "containerStatuses": [
                        {"name": "a", "ready": true, "restartCount": 1},
                        {"name": "b", "ready": true, "restartCount": 0},
                        {"name": "c", "ready": false, "restartCount": 4}
                    ]
                }
            },
            {"metadata": {"name": "web-2"}, "status": {"phase": "Pending"}},
            {"metadata": {"name": "web-3"}}
        ]))
        .unwrap();

        let rows = to_pod_rows(&pods);
        assert_eq!(rows[0].ready_ratio, "2/3");
        assert_eq!(rows[0].restart_count, 5);
        assert_eq!(rows[0].age, "2024-05-01T10:00:00Z");
        assert_eq!(rows[1].ready_ratio, "0/0");
        assert_eq!(rows[1].restart_count, 0);
        assert_eq!(rows[1].age, "");
        assert_eq!(rows[2].phase, "Unknown");
    }

    #[test]
    fn test_container_rows_duplicate_image() {
        let d: Deployment = serde_json::from_value(json!({
            "metadata": {"name": "web"},
            "spec": {"template": {"spec": {"containers": [
                {"name": "web", "image": "gcr.io/p/web:1.2.3"},
                {"name": "no-image"}
            ]}}}
        }))
        .unwrap();

        let rows = to_container_rows(&d.spec);
        assert_eq!(rows[0].image, "gcr.io/p/web:1.2.3");
        assert_eq!(rows[0].image_id, rows[0].image);
        assert_eq!(rows[1].image, "");
    }
}
