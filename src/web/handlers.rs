//! Route handlers
//!
//! Each handler performs its provider calls sequentially, maps the records
//! and renders. Nothing is cached between requests.

use super::error::{AppError, JsonError};
use super::render;
use super::AppState;
use crate::config::DEFAULT_GKE_ZONE;
use crate::gcp::error::{ProviderError, ProviderResult};
use crate::gcp::gke::{Deployment, KubeClient};
use crate::gcp::{bigquery, composer, pubsub, storage};
use crate::view::orchestration::{self, PodIndex};
use crate::view::{catalog, environment, messaging};
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct NamespaceQuery {
    pub namespace: Option<String>,
}

impl NamespaceQuery {
    fn resolve(self, state: &AppState) -> String {
        self.namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| state.config.gke_namespace.clone())
    }
}

async fn kube_client(state: &AppState) -> ProviderResult<KubeClient> {
    if let Some(endpoint) = state.config.kube_api_endpoint.as_deref() {
        return Ok(KubeClient::with_endpoint(&state.gcp, endpoint));
    }

    let zone = state.config.gke_zone.as_deref().unwrap_or(DEFAULT_GKE_ZONE);
    KubeClient::connect(&state.gcp, zone, &state.config.gke_cluster).await
}

/// Read a deployment, turning a missing one into a 404
async fn read_deployment(kube: &KubeClient, namespace: &str, name: &str) -> Result<Deployment, AppError> {
    match kube.read_deployment(namespace, name).await {
        Ok(deployment) => Ok(deployment),
        Err(ProviderError::NotFound(_)) => Err(AppError::NotFound(format!(
            "Deployment {} not found in namespace {}",
            name, namespace
        ))),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// BigQuery
// =============================================================================

pub async fn list_datasets(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let listing = bigquery::list_datasets(&state.gcp, &state.gcp.project_id).await?;
    tracing::debug!("Listed {} datasets", listing.len());
    Ok(Html(render::datasets_page(&catalog::to_dataset_rows(&listing))))
}

pub async fn list_tables(
    State(state): State<AppState>,
    Path((project, dataset_id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let listing = bigquery::list_tables(&state.gcp, &project, &dataset_id).await?;

    let mut tables = Vec::with_capacity(listing.len());
    for entry in &listing {
        let table_id = &entry.table_reference.table_id;
        tables.push(bigquery::get_table(&state.gcp, &project, &dataset_id, table_id).await?);
    }

    let rows = catalog::to_table_rows(&project, &dataset_id, &tables);
    Ok(Html(render::tables_page(&dataset_id, &rows)))
}

pub async fn show_schema(
    State(state): State<AppState>,
    Path((project, dataset_id, table_id)): Path<(String, String, String)>,
) -> Result<Html<String>, AppError> {
    let table = match bigquery::get_table(&state.gcp, &project, &dataset_id, &table_id).await {
        Ok(table) => table,
        Err(ProviderError::NotFound(_)) => {
            return Err(AppError::NotFound(format!(
                "Table {}:{}.{} not found",
                project, dataset_id, table_id
            )))
        }
        Err(e) => return Err(e.into()),
    };
    let fields = table.schema.map(|s| s.fields).unwrap_or_default();
    let rows = catalog::to_schema_rows(&fields);
    Ok(Html(render::schema_page(&project, &dataset_id, &table_id, &rows)))
}

// =============================================================================
// Pub/Sub
// =============================================================================

pub async fn list_topics(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let topics = pubsub::list_topics(&state.gcp).await?;
    Ok(Html(render::topics_page(&messaging::to_topic_rows(&topics))))
}

pub async fn list_subscriptions(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let subscriptions = pubsub::list_subscriptions(&state.gcp).await?;
    Ok(Html(render::subscriptions_page(
        &messaging::to_subscription_rows(&subscriptions),
    )))
}

// =============================================================================
// GKE
// =============================================================================

pub async fn list_deployments(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Html<String>, AppError> {
    let namespace = query.resolve(&state);
    let kube = kube_client(&state).await?;

    let deployments = kube.list_deployments(&namespace).await?;

    let mut pod_index = PodIndex::new();
    for deployment in &deployments {
        let selector = orchestration::label_selector(deployment);
        if pod_index.contains_key(&selector) {
            continue;
        }
        let pods = kube.list_pods(&namespace, &selector).await?;
        pod_index.insert(selector, pods);
    }

    tracing::debug!(
        "Namespace {}: {} deployments, {} selectors",
        namespace,
        deployments.len(),
        pod_index.len()
    );

    let rows = orchestration::to_deployment_rows(&deployments, &pod_index);
    Ok(Html(render::deployments_page(&namespace, &rows)))
}

pub async fn show_pods(
    State(state): State<AppState>,
    Path(deployment_name): Path<String>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Html<String>, AppError> {
    let namespace = query.resolve(&state);
    let kube = kube_client(&state).await?;

    let deployment = read_deployment(&kube, &namespace, &deployment_name).await?;
    let selector = orchestration::label_selector(&deployment);
    let pods = kube.list_pods(&namespace, &selector).await?;

    let rows = orchestration::to_pod_rows(&pods);
    Ok(Html(render::pods_page(&deployment_name, &namespace, &rows)))
}

pub async fn show_releases(
    State(state): State<AppState>,
    Path(deployment_name): Path<String>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Html<String>, AppError> {
    let namespace = query.resolve(&state);
    let kube = kube_client(&state).await?;

    let deployment = read_deployment(&kube, &namespace, &deployment_name).await?;

    let rows = orchestration::to_container_rows(&deployment.spec);
    Ok(Html(render::releases_page(&deployment_name, &namespace, &rows)))
}

pub async fn list_namespaces(State(state): State<AppState>) -> Result<Json<Value>, JsonError> {
    let kube = kube_client(&state).await?;
    let namespaces = kube.list_namespaces().await?;
    Ok(Json(json!({
        "namespaces": orchestration::to_namespace_names(&namespaces)
    })))
}

// =============================================================================
// Composer
// =============================================================================

pub async fn list_environments_json(
    State(state): State<AppState>,
    Path((project_id, location)): Path<(String, String)>,
) -> Result<Json<Vec<environment::EnvironmentRow>>, JsonError> {
    let environments = composer::list_environments(&state.gcp, &project_id, &location).await?;
    Ok(Json(environment::to_environment_rows(&environments)))
}

pub async fn environment_details(
    State(state): State<AppState>,
    Path((project_id, location, environment_name)): Path<(String, String, String)>,
) -> Result<Html<String>, AppError> {
    let env =
        composer::get_environment(&state.gcp, &project_id, &location, &environment_name).await?;
    let detail = environment::to_environment_detail(&env);

    let dag_prefix = env.config.as_ref().and_then(|c| c.dag_gcs_prefix.as_deref());
    let dag_files = match dag_prefix {
        Some(prefix) => match storage::list_dag_files(&state.gcp, prefix).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Failed to list DAGs under {}: {}", prefix, e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Ok(Html(render::environment_page(&detail, &dag_files)))
}

pub async fn composer_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let Some((project_id, location)) = state.config.composer_target() else {
        return Err(AppError::BadRequest(
            "GCP_PROJECT_ID and GCP_LOCATION environment variables must be set".to_string(),
        ));
    };

    let environments = composer::list_environments(&state.gcp, project_id, location).await?;
    let rows = environment::to_environment_rows(&environments);
    Ok(Html(render::composer_page(project_id, location, &rows)))
}

pub async fn healthz() -> &'static str {
    "ok"
}
