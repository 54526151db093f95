//! HTML pages
//!
//! Each page is a Bootstrap table or list inside the shared layout. All
//! interpolated values go through [`html_escape`].

use crate::view::catalog::{DatasetRow, SchemaFieldRow, TableRow};
use crate::view::environment::{EnvironmentDetail, EnvironmentRow};
use crate::view::messaging::{DeliveryMode, SubscriptionRow, TopicRow};
use crate::view::orchestration::{ContainerRow, DeploymentRow, DeploymentStatus, PodRow, RUNNING_PHASE};
use std::fmt::Write;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js";

const NAV: &str = r#"<nav class="navbar navbar-expand-lg navbar-dark bg-dark">
    <div class="container">
        <span class="navbar-brand mb-0 h1">GCP Explorer</span>
        <div class="collapse navbar-collapse">
            <ul class="navbar-nav">
                <li class="nav-item"><a class="nav-link" href="/gcpstatus/">BigQuery</a></li>
                <li class="nav-item"><a class="nav-link" href="/gcpstatus/topics">Pub/Sub Topics</a></li>
                <li class="nav-item"><a class="nav-link" href="/gcpstatus/subscriptions">Pub/Sub Subscriptions</a></li>
                <li class="nav-item"><a class="nav-link" href="/gcpstatus/gke/deployments">GKE Deployments</a></li>
                <li class="nav-item"><a class="nav-link" href="/gcpstatus/composer">Composer Environments</a></li>
            </ul>
        </div>
    </div>
</nav>"#;

/// Minimal HTML escaping for user-facing strings.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape a value for a URL path segment or query value inside an attribute
fn url_attr(s: &str) -> String {
    html_escape(&urlencoding::encode(s))
}

/// A string literal safe to embed inside a `<script>` block
fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}

fn page(title: &str, content: &str, scripts: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link href="{css}" rel="stylesheet">
</head>
<body>
{nav}
    <div class="container mt-4">
{content}
    </div>
    <script src="{js}"></script>
{scripts}
</body>
</html>
"#,
        title = html_escape(title),
        css = BOOTSTRAP_CSS,
        nav = NAV,
        content = content,
        js = BOOTSTRAP_JS,
        scripts = scripts,
    )
}

/// Breadcrumb trail; the last crumb is the active page
fn breadcrumb(links: &[(&str, &str)], active: &str) -> String {
    let mut out = String::from("        <nav aria-label=\"breadcrumb\">\n            <ol class=\"breadcrumb\">\n");
    for (href, label) in links {
        let _ = writeln!(
            out,
            "                <li class=\"breadcrumb-item\"><a href=\"{}\" class=\"text-decoration-none\">{}</a></li>",
            href,
            html_escape(label)
        );
    }
    let _ = writeln!(
        out,
        "                <li class=\"breadcrumb-item active\">{}</li>\n            </ol>\n        </nav>",
        html_escape(active)
    );
    out
}

/// A card holding a striped table; `rows` is pre-rendered `<tr>` markup
fn table_card(heading: &str, headers: &[&str], rows: &str, tbody_id: Option<&str>) -> String {
    let mut head = String::new();
    for h in headers {
        let _ = write!(head, "<th>{}</th>", h);
    }
    let tbody_attr = tbody_id
        .map(|id| format!(" id=\"{}\"", id))
        .unwrap_or_default();

    format!(
        r#"        <div class="card">
            <div class="card-header">
                <h4 class="mb-0">{heading}</h4>
            </div>
            <div class="card-body">
                <div class="table-responsive">
                    <table class="table table-striped table-hover">
                        <thead class="table-dark">
                            <tr>{head}</tr>
                        </thead>
                        <tbody{tbody_attr}>
{rows}                        </tbody>
                    </table>
                </div>
            </div>
        </div>"#
    )
}

fn badge(class: &str, text: &str) -> String {
    format!("<span class=\"badge bg-{}\">{}</span>", class, html_escape(text))
}

fn enabled_badge(enabled: bool) -> String {
    if enabled {
        badge("success", "Enabled")
    } else {
        badge("secondary", "Disabled")
    }
}

pub fn datasets_page(datasets: &[DatasetRow]) -> String {
    let mut rows = String::new();
    for d in datasets {
        let _ = writeln!(
            rows,
            "<tr><td><a href=\"/gcpstatus/tables/{}/{}\" class=\"text-decoration-none\">{}</a></td><td>{}</td><td><code>{}</code></td></tr>",
            url_attr(&d.project),
            url_attr(&d.dataset_id),
            html_escape(&d.dataset_id),
            html_escape(&d.project),
            html_escape(&d.full_dataset_id),
        );
    }

    let content = table_card(
        "BigQuery Datasets",
        &["Dataset ID", "Project", "Full Dataset ID"],
        &rows,
        None,
    );
    page("BigQuery Datasets", &content, "")
}

pub fn tables_page(dataset_id: &str, tables: &[TableRow]) -> String {
    let mut rows = String::new();
    for t in tables {
        let _ = writeln!(
            rows,
            "<tr><td><a href=\"/gcpstatus/schema/{}/{}/{}\" class=\"text-decoration-none\">{}</a></td><td>{}</td><td>{}</td><td class=\"text-end\">{}</td><td class=\"text-end\">{}</td></tr>",
            url_attr(&t.project),
            url_attr(&t.dataset_id),
            url_attr(&t.table_id),
            html_escape(&t.table_id),
            badge("secondary", &t.table_type),
            html_escape(&t.created),
            html_escape(&t.num_rows),
            html_escape(&t.size_gb),
        );
    }

    let title = format!("Tables in {}", dataset_id);
    let mut content = breadcrumb(&[("/gcpstatus/", "Datasets")], dataset_id);
    content.push_str(&table_card(
        &html_escape(&title),
        &["Table ID", "Type", "Created", "Rows", "Size (GB)"],
        &rows,
        None,
    ));
    page(&title, &content, "")
}

pub fn schema_page(project: &str, dataset_id: &str, table_id: &str, fields: &[SchemaFieldRow]) -> String {
    let mut rows = String::new();
    for f in fields {
        let _ = writeln!(
            rows,
            "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&f.name),
            badge("secondary", &f.field_type),
            badge("info", &f.mode),
            html_escape(&f.description),
        );
    }

    let dataset_href = format!("/gcpstatus/tables/{}/{}", url_attr(project), url_attr(dataset_id));
    let mut content = breadcrumb(
        &[("/gcpstatus/", "Datasets"), (&dataset_href, dataset_id)],
        table_id,
    );
    content.push_str(&table_card(
        &html_escape(&format!("Schema for {}.{}.{}", project, dataset_id, table_id)),
        &["Column Name", "Data Type", "Mode", "Description"],
        &rows,
        None,
    ));
    page(&format!("Schema: {}", table_id), &content, "")
}

pub fn topics_page(topics: &[TopicRow]) -> String {
    let mut rows = String::new();
    for t in topics {
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td><code>{}</code></td></tr>",
            html_escape(&t.short_name),
            html_escape(&t.full_name),
        );
    }

    let content = table_card("Pub/Sub Topics", &["Topic Name", "Full Path"], &rows, None);
    page("Pub/Sub Topics", &content, "")
}

pub fn subscriptions_page(subscriptions: &[SubscriptionRow]) -> String {
    let mut rows = String::new();
    for s in subscriptions {
        let mode_class = match s.delivery_mode {
            DeliveryMode::Push => "info",
            DeliveryMode::Pull => "secondary",
        };
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{} seconds</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&s.short_name),
            html_escape(&s.topic_short_name),
            badge(mode_class, &s.delivery_mode.to_string()),
            s.retention_seconds,
            enabled_badge(s.ordering_enabled),
            enabled_badge(s.exactly_once_enabled),
            s.expiration,
        );
    }

    let content = table_card(
        "Pub/Sub Subscriptions",
        &[
            "Subscription Name",
            "Topic",
            "Push/Pull",
            "Message Retention",
            "Message Ordering",
            "Exactly Once",
            "Expiration",
        ],
        &rows,
        None,
    );
    page("Pub/Sub Subscriptions", &content, "")
}

pub fn deployments_page(namespace: &str, deployments: &[DeploymentRow]) -> String {
    let ns = url_attr(namespace);
    let mut rows = String::new();
    for d in deployments {
        let name = url_attr(&d.name);
        let status_class = match d.status {
            DeploymentStatus::Up => "success",
            DeploymentStatus::Down => "danger",
        };
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td><a href=\"/gcpstatus/gke/pods/{name}?namespace={ns}\" class=\"text-decoration-none\">{} Running</a></td><td><a href=\"/gcpstatus/gke/releases/{name}?namespace={ns}\" class=\"text-decoration-none\">View Images</a></td><td>{}</td></tr>",
            html_escape(&d.name),
            d.running_pod_count,
            badge(status_class, &d.status.to_string()),
        );
    }

    let mut content = String::from(
        r#"        <div class="card mb-4">
            <div class="card-header d-flex justify-content-between align-items-center">
                <h4 class="mb-0">Select Namespace</h4>
            </div>
            <div class="card-body">
                <select id="namespaceSelect" class="form-select" aria-label="Select namespace">
                    <option selected value="">Loading namespaces...</option>
                </select>
            </div>
        </div>
"#,
    );
    content.push_str(&table_card(
        &format!(
            "GKE Deployments in <span id=\"currentNamespace\">{}</span>",
            html_escape(namespace)
        ),
        &["Deployment Name", "Pods", "Releases", "Status"],
        &rows,
        Some("deploymentsTable"),
    ));

    let script = format!(
        r#"    <script>
        const currentNamespace = {current};
        document.addEventListener('DOMContentLoaded', function() {{
            fetch('/gcpstatus/gke/namespaces')
                .then(response => response.json())
                .then(data => {{
                    const select = document.getElementById('namespaceSelect');
                    select.innerHTML = '';
                    (data.namespaces || []).forEach(ns => {{
                        const option = document.createElement('option');
                        option.value = ns;
                        option.textContent = ns;
                        if (ns === currentNamespace) {{
                            option.selected = true;
                        }}
                        select.appendChild(option);
                    }});
                }});
        }});
        document.getElementById('namespaceSelect').addEventListener('change', function() {{
            window.location.href = '/gcpstatus/gke/deployments?namespace=' + encodeURIComponent(this.value);
        }});
    </script>"#,
        current = js_string(namespace),
    );

    page("GKE Deployments", &content, &script)
}

fn deployments_breadcrumb(deployment_name: &str, namespace: &str) -> String {
    let href = format!("/gcpstatus/gke/deployments?namespace={}", url_attr(namespace));
    breadcrumb(&[(&href, "Deployments")], deployment_name)
}

pub fn pods_page(deployment_name: &str, namespace: &str, pods: &[PodRow]) -> String {
    let mut rows = String::new();
    for p in pods {
        let phase_class = if p.phase == RUNNING_PHASE { "success" } else { "warning" };
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&p.name),
            badge(phase_class, &p.phase),
            html_escape(&p.ready_ratio),
            p.restart_count,
            html_escape(&p.age),
        );
    }

    let title = format!("Pods for {}", deployment_name);
    let mut content = deployments_breadcrumb(deployment_name, namespace);
    content.push_str(&table_card(
        &html_escape(&title),
        &["Pod Name", "Status", "Ready", "Restarts", "Age"],
        &rows,
        None,
    ));
    page(&title, &content, "")
}

pub fn releases_page(deployment_name: &str, namespace: &str, containers: &[ContainerRow]) -> String {
    let mut rows = String::new();
    for c in containers {
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td><code>{}</code></td><td><code>{}</code></td></tr>",
            html_escape(&c.name),
            html_escape(&c.image),
            html_escape(&c.image_id),
        );
    }

    let mut content = deployments_breadcrumb(deployment_name, namespace);
    content.push_str(&table_card(
        &html_escape(&format!("Container Images for {}", deployment_name)),
        &["Container Name", "Image", "Image ID"],
        &rows,
        None,
    ));
    page(&format!("Images for {}", deployment_name), &content, "")
}

pub fn environment_page(detail: &EnvironmentDetail, dag_files: &[String]) -> String {
    let mut variables = String::new();
    for (key, value) in &detail.env_variables {
        let _ = writeln!(
            variables,
            "                        <li class=\"list-group-item\">{}: {}</li>",
            html_escape(key),
            html_escape(value)
        );
    }

    let mut dags = String::new();
    if dag_files.is_empty() {
        dags.push_str("                        <li class=\"list-group-item text-muted\">No DAG files found.</li>\n");
    }
    for dag in dag_files {
        let _ = writeln!(
            dags,
            "                        <li class=\"list-group-item\"><code>{}</code></li>",
            html_escape(dag)
        );
    }

    let row = &detail.row;
    let content = format!(
        r#"        <h1 class="mt-5">Environment Details</h1>
        <ul class="list-group">
            <li class="list-group-item"><strong>Name:</strong> {name}</li>
            <li class="list-group-item"><strong>State:</strong> {state}</li>
            <li class="list-group-item"><strong>Create Time:</strong> {create_time}</li>
            <li class="list-group-item"><strong>Update Time:</strong> {update_time}</li>
            <li class="list-group-item"><strong>Config:</strong><pre class="mb-0"><code>{config}</code></pre></li>
            <li class="list-group-item"><strong>Environment Variables:</strong>
                <ul class="list-group">
{variables}                </ul>
            </li>
            <li class="list-group-item"><strong>DAG Files:</strong>
                <ul class="list-group">
{dags}                </ul>
            </li>
        </ul>"#,
        name = html_escape(&row.short_name),
        state = html_escape(&row.state),
        create_time = html_escape(&row.create_time),
        update_time = html_escape(&row.update_time),
        config = html_escape(&detail.config),
    );

    page("Environment Details", &content, "")
}

pub fn composer_page(project_id: &str, location: &str, environments: &[EnvironmentRow]) -> String {
    let mut content = String::from("        <h1 class=\"mt-5\">Composer Environments</h1>\n");

    if environments.is_empty() {
        content.push_str("        <p>No environments found.</p>\n");
    } else {
        content.push_str("        <ul class=\"list-group\">\n");
        for env in environments {
            let _ = writeln!(
                content,
                "            <li class=\"list-group-item\"><strong>Name:</strong> <a href=\"/gcpstatus/environment/{}/{}/{}\">{}</a><br><strong>State:</strong> {}<br><strong>Create Time:</strong> {}<br><strong>Update Time:</strong> {}</li>",
                url_attr(project_id),
                url_attr(location),
                url_attr(&env.short_name),
                html_escape(&env.short_name),
                html_escape(&env.state),
                html_escape(&env.create_time),
                html_escape(&env.update_time),
            );
        }
        content.push_str("        </ul>\n");
    }

    page("Composer Environments", &content, "")
}
