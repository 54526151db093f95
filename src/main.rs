use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcpstatus::config::Config;
use gcpstatus::gcp::auth::GcpCredentials;
use gcpstatus::gcp::client::GcpClient;
use gcpstatus::web::{self, AppState};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Read-only status dashboard for GCP
#[derive(Parser, Debug)]
#[command(name = "gcpstatus", version = gcpstatus::VERSION, about, long_about = None)]
struct Args {
    /// Config file (defaults to <config dir>/gcpstatus/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GCP project for BigQuery and Pub/Sub
    #[arg(short, long)]
    project: Option<String>,

    /// GKE cluster name
    #[arg(long)]
    cluster: Option<String>,

    /// GKE cluster zone or region
    #[arg(short, long)]
    zone: Option<String>,

    /// Default Kubernetes namespace
    #[arg(short, long)]
    namespace: Option<String>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    let Some(path) = log_file else {
        builder.init();
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    builder
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Log file: {:?}", path);

    Ok(Some(guard))
}

/// Resolve configuration: file < environment < command line
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(project) = &args.project {
        config.project_id = Some(project.clone());
    }
    if let Some(cluster) = &args.cluster {
        config.gke_cluster = cluster.clone();
    }
    if let Some(zone) = &args.zone {
        config.gke_zone = Some(zone.clone());
    }
    if let Some(namespace) = &args.namespace {
        config.gke_namespace = namespace.clone();
    }
    if let Some(bind) = &args.bind {
        config.bind_address = bind.clone();
    }

    config.project_id = config.effective_project();
    config.gke_zone = Some(config.effective_zone());

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let config = resolve_config(&args)?;

    let Some(project) = config.project_id.clone() else {
        return Err(anyhow::anyhow!(
            "No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag"
        ));
    };

    tracing::info!("gcpstatus {} starting", gcpstatus::VERSION);
    tracing::info!(
        "Project: {}, GKE cluster: {}, zone: {}, namespace: {}",
        project,
        config.gke_cluster,
        config.gke_zone.as_deref().unwrap_or_default(),
        config.gke_namespace
    );
    match config.composer_target() {
        Some((p, l)) => tracing::info!("Composer: {} / {}", p, l),
        None => tracing::warn!("Composer project/location not set; /gcpstatus/composer will return 400"),
    }

    let credentials = GcpCredentials::new().await?;
    let client = GcpClient::new(
        credentials,
        &project,
        config.api_endpoints.clone(),
        config.http_timeouts(),
    )
    .context("Failed to create HTTP client")?;

    web::serve(AppState::new(config, client)).await
}
