//! gcpstatus - read-only status dashboard for GCP
//!
//! - [`gcp`] - authenticated REST clients and provider records
//! - [`view`] - pure mappers from provider records to page rows
//! - [`web`] - axum routes, error responses and HTML rendering
//! - [`config`] - resolved runtime configuration

pub mod config;
pub mod gcp;
pub mod view;
pub mod web;

/// Version injected at compile time via GCPSTATUS_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("GCPSTATUS_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
