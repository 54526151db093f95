//! GCP API interaction module
//!
//! This module provides the core functionality for reading from Google Cloud
//! Platform APIs: authentication, the HTTP client, and one module per
//! provider with its record types and list/get operations.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication using Application Default Credentials
//! - [`client`] - Main GCP client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`error`] - Provider error taxonomy
//! - [`bigquery`] - Datasets, tables and schemas
//! - [`pubsub`] - Topics and subscriptions
//! - [`gke`] - Cluster discovery and the Kubernetes API
//! - [`composer`] - Composer environments
//! - [`storage`] - Cloud Storage object listing
//!
//! # Example
//!
//! ```ignore
//! use gcpstatus::gcp::{auth::GcpCredentials, client::GcpClient, pubsub};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let creds = GcpCredentials::new().await?;
//!     let client = GcpClient::new(creds, "my-project", Default::default(), Default::default())?;
//!     let topics = pubsub::list_topics(&client).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod bigquery;
pub mod client;
pub mod composer;
pub mod error;
pub mod gke;
pub mod http;
pub mod pubsub;
pub mod storage;
