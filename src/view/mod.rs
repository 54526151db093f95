//! View models
//!
//! Pure functions turning provider records into template-ready rows. Every
//! optional provider field is resolved to a concrete default here, so the
//! renderer never deals with absent values.
//!
//! - [`catalog`] - datasets, tables, schema fields
//! - [`messaging`] - topics, subscriptions
//! - [`orchestration`] - deployments, pods, containers
//! - [`environment`] - Composer environments

pub mod catalog;
pub mod environment;
pub mod messaging;
pub mod orchestration;

use chrono::DateTime;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Extract short name from a hierarchical resource name
/// e.g., "projects/my-project/topics/orders" -> "orders"
pub fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Format an integer with `,` thousands separators
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Bytes as gigabytes (1024³) with two decimals
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_GB)
}

/// Epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC, as returned by the API)
pub fn format_epoch_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Parse an integer the API sent as a string, defaulting to zero
pub(crate) fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
