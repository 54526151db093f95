//! Composer environment rows

use super::short_name;
use crate::gcp::composer::Environment;
use serde::Serialize;
use std::collections::BTreeMap;

const UNSPECIFIED_STATE: &str = "STATE_UNSPECIFIED";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvironmentRow {
    #[serde(rename = "name")]
    pub short_name: String,
    pub state: String,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvironmentDetail {
    #[serde(flatten)]
    pub row: EnvironmentRow,
    /// Pretty-printed JSON of the whole environment config
    pub config: String,
    /// Airflow environment variables, unfiltered
    pub env_variables: BTreeMap<String, String>,
}

pub fn to_environment_row(environment: &Environment) -> EnvironmentRow {
    EnvironmentRow {
        short_name: short_name(&environment.name).to_string(),
        state: environment
            .state
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_STATE.to_string()),
        create_time: environment.create_time.clone().unwrap_or_default(),
        update_time: environment.update_time.clone().unwrap_or_default(),
    }
}

pub fn to_environment_rows(listing: &[Environment]) -> Vec<EnvironmentRow> {
    listing.iter().map(to_environment_row).collect()
}

pub fn to_environment_detail(environment: &Environment) -> EnvironmentDetail {
    let config = environment.config.clone().unwrap_or_default();

    let env_variables = config
        .software_config
        .as_ref()
        .map(|software| software.env_variables.clone())
        .unwrap_or_default();

    EnvironmentDetail {
        row: to_environment_row(environment),
        config: serde_json::to_string_pretty(&config).unwrap_or_default(),
        env_variables,
    }
}
