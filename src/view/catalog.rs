//! Dataset, table and schema rows

use super::{format_epoch_millis, format_gb, group_thousands, parse_count};
use crate::gcp::bigquery::{DatasetListEntry, SchemaField, Table};
use serde::Serialize;

const DEFAULT_TABLE_TYPE: &str = "TABLE";
const DEFAULT_FIELD_MODE: &str = "NULLABLE";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DatasetRow {
    pub dataset_id: String,
    pub project: String,
    /// `project.dataset_id`
    pub full_dataset_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableRow {
    pub project: String,
    pub dataset_id: String,
    pub table_id: String,
    #[serde(rename = "type")]
    pub table_type: String,
    pub created: String,
    pub num_rows: String,
    pub size_gb: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SchemaFieldRow {
    pub name: String,
    pub field_type: String,
    pub mode: String,
    pub description: String,
}

pub fn to_dataset_rows(listing: &[DatasetListEntry]) -> Vec<DatasetRow> {
    listing
        .iter()
        .map(|entry| {
            let reference = &entry.dataset_reference;
            DatasetRow {
                dataset_id: reference.dataset_id.clone(),
                project: reference.project_id.clone(),
                full_dataset_id: format!("{}.{}", reference.project_id, reference.dataset_id),
            }
        })
        .collect()
}

/// Map full table metadata, in listing order.
///
/// `project` and `dataset_id` are the route parameters; they are carried on
/// every row for schema links.
pub fn to_table_rows(project: &str, dataset_id: &str, tables: &[Table]) -> Vec<TableRow> {
    tables
        .iter()
        .map(|table| TableRow {
            project: project.to_string(),
            dataset_id: dataset_id.to_string(),
            table_id: table.table_reference.table_id.clone(),
            table_type: table
                .table_type
                .clone()
                .unwrap_or_else(|| DEFAULT_TABLE_TYPE.to_string()),
            created: table
                .creation_time
                .as_deref()
                .and_then(|ms| ms.trim().parse::<i64>().ok())
                .map(format_epoch_millis)
                .unwrap_or_default(),
            num_rows: group_thousands(parse_count(table.num_rows.as_deref())),
            size_gb: format_gb(parse_count(table.num_bytes.as_deref())),
        })
        .collect()
}

pub fn to_schema_rows(fields: &[SchemaField]) -> Vec<SchemaFieldRow> {
    fields
        .iter()
        .map(|field| SchemaFieldRow {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            mode: field
                .mode
                .clone()
                .unwrap_or_else(|| DEFAULT_FIELD_MODE.to_string()),
            description: field.description.clone().unwrap_or_default(),
        })
        .collect()
}
