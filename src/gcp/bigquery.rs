//! BigQuery catalog
//!
//! Dataset, table and schema records as returned by the BigQuery v2 REST API.

use super::client::{encode, GcpClient};
use super::error::ProviderResult;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

/// One entry of `datasets.list`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetListEntry {
    pub dataset_reference: DatasetReference,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

/// One entry of `tables.list` (no size or schema information)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableListEntry {
    pub table_reference: TableReference,
    #[serde(rename = "type")]
    pub table_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableSchema {
    pub fields: Vec<SchemaField>,
}

/// Full table metadata from `tables.get`.
///
/// The API encodes 64-bit integers as JSON strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub table_reference: TableReference,
    #[serde(rename = "type")]
    pub table_type: Option<String>,
    /// Milliseconds since the epoch
    pub creation_time: Option<String>,
    pub num_rows: Option<String>,
    pub num_bytes: Option<String>,
    pub schema: Option<TableSchema>,
}

/// List datasets in a project
pub async fn list_datasets(client: &GcpClient, project: &str) -> ProviderResult<Vec<DatasetListEntry>> {
    let url = client.bigquery_url(project, "datasets");
    client.list_all(&url, "datasets", &[]).await
}

/// List tables in a dataset
pub async fn list_tables(
    client: &GcpClient,
    project: &str,
    dataset_id: &str,
) -> ProviderResult<Vec<TableListEntry>> {
    let url = client.bigquery_url(project, &format!("datasets/{}/tables", encode(dataset_id)));
    client.list_all(&url, "tables", &[]).await
}

/// Fetch full metadata for one table
pub async fn get_table(
    client: &GcpClient,
    project: &str,
    dataset_id: &str,
    table_id: &str,
) -> ProviderResult<Table> {
    let url = client.bigquery_url(
        project,
        &format!("datasets/{}/tables/{}", encode(dataset_id), encode(table_id)),
    );
    client.get(&url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_fixture_deserializes() {
        let table: Table = serde_json::from_value(json!({
            "kind": "bigquery#table",
            "tableReference": {"projectId": "p", "datasetId": "d", "tableId": "events"},
            "type": "TABLE",
            "creationTime": "1700000000000",
            "numRows": "1234567",
            "numBytes": "3221225472",
            "schema": {"fields": [
                {"name": "id", "type": "INTEGER", "mode": "REQUIRED"},
                {"name": "payload", "type": "STRING", "description": "raw body"}
            ]}
        }))
        .unwrap();

        assert_eq!(table.table_reference.table_id, "events");
        assert_eq!(table.num_rows.as_deref(), Some("1234567"));
        let fields = table.schema.unwrap().fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_type, "INTEGER");
        assert_eq!(fields[1].mode, None);
    }

    #[test]
    fn test_view_without_sizes_deserializes() {
        let table: Table = serde_json::from_value(json!({
            "tableReference": {"projectId": "p", "datasetId": "d", "tableId": "v"},
            "type": "VIEW",
            "creationTime": "1700000000000"
        }))
        .unwrap();
        assert!(table.num_rows.is_none());
        assert!(table.schema.is_none());
    }
}
