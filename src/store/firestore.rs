//! Firestore REST (v1) backend.
//!
//! Writes go through `documents:commit` so server timestamps can be expressed
//! as `REQUEST_TIME` field transforms; inserts carry an `exists: false`
//! precondition so a generated id never overwrites anything. Reads use
//! `documents:runQuery`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, json};

use super::{Document, DocumentStore, StoreError, StoreResult, StoredDocument, Value, auto_id};
use crate::google::TokenSource;

const BACKEND: &str = "firestore";
const PRODUCTION_BASE: &str = "https://firestore.googleapis.com/v1";
const EMULATOR_BEARER: &str = "owner";

pub struct FirestoreStore {
    http: reqwest::Client,
    api_base: String,
    database: String,
    tokens: Option<Arc<TokenSource>>,
}

impl FirestoreStore {
    pub fn new(http: reqwest::Client, project_id: &str, tokens: Arc<TokenSource>) -> Self {
        Self {
            http,
            api_base: PRODUCTION_BASE.to_string(),
            database: database_path(project_id),
            tokens: Some(tokens),
        }
    }

    /// Talks to a local emulator at `host` (e.g. `localhost:8080`) without OAuth.
    pub fn emulator(http: reqwest::Client, host: &str, project_id: &str) -> Self {
        Self {
            http,
            api_base: format!("http://{}/v1", host.trim_end_matches('/')),
            database: database_path(project_id),
            tokens: None,
        }
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/documents/{collection}/{id}", self.database)
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}/documents:{method}", self.api_base, self.database)
    }

    async fn post(
        &self,
        operation: &'static str,
        method: &str,
        body: &serde_json::Value,
    ) -> StoreResult<serde_json::Value> {
        let bearer = match &self.tokens {
            Some(tokens) => tokens.token().await?,
            None => EMULATOR_BEARER.to_string(),
        };

        let response = self
            .http
            .post(self.endpoint(method))
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                backend: BACKEND,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                backend: BACKEND,
                operation,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|source| StoreError::Transport {
            backend: BACKEND,
            source,
        })
    }

    async fn commit(
        &self,
        operation: &'static str,
        collection: &str,
        id: &str,
        data: &Document,
        must_not_exist: bool,
    ) -> StoreResult<()> {
        let write = build_write(&self.document_name(collection, id), data, must_not_exist);
        self.post(operation, "commit", &json!({ "writes": [write] }))
            .await?;
        Ok(())
    }

    async fn run_query(&self, query: serde_json::Value) -> StoreResult<Vec<StoredDocument>> {
        let response = self
            .post("query", "runQuery", &json!({ "structuredQuery": query }))
            .await?;
        decode_query_response(&response).map_err(|message| StoreError::Malformed {
            backend: BACKEND,
            message,
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> StoreResult<()> {
        self.commit("set", collection, id, &data, false).await
    }

    async fn add(&self, collection: &str, data: Document) -> StoreResult<String> {
        let id = auto_id();
        self.commit("add", collection, &id, &data, true).await?;
        Ok(id)
    }

    async fn list(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.run_query(structured_query(collection, None, limit))
            .await
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        let filter = json!({
            "fieldFilter": {
                "field": { "fieldPath": field },
                "op": "EQUAL",
                "value": encode_value(value),
            }
        });
        self.run_query(structured_query(collection, Some(filter), limit))
            .await
    }
}

fn database_path(project_id: &str) -> String {
    format!("projects/{project_id}/databases/(default)")
}

fn structured_query(
    collection: &str,
    filter: Option<serde_json::Value>,
    limit: Option<usize>,
) -> serde_json::Value {
    let mut query = json!({ "from": [{ "collectionId": collection }] });
    if let Some(filter) = filter {
        query["where"] = filter;
    }
    if let Some(limit) = limit {
        query["limit"] = json!(limit);
    }
    query
}

pub(crate) fn build_write(name: &str, data: &Document, must_not_exist: bool) -> serde_json::Value {
    let mut write = json!({
        "update": {
            "name": name,
            "fields": encode_fields(&data.without_server_timestamps()),
        }
    });

    let transforms: Vec<serde_json::Value> = data
        .server_timestamp_paths()
        .into_iter()
        .map(|path| json!({ "fieldPath": path, "setToServerValue": "REQUEST_TIME" }))
        .collect();
    if !transforms.is_empty() {
        write["updateTransforms"] = serde_json::Value::Array(transforms);
    }
    if must_not_exist {
        write["currentDocument"] = json!({ "exists": false });
    }
    write
}

pub(crate) fn encode_fields(document: &Document) -> serde_json::Value {
    serde_json::Value::Object(
        document
            .iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

pub(crate) fn encode_value(value: &Value) -> serde_json::Value {
    match value {
        // Sentinels are stripped before encoding; a stray one is stored as null.
        Value::Null | Value::ServerTimestamp => json!({ "nullValue": null }),
        Value::Bool(value) => json!({ "booleanValue": value }),
        Value::Integer(value) => json!({ "integerValue": value.to_string() }),
        Value::Double(value) => json!({ "doubleValue": value }),
        Value::String(value) => json!({ "stringValue": value }),
        Value::Timestamp(value) => {
            json!({ "timestampValue": value.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        Value::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Map(document) => json!({ "mapValue": { "fields": encode_fields(document) } }),
    }
}

pub(crate) fn decode_value(json: &serde_json::Value) -> Result<Value, String> {
    let object = json
        .as_object()
        .ok_or_else(|| format!("expected typed value object, got {json}"))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| "empty typed value".to_string())?;

    let value = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().ok_or("booleanValue is not a bool")?),
        "integerValue" => Value::Integer(match inner {
            serde_json::Value::String(raw) => raw
                .parse()
                .map_err(|err| format!("integerValue '{raw}': {err}"))?,
            other => other.as_i64().ok_or("integerValue is not an integer")?,
        }),
        "doubleValue" => Value::Double(inner.as_f64().ok_or("doubleValue is not a number")?),
        "stringValue" | "referenceValue" => {
            Value::String(inner.as_str().ok_or("string value is not a string")?.to_string())
        }
        "timestampValue" => {
            let raw = inner.as_str().ok_or("timestampValue is not a string")?;
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|err| format!("timestampValue '{raw}': {err}"))?;
            Value::Timestamp(parsed.with_timezone(&Utc))
        }
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(serde_json::Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            Value::Array(values.iter().map(decode_value).collect::<Result<_, _>>()?)
        }
        "mapValue" => Value::Map(decode_fields(inner.get("fields"))?),
        other => return Err(format!("unsupported value type '{other}'")),
    };
    Ok(value)
}

fn decode_fields(fields: Option<&serde_json::Value>) -> Result<Document, String> {
    let Some(fields) = fields else {
        return Ok(Document::new());
    };
    let empty = Map::new();
    let map = fields.as_object().unwrap_or(&empty);
    map.iter()
        .map(|(key, value)| -> Result<(String, Value), String> {
            Ok((key.clone(), decode_value(value)?))
        })
        .collect()
}

pub(crate) fn decode_query_response(
    response: &serde_json::Value,
) -> Result<Vec<StoredDocument>, String> {
    let rows = response
        .as_array()
        .ok_or("runQuery response is not an array")?;

    rows.iter()
        .filter_map(|row| row.get("document"))
        .map(|document| -> Result<StoredDocument, String> {
            let name = document
                .get("name")
                .and_then(serde_json::Value::as_str)
                .ok_or("document without a name")?;
            let id = name
                .rsplit('/')
                .next()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| format!("document name '{name}' has no id"))?;
            Ok(StoredDocument {
                id: id.to_string(),
                data: decode_fields(document.get("fields"))?,
            })
        })
        .collect()
}
