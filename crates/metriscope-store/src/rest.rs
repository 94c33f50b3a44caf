//! REST table-store backend.
//!
//! Speaks the Azure-Tables-compatible OData protocol (real accounts and
//! the Azurite emulator alike): `GET {endpoint}/Tables` to enumerate
//! tables, `GET {endpoint}/{Table}()` with `$filter`/`$top` to query
//! rows, and SharedKeyLite request signatures. The store's two
//! continuation headers are folded into the single opaque token the
//! rest of the system carries around.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use log::debug;
use serde::Deserialize;
use sha2::Sha256;

use metriscope_commons::{
    ContinuationToken, FieldValue, Row, StoreConnection, StoreError, StoreResult, TIMESTAMP,
};

use crate::traits::{RowPage, TableStore};

const API_VERSION: &str = "2019-02-02";
const DATA_SERVICE_VERSION: &str = "3.0;NetFx";
const ACCEPT_JSON: &str = "application/json;odata=nometadata";

type HmacSha256 = Hmac<Sha256>;

/// Table-store client over HTTP.
#[derive(Debug)]
pub struct RestTableStore {
    client: reqwest::Client,
    account: String,
    key: Vec<u8>,
    endpoint: String,
}

impl RestTableStore {
    /// Build a client from parsed connection settings. Fails early when
    /// the account key is not valid base64.
    pub fn new(conn: StoreConnection) -> StoreResult<Self> {
        let key = BASE64
            .decode(conn.key.as_bytes())
            .map_err(|e| StoreError::InvalidConfig(format!("AccountKey is not valid base64: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            account: conn.account,
            key,
            endpoint: conn.endpoint,
        })
    }

    /// Convenience constructor from a raw connection string.
    pub fn from_connection_string(raw: &str) -> StoreResult<Self> {
        Self::new(StoreConnection::parse(raw)?)
    }

    /// Issue one signed GET against `resource` (a path segment under the
    /// service endpoint) with the given query parameters.
    async fn get(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> StoreResult<reqwest::Response> {
        let url = format!("{}/{}", self.endpoint, resource);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| StoreError::InvalidConfig(format!("bad endpoint url {url:?}: {e}")))?;

        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let resource_path = canonical_resource(&self.account, parsed.path());
        let signature = sign(&self.key, &format!("{date}\n{resource_path}"));

        let response = self
            .client
            .get(parsed)
            .query(query)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("DataServiceVersion", DATA_SERVICE_VERSION)
            .header("Accept", ACCEPT_JSON)
            .header(
                "Authorization",
                format!("SharedKeyLite {}:{}", self.account, signature),
            )
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Request(format!("{status}: {body}")));
        }
        Ok(response)
    }
}

/// Canonicalized resource for SharedKeyLite: the account name followed
/// by the request path (query string excluded).
fn canonical_resource(account: &str, path: &str) -> String {
    format!("/{account}{path}")
}

/// HMAC-SHA256 signature over the string-to-sign, base64-encoded.
fn sign(key: &[u8], string_to_sign: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts keys of any length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Fold the store's two continuation headers into one opaque token.
fn fold_continuation(next_pk: Option<&str>, next_rk: Option<&str>) -> Option<ContinuationToken> {
    match (next_pk, next_rk) {
        (None, None) => None,
        (pk, rk) => ContinuationToken::new(format!(
            "{}\n{}",
            pk.unwrap_or_default(),
            rk.unwrap_or_default()
        )),
    }
}

/// Split a folded token back into the store's two continuation values.
fn unfold_continuation(token: &ContinuationToken) -> (String, String) {
    match token.as_str().split_once('\n') {
        Some((pk, rk)) => (pk.to_string(), rk.to_string()),
        None => (token.as_str().to_string(), String::new()),
    }
}

fn header_str<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct TableList {
    value: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    #[serde(rename = "TableName")]
    table_name: String,
}

#[derive(Debug, Deserialize)]
struct EntityList {
    value: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Convert one store entity into a row, dropping OData annotations.
/// The store-managed `Timestamp` arrives as an ISO string and is
/// re-tagged as a timestamp value.
fn entity_to_row(entity: serde_json::Map<String, serde_json::Value>) -> Row {
    let mut row = Row::new();
    for (name, value) in entity {
        // Annotations are "odata.etag"/"odata.metadata" at the entity
        // level and "<Prop>@odata.type" at the property level; a user
        // property merely containing "odata" in its name is data.
        if name.starts_with("odata.") || name.contains("@odata") {
            continue;
        }
        let field = match (&name, value) {
            (n, serde_json::Value::String(s)) if n.eq_ignore_ascii_case(TIMESTAMP) => {
                match chrono::DateTime::parse_from_rfc3339(&s) {
                    Ok(ts) => FieldValue::Timestamp(ts.with_timezone(&chrono::Utc)),
                    Err(_) => FieldValue::Text(s),
                }
            }
            (_, v) => FieldValue::from_json(v),
        };
        row.set(name, field);
    }
    row
}

#[async_trait]
impl TableStore for RestTableStore {
    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(token) = &next {
                query.push(("NextTableName", token.clone()));
            }
            let response = self.get("Tables", &query).await?;
            next = header_str(&response, "x-ms-continuation-NextTableName").map(str::to_string);
            let body: TableList = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            names.extend(body.value.into_iter().map(|t| t.table_name));
            if next.is_none() {
                break;
            }
        }
        debug!("listed {} tables from store", names.len());
        Ok(names)
    }

    async fn query_rows(
        &self,
        table: &str,
        filter: Option<&str>,
        top: usize,
        token: Option<&ContinuationToken>,
    ) -> StoreResult<RowPage> {
        let mut query: Vec<(&str, String)> = vec![("$top", top.to_string())];
        if let Some(filter) = filter {
            query.push(("$filter", filter.to_string()));
        }
        if let Some(token) = token {
            let (next_pk, next_rk) = unfold_continuation(token);
            query.push(("NextPartitionKey", next_pk));
            query.push(("NextRowKey", next_rk));
        }

        let resource = format!("{table}()");
        let response = self.get(&resource, &query).await?;
        let next = fold_continuation(
            header_str(&response, "x-ms-continuation-NextPartitionKey"),
            header_str(&response, "x-ms-continuation-NextRowKey"),
        );
        let body: EntityList = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let rows: Vec<Row> = body.value.into_iter().map(entity_to_row).collect();
        debug!(
            "query {table}: {} rows, continuation={}",
            rows.len(),
            next.is_some()
        );
        Ok(RowPage { rows, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_resource_includes_account_and_path() {
        assert_eq!(
            canonical_resource("devstoreaccount1", "/devstoreaccount1/Tables"),
            "/devstoreaccount1/devstoreaccount1/Tables"
        );
        assert_eq!(
            canonical_resource("metrics", "/CpuUsage()"),
            "/metrics/CpuUsage()"
        );
    }

    #[test]
    fn signing_is_deterministic_and_input_sensitive() {
        let key = b"0123456789abcdef";
        let a = sign(key, "Mon, 01 Jan 2024 00:00:00 GMT\n/acct/Tables");
        let b = sign(key, "Mon, 01 Jan 2024 00:00:00 GMT\n/acct/Tables");
        let c = sign(key, "Tue, 02 Jan 2024 00:00:00 GMT\n/acct/Tables");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(BASE64.decode(a.as_bytes()).is_ok());
    }

    #[test]
    fn continuation_round_trips_through_fold() {
        let token = fold_continuation(Some("1!8!c3J2LTAx"), Some("1!4!MDAw")).unwrap();
        let (pk, rk) = unfold_continuation(&token);
        assert_eq!(pk, "1!8!c3J2LTAx");
        assert_eq!(rk, "1!4!MDAw");
    }

    #[test]
    fn missing_continuation_headers_mean_no_token() {
        assert!(fold_continuation(None, None).is_none());
        let partial = fold_continuation(Some("pk-only"), None).unwrap();
        let (pk, rk) = unfold_continuation(&partial);
        assert_eq!(pk, "pk-only");
        assert_eq!(rk, "");
    }

    #[test]
    fn entity_decoding_drops_odata_and_tags_timestamp() {
        let entity: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
            r#"{
                "odata.etag": "W/\"datetime'2024-05-17T08%3A30%3A00Z'\"",
                "PartitionKey": "srv-01",
                "RowKey": "0001",
                "Timestamp": "2024-05-17T08:30:00.0000000Z",
                "CpuPercent": 43.2,
                "CpuPercent@odata.type": "Edm.Double",
                "SampleCount": 12,
                "Healthy": true
            }"#,
        )
        .unwrap();
        let row = entity_to_row(entity);
        assert!(row.get("odata.etag").is_none());
        assert!(row.get("CpuPercent@odata.type").is_none());
        assert_eq!(row.partition_key(), Some("srv-01"));
        assert_eq!(row.get("SampleCount"), Some(&FieldValue::Integer(12)));
        assert_eq!(row.get("CpuPercent"), Some(&FieldValue::Number(43.2)));
        assert!(matches!(row.get("Timestamp"), Some(FieldValue::Timestamp(_))));
    }

    #[test]
    fn user_properties_containing_odata_in_the_name_survive() {
        let entity: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
            r#"{
                "PartitionKey": "srv-01",
                "RowKey": "0001",
                "myodataflag": true,
                "SensorOdataVersion": "4.0"
            }"#,
        )
        .unwrap();
        let row = entity_to_row(entity);
        assert_eq!(row.get("myodataflag"), Some(&FieldValue::Boolean(true)));
        assert_eq!(
            row.get("SensorOdataVersion"),
            Some(&FieldValue::Text("4.0".into()))
        );
    }

    #[test]
    fn bad_base64_key_is_rejected_at_construction() {
        let err = RestTableStore::from_connection_string(
            "AccountName=metrics;AccountKey=!!!notbase64!!!;TableEndpoint=http://localhost:10002/metrics",
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }
}
