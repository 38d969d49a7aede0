//! PostgREST backend
//!
//! Talks to a Supabase-style deployment: tables under `/rest/v1`, files under
//! `/storage/v1`. The same key is sent as `apikey` and as a bearer token.

use super::{Filter, Query, RecordStore, StoreError, Table};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

/// Remote record store
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base: String,
    token: String,
}

impl RestStore {
    /// Create a client for `endpoint` (e.g. `https://xyz.supabase.co`)
    ///
    /// # Errors
    /// Returns [`StoreError::NotConfigured`] when the endpoint is blank.
    pub fn new(endpoint: &str, token: &str) -> Result<Self, StoreError> {
        let base = endpoint.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(StoreError::NotConfigured);
        }
        Ok(Self {
            client: Client::new(),
            base: base.to_string(),
            token: token.trim().to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base, table.name())
    }

    /// Public URL of a stored object
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.token).bearer_auth(&self.token)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status: status.as_u16(), body })
    }

    const fn ensure_writable(table: Table) -> Result<(), StoreError> {
        if table.is_read_only() {
            Err(StoreError::ReadOnly(table))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    fn kind(&self) -> &'static str {
        "rest"
    }

    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        if query.is_empty_match() {
            return Ok(Vec::new());
        }
        let mut params = query_params(query);
        params.insert(0, ("select".to_string(), "*".to_string()));
        let request = self.authed(self.client.get(self.table_url(table))).query(&params);
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        if query.is_empty_match() {
            return Ok(0);
        }
        let params = filter_params(query);
        let request = self
            .authed(self.client.head(self.table_url(table)))
            .header("Prefer", "count=exact")
            .query(&params);
        let response = Self::check(request.send().await?).await?;
        let status = response.status().as_u16();
        response
            .headers()
            .get("content-range")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| StoreError::Status {
                status,
                body: "missing or unbounded Content-Range header".to_string(),
            })
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        Self::ensure_writable(table)?;
        let request = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = Self::check(request.send().await?).await?;
        let status = response.status().as_u16();
        let rows = response.json::<Vec<Value>>().await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Status {
            status,
            body: "insert returned no representation".to_string(),
        })
    }

    async fn update(
        &self,
        table: Table,
        query: &Query,
        fields: Value,
    ) -> Result<usize, StoreError> {
        Self::ensure_writable(table)?;
        if query.is_empty_match() {
            return Ok(0);
        }
        let params = filter_params(query);
        let request = self
            .authed(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&params)
            .json(&fields);
        let response = Self::check(request.send().await?).await?;
        let rows = response.json::<Vec<Value>>().await?;
        Ok(rows.len())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        Self::ensure_writable(table)?;
        let params = filter_params(&Query::by_id(id));
        let request = self.authed(self.client.delete(self.table_url(table))).query(&params);
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base);
        let request = self
            .authed(self.client.post(url))
            .header("Content-Type", "application/octet-stream")
            .header("x-upsert", "false")
            .body(bytes);
        Self::check(request.send().await?).await?;
        Ok(self.public_url(bucket, path))
    }
}

/// Render a JSON value the way PostgREST expects it in a filter
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Quote list members that contain PostgREST reserved characters
fn render_list_member(value: &Value) -> String {
    let raw = render_value(value);
    if raw.contains([',', '(', ')', '"']) {
        format!("\"{}\"", raw.replace('"', "\\\""))
    } else {
        raw
    }
}

/// Filter parameters only, for count/update/delete requests
#[must_use]
pub fn filter_params(query: &Query) -> Vec<(String, String)> {
    query
        .filters()
        .iter()
        .map(|filter| match filter {
            Filter::Eq(column, value) => (column.clone(), format!("eq.{}", render_value(value))),
            Filter::In(column, values) => {
                let members: Vec<String> = values.iter().map(render_list_member).collect();
                (column.clone(), format!("in.({})", members.join(",")))
            }
            Filter::IsNull(column) => (column.clone(), "is.null".to_string()),
        })
        .collect()
}

/// Full query-string parameters: filters, `order` and `limit`
#[must_use]
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = filter_params(query);
    if !query.ordering().is_empty() {
        let terms: Vec<String> = query
            .ordering()
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.descending { "desc" } else { "asc" }))
            .collect();
        params.push(("order".to_string(), terms.join(",")));
    }
    if let Some(limit) = query.row_limit() {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`
#[must_use]
pub fn parse_content_range(header: &str) -> Option<usize> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}
