//! In-memory record store
//!
//! Evaluates the same [`Query`] model as the remote backend so views behave
//! identically against demo data. The achievement summary view is derived
//! from the current rows on every read.

use super::{fixtures, Filter, Query, RecordStore, StoreError, Table};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Public URL prefix for files kept in memory
pub const FILE_URL_PREFIX: &str = "memory://";

/// Record store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<Table, Vec<Value>>>,
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo data set
    #[must_use]
    pub fn with_fixtures() -> Self {
        Self::with_rows(fixtures::seed())
    }

    /// Store seeded with the given rows
    #[must_use]
    pub fn with_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Table, Vec<Value>)>,
    {
        let mut tables = BTreeMap::new();
        for (table, mut seeded) in rows {
            tables.entry(table).or_insert_with(Vec::new).append(&mut seeded);
        }
        Self { tables: RwLock::new(tables), files: RwLock::new(HashMap::new()) }
    }

    /// Bytes previously uploaded to `bucket/path`
    pub async fn file(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(&format!("{bucket}/{path}")).cloned()
    }

    /// Number of files uploaded so far
    pub async fn file_count(&self) -> usize {
        self.files.read().await.len()
    }

    async fn rows_of(&self, table: Table) -> Vec<Value> {
        if table == Table::StudentAchievementsSummary {
            let tables = self.tables.read().await;
            return summarize(&tables);
        }
        self.tables.read().await.get(&table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        Ok(apply_query(self.rows_of(table).await, query))
    }

    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        let rows = self.rows_of(table).await;
        Ok(rows.iter().filter(|row| matches_all(row, query)).count())
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        if table.is_read_only() {
            return Err(StoreError::ReadOnly(table));
        }
        let Value::Object(mut fields) = row else {
            return Err(bad_request("row must be a JSON object"));
        };
        fill_defaults(table, &mut fields);
        let stored = Value::Object(fields);
        self.tables.write().await.entry(table).or_default().push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        table: Table,
        query: &Query,
        fields: Value,
    ) -> Result<usize, StoreError> {
        if table.is_read_only() {
            return Err(StoreError::ReadOnly(table));
        }
        let Value::Object(patch) = fields else {
            return Err(bad_request("update must be a JSON object"));
        };
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(&table) else {
            return Ok(0);
        };
        let mut updated = 0;
        for row in rows.iter_mut().filter(|row| matches_all(row, query)) {
            if let Value::Object(existing) = row {
                for (key, value) in &patch {
                    existing.insert(key.clone(), value.clone());
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        if table.is_read_only() {
            return Err(StoreError::ReadOnly(table));
        }
        let query = Query::by_id(id);
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(&table) {
            rows.retain(|row| !matches_all(row, &query));
        }
        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let key = format!("{bucket}/{path}");
        self.files.write().await.insert(key.clone(), bytes);
        Ok(format!("{FILE_URL_PREFIX}{key}"))
    }
}

/// Assign id, creation timestamp and initial status the way the backend does
fn fill_defaults(table: Table, fields: &mut Map<String, Value>) {
    fields
        .entry("id")
        .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
    let now = json!(Utc::now());
    match table {
        Table::Certificates => {
            fields.entry("uploaded_at").or_insert(now);
            fields.entry("status").or_insert_with(|| json!("pending"));
        }
        Table::Activities => {
            fields.entry("created_at").or_insert(now);
            fields.entry("status").or_insert_with(|| json!("draft"));
        }
        Table::InstitutionalReports => {
            fields.entry("created_at").or_insert(now);
            fields.entry("status").or_insert_with(|| json!("generating"));
        }
        Table::Notifications => {
            fields.entry("created_at").or_insert(now);
            fields.entry("read_at").or_insert(Value::Null);
        }
        Table::Profiles | Table::AcademicRecords => {
            fields.entry("created_at").or_insert(now);
        }
        Table::StudentAchievementsSummary => {}
    }
}

fn bad_request(body: &str) -> StoreError {
    StoreError::Status { status: 400, body: body.to_string() }
}

/// Filter, order and limit a table snapshot
fn apply_query(rows: Vec<Value>, query: &Query) -> Vec<Value> {
    let mut selected: Vec<Value> = rows.into_iter().filter(|row| matches_all(row, query)).collect();
    if !query.ordering().is_empty() {
        selected.sort_by(|a, b| {
            for term in query.ordering() {
                let ordering =
                    compare_nulls_last(a.get(&term.column), b.get(&term.column), term.descending);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
    if let Some(limit) = query.row_limit() {
        selected.truncate(limit);
    }
    selected
}

fn matches_all(row: &Value, query: &Query) -> bool {
    query.filters().iter().all(|filter| matches_filter(row, filter))
}

fn matches_filter(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(column, expected) => row.get(column).is_some_and(|v| loosely_equal(v, expected)),
        Filter::In(column, values) => row
            .get(column)
            .is_some_and(|v| values.iter().any(|expected| loosely_equal(v, expected))),
        Filter::IsNull(column) => row.get(column).map_or(true, Value::is_null),
    }
}

/// Equality as a text-typed query string would see it (`3` matches `"3"`)
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Null, _) | (_, Value::Null) => false,
        _ => as_text(actual) == as_text(expected),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok()
}

/// Order two column values, nulls after every non-null value
fn compare_nulls_last(a: Option<&Value>, b: Option<&Value>, descending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        _ => as_text(a).cmp(&as_text(b)),
    }
}

fn count_where(rows: Option<&Vec<Value>>, student_id: &str, status: Option<&str>) -> u32 {
    let count = rows.map_or(0, |rows| {
        rows.iter()
            .filter(|r| r.get("student_id").and_then(Value::as_str) == Some(student_id))
            .filter(|r| status.map_or(true, |s| r.get("status").and_then(Value::as_str) == Some(s)))
            .count()
    });
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Derive `student_achievements_summary` rows from the current tables
fn summarize(tables: &BTreeMap<Table, Vec<Value>>) -> Vec<Value> {
    let profiles = tables.get(&Table::Profiles);
    let certificates = tables.get(&Table::Certificates);
    let activities = tables.get(&Table::Activities);
    let records = tables.get(&Table::AcademicRecords);

    let students = profiles
        .into_iter()
        .flatten()
        .filter(|p| p.get("role").and_then(Value::as_str) == Some("student"));

    students
        .filter_map(|profile| {
            let id = profile.get("id")?.as_str()?;
            let total_credits: u64 = activities
                .into_iter()
                .flatten()
                .filter(|a| a.get("student_id").and_then(Value::as_str) == Some(id))
                .filter(|a| a.get("status").and_then(Value::as_str) == Some("approved"))
                .filter_map(|a| a.get("credits_earned").and_then(Value::as_u64))
                .sum();
            let mut own_records: Vec<&Value> = records
                .into_iter()
                .flatten()
                .filter(|r| r.get("student_id").and_then(Value::as_str) == Some(id))
                .collect();
            own_records.sort_by(|a, b| {
                compare_nulls_last(a.get("academic_year"), b.get("academic_year"), true)
                    .then_with(|| compare_nulls_last(a.get("semester"), b.get("semester"), true))
            });
            let current_cgpa = own_records
                .iter()
                .find_map(|r| r.get("cgpa").filter(|v| !v.is_null()).cloned())
                .unwrap_or(Value::Null);

            Some(json!({
                "student_id": id,
                "full_name": profile.get("full_name").cloned().unwrap_or(Value::Null),
                "student_id_number": profile.get("student_id").cloned().unwrap_or(Value::Null),
                "total_certificates": count_where(certificates, id, None),
                "approved_certificates": count_where(certificates, id, Some("approved")),
                "total_activities": count_where(activities, id, None),
                "approved_activities": count_where(activities, id, Some("approved")),
                "total_credits": total_credits,
                "current_cgpa": current_cgpa,
            }))
        })
        .collect()
}
