//! Record store seam
//!
//! Every screen reads and writes through [`RecordStore`]. Two backends exist:
//! [`MemoryStore`] seeded with demo fixtures and [`RestStore`] speaking the
//! PostgREST protocol. [`Gateway`] wraps either one with typed helpers.

pub mod fixtures;
pub mod gateway;
pub mod memory;
pub mod rest;

pub use gateway::Gateway;
pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tables and views of the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// User identities
    Profiles,
    /// Uploaded certificates
    Certificates,
    /// Student activities
    Activities,
    /// Per-user notifications
    Notifications,
    /// Accreditation report requests
    InstitutionalReports,
    /// Graded subjects
    AcademicRecords,
    /// Derived per-student rollup (read-only view)
    StudentAchievementsSummary,
}

impl Table {
    /// All writable tables
    pub const WRITABLE: [Self; 6] = [
        Self::Profiles,
        Self::Certificates,
        Self::Activities,
        Self::Notifications,
        Self::InstitutionalReports,
        Self::AcademicRecords,
    ];

    /// Name of the table on the wire
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Certificates => "certificates",
            Self::Activities => "activities",
            Self::Notifications => "notifications",
            Self::InstitutionalReports => "institutional_reports",
            Self::AcademicRecords => "academic_records",
            Self::StudentAchievementsSummary => "student_achievements_summary",
        }
    }

    /// Whether writes are refused
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::StudentAchievementsSummary)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single row predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq(String, Value),
    /// `column in (values)`
    In(String, Vec<Value>),
    /// `column is null`
    IsNull(String),
}

/// One ordering term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Column to sort by
    pub column: String,
    /// Sort descending
    pub descending: bool,
}

/// Filter, order and limit applied to a collection read or bulk update
///
/// ```
/// use campus_records::core::store::Query;
///
/// let query = Query::new()
///     .eq("student_id", "stu-1")
///     .order_desc("uploaded_at")
///     .limit(10);
/// assert_eq!(query.filters().len(), 1);
/// assert_eq!(query.row_limit(), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Vec<Order>,
    limit: Option<usize>,
}

impl Query {
    /// Empty query matching every row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query matching a single id
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    /// Add an equality filter
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    /// Add a membership filter
    #[must_use]
    pub fn in_list<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.push(Filter::In(column.to_string(), values));
        self
    }

    /// Add a null filter
    #[must_use]
    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push(Filter::IsNull(column.to_string()));
        self
    }

    /// Order ascending by a column (appended after existing terms)
    #[must_use]
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(Order { column: column.to_string(), descending: false });
        self
    }

    /// Order descending by a column (appended after existing terms)
    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(Order { column: column.to_string(), descending: true });
        self
    }

    /// Cap the number of returned rows
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters in insertion order
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Ordering terms in priority order
    #[must_use]
    pub fn ordering(&self) -> &[Order] {
        &self.order
    }

    /// Row cap, if any
    #[must_use]
    pub const fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether an `In` filter with no values makes the query match nothing
    #[must_use]
    pub fn is_empty_match(&self) -> bool {
        self.filters
            .iter()
            .any(|f| matches!(f, Filter::In(_, values) if values.is_empty()))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = rest::query_params(self);
        if params.is_empty() {
            return f.write_str("*");
        }
        let joined: Vec<String> = params.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
        f.write_str(&joined.join("&"))
    }
}

/// Failures reported by a record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or transport failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend answered with a non-success status
    #[error("store returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
    /// A row did not match the expected shape
    #[error("could not decode record: {0}")]
    Decode(#[from] serde_json::Error),
    /// No row with the given id
    #[error("{table} record '{id}' not found")]
    NotFound {
        /// Table searched
        table: Table,
        /// Missing id
        id: String,
    },
    /// Write attempted against a read-only view
    #[error("{0} is read-only")]
    ReadOnly(Table),
    /// Live backend selected without an endpoint
    #[error(
        "no database endpoint configured \
         (set one with `campusrec config set endpoint <URL>` or use --fixture)"
    )]
    NotConfigured,
}

/// Which backend a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Remote PostgREST backend
    #[default]
    Live,
    /// In-memory demo data
    Fixture,
}

impl DataSource {
    /// Config value of the source
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fixture => "fixture",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "fixture" | "mock" => Ok(Self::Fixture),
            _ => Err(format!("Unknown data source: {s} (expected live or fixture)")),
        }
    }
}

/// Backend-agnostic row access
///
/// Rows travel as JSON objects keyed by column name. Calls are single-shot;
/// failures are returned to the caller unchanged.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend label used in logs
    fn kind(&self) -> &'static str;

    /// Rows matching the query
    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Number of rows matching the query's filters
    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError>;

    /// Insert a row and return it as stored
    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;

    /// Merge `fields` into every matching row; returns the number updated
    async fn update(&self, table: Table, query: &Query, fields: Value) -> Result<usize, StoreError>;

    /// Remove the row with the given id
    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError>;

    /// Store a file and return its public URL
    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_summary_view_is_read_only() {
        assert!(Table::StudentAchievementsSummary.is_read_only());
        assert!(Table::WRITABLE.iter().all(|t| !t.is_read_only()));
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let query = Query::new().in_list("id", Vec::<String>::new());
        assert!(query.is_empty_match());
        assert!(!Query::by_id("x").is_empty_match());
    }

    #[test]
    fn parses_data_source() {
        assert_eq!("Fixture".parse::<DataSource>(), Ok(DataSource::Fixture));
        assert_eq!("live".parse::<DataSource>(), Ok(DataSource::Live));
        assert!("cloud".parse::<DataSource>().is_err());
    }
}
