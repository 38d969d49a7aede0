//! Integration tests for the notification feed

use async_trait::async_trait;
use campus_records::core::error::WorkflowError;
use campus_records::core::models::Notification;
use campus_records::core::notifications::NotificationFeed;
use campus_records::core::store::fixtures::DEMO_STUDENT_ID;
use campus_records::core::store::{Gateway, MemoryStore, Query, RecordStore, StoreError, Table};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

fn note(id: &str, user: &str, created: &str, read_at: Option<&str>) -> Value {
    json!({
        "id": id, "user_id": user, "title": format!("Title {id}"), "message": "Body",
        "type": "certificate_approved", "read_at": read_at, "created_at": created,
    })
}

/// Memory store that counts updates and can be switched to fail
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    updates: AtomicUsize,
}

impl FlakyStore {
    fn new(rows: Vec<Value>) -> Self {
        Self {
            inner: MemoryStore::with_rows([(Table::Notifications, rows)]),
            failing: AtomicBool::new(false),
            updates: AtomicUsize::new(0),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Status { status: 500, body: "boom".to_string() })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    fn kind(&self) -> &'static str {
        "flaky"
    }

    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        self.inner.fetch(table, query).await
    }

    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        self.check()?;
        self.inner.count(table, query).await
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        self.check()?;
        self.inner.insert(table, row).await
    }

    async fn update(
        &self,
        table: Table,
        query: &Query,
        fields: Value,
    ) -> Result<usize, StoreError> {
        self.check()?;
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(table, query, fields).await
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(table, id).await
    }

    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.check()?;
        self.inner.upload_file(bucket, path, bytes).await
    }
}

fn five_notifications() -> Vec<Value> {
    vec![
        note("n1", "u1", "2024-04-01T10:00:00Z", None),
        note("n2", "u1", "2024-04-02T10:00:00Z", Some("2024-04-02T11:00:00Z")),
        note("n3", "u1", "2024-04-03T10:00:00Z", None),
        note("n4", "u1", "2024-04-04T10:00:00Z", Some("2024-04-04T11:00:00Z")),
        note("n5", "u1", "2024-04-05T10:00:00Z", None),
        note("other", "u2", "2024-04-06T10:00:00Z", None),
    ]
}

#[tokio::test]
async fn mark_all_read_uses_one_update() {
    let store = Arc::new(FlakyStore::new(five_notifications()));
    let gateway = Gateway::new(store.clone());
    let mut feed = NotificationFeed::new(gateway.clone(), "u1");

    let page = feed.load().await.expect("load");
    let ids: Vec<&str> = page.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n5", "n4", "n3", "n2", "n1"]);
    assert_eq!(feed.unread_count(), 3);
    assert_eq!(feed.badge().as_deref(), Some("3"));

    let previously_read = feed.page()[1].read_at;
    let marked = feed.mark_all_read().await.expect("mark all");
    assert_eq!(marked, 3);
    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
    assert_eq!(feed.unread_count(), 0);
    assert!(feed.badge().is_none());
    assert_eq!(feed.page()[1].read_at, previously_read);

    // Persisted, and other users are untouched
    let stored: Vec<Notification> = gateway
        .fetch_collection(Table::Notifications, &Query::new())
        .await
        .expect("fetch");
    assert!(stored.iter().filter(|n| n.user_id == "u1").all(|n| !n.is_unread()));
    assert!(stored.iter().any(|n| n.id == "other" && n.is_unread()));

    assert_eq!(feed.mark_all_read().await.expect("nothing left"), 0);
    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mark_read_ignores_read_and_unknown_ids() {
    let store = Arc::new(FlakyStore::new(five_notifications()));
    let mut feed = NotificationFeed::new(Gateway::new(store.clone()), "u1");
    feed.load().await.expect("load");

    assert!(feed.mark_read("n3").await.expect("mark"));
    assert_eq!(feed.unread_count(), 2);
    assert!(!feed.mark_read("n3").await.expect("again"));
    assert!(!feed.mark_read("n2").await.expect("already read"));
    assert!(!feed.mark_read("other").await.expect("not loaded"));
    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failures_keep_the_loaded_page() {
    let store = Arc::new(FlakyStore::new(five_notifications()));
    let mut feed = NotificationFeed::new(Gateway::new(store.clone()), "u1");
    feed.load().await.expect("load");
    let before: Vec<Notification> = feed.page().to_vec();

    store.failing.store(true, Ordering::SeqCst);
    assert!(matches!(feed.load().await, Err(WorkflowError::Store(_))));
    assert_eq!(feed.page(), before.as_slice());

    assert!(matches!(feed.mark_all_read().await, Err(WorkflowError::Store(_))));
    assert_eq!(feed.unread_count(), 3);

    assert!(matches!(feed.mark_read("n1").await, Err(WorkflowError::Store(_))));
    assert_eq!(feed.page(), before.as_slice());
}

#[tokio::test]
async fn page_is_capped_and_badge_saturates() {
    let rows: Vec<Value> = (1..=12)
        .map(|i| note(&format!("n{i:02}"), "u1", &format!("2024-05-{i:02}T08:00:00Z"), None))
        .collect();
    let mut feed = NotificationFeed::new(Gateway::new(Arc::new(FlakyStore::new(rows))), "u1");

    let page = feed.load().await.expect("load");
    assert_eq!(page.len(), 10);
    assert_eq!(page[0].id, "n12");
    assert_eq!(feed.badge().as_deref(), Some("9+"));

    feed.load_limit(3).await.expect("short page");
    assert_eq!(feed.page().len(), 3);
    assert_eq!(feed.badge().as_deref(), Some("3"));
}

#[tokio::test]
async fn fixture_feed_for_demo_student() {
    let mut feed = NotificationFeed::new(Gateway::fixture(), DEMO_STUDENT_ID);
    feed.load().await.expect("load");
    assert_eq!(feed.page().len(), 3);
    assert_eq!(feed.unread_count(), 2);
}
