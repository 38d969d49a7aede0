//! Integration tests for certificate review

use async_trait::async_trait;
use campus_records::core::error::{ValidationError, WorkflowError};
use campus_records::core::models::{Certificate, CertificateStatus, Profile};
use campus_records::core::store::fixtures::{
    ADMIN_ID, DEMO_STUDENT_ID, JUNIOR_FACULTY_ID, SENIOR_FACULTY_ID,
};
use campus_records::core::store::{Gateway, MemoryStore, Query, RecordStore, StoreError, Table};
use campus_records::core::workflow::{CertificateWorkflow, DecisionAction};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

async fn profile(gateway: &Gateway, id: &str) -> Profile {
    gateway.fetch_one(Table::Profiles, id).await.expect("fixture profile")
}

async fn certificate(gateway: &Gateway, id: &str) -> Certificate {
    gateway.fetch_one(Table::Certificates, id).await.expect("fixture certificate")
}

/// Memory store whose updates wait for a permit
struct GatedStore {
    inner: MemoryStore,
    gate: Semaphore,
    updates_started: AtomicUsize,
}

#[async_trait]
impl RecordStore for GatedStore {
    fn kind(&self) -> &'static str {
        "gated"
    }

    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.inner.fetch(table, query).await
    }

    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        self.inner.count(table, query).await
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        self.inner.insert(table, row).await
    }

    async fn update(
        &self,
        table: Table,
        query: &Query,
        fields: Value,
    ) -> Result<usize, StoreError> {
        self.updates_started.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
        self.inner.update(table, query, fields).await
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.inner.delete(table, id).await
    }

    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.inner.upload_file(bucket, path, bytes).await
    }
}

/// Memory store that refuses every write
struct ReadOnlyBackend(MemoryStore);

#[async_trait]
impl RecordStore for ReadOnlyBackend {
    fn kind(&self) -> &'static str {
        "read-only"
    }

    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.0.fetch(table, query).await
    }

    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        self.0.count(table, query).await
    }

    async fn insert(&self, _table: Table, _row: Value) -> Result<Value, StoreError> {
        Err(StoreError::Status { status: 503, body: "maintenance".to_string() })
    }

    async fn update(
        &self,
        _table: Table,
        _query: &Query,
        _fields: Value,
    ) -> Result<usize, StoreError> {
        Err(StoreError::Status { status: 503, body: "maintenance".to_string() })
    }

    async fn delete(&self, _table: Table, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Status { status: 503, body: "maintenance".to_string() })
    }

    async fn upload_file(
        &self,
        _bucket: &str,
        _path: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        Err(StoreError::Status { status: 503, body: "maintenance".to_string() })
    }
}

#[tokio::test]
async fn junior_approves_assigned_student() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, JUNIOR_FACULTY_ID).await;

    let updated = workflow
        .decide(&reviewer, "cert-2", DecisionAction::Approve, "  Verified with organiser  ")
        .await
        .expect("decision should succeed");

    assert_eq!(updated.status, CertificateStatus::Approved);
    assert_eq!(updated.verified_by.as_deref(), Some(JUNIOR_FACULTY_ID));
    assert!(updated.verified_at.is_some());
    assert_eq!(updated.remark.as_deref(), Some("  Verified with organiser  "));
    assert!(updated.rejection_reason.is_none());

    let queue = workflow.review_queue(&reviewer).await.expect("queue");
    assert!(!queue.is_pending("cert-2"));
    assert!(queue.is_processed("cert-2"));
}

#[tokio::test]
async fn rejection_stores_reason() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, SENIOR_FACULTY_ID).await;

    let updated = workflow
        .decide(&reviewer, "mock-4", DecisionAction::Reject, "Certificate number does not match")
        .await
        .expect("decision should succeed");

    assert_eq!(updated.status, CertificateStatus::Rejected);
    assert_eq!(updated.remark.as_deref(), Some("Certificate number does not match"));
    assert_eq!(updated.rejection_reason.as_deref(), Some("Certificate number does not match"));
}

#[tokio::test]
async fn blank_remark_changes_nothing() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, SENIOR_FACULTY_ID).await;

    let result = workflow.decide(&reviewer, "cert-2", DecisionAction::Reject, "   ").await;
    assert!(matches!(result, Err(WorkflowError::Validation(ValidationError::MissingRemark))));

    let unchanged = certificate(&gateway, "cert-2").await;
    assert_eq!(unchanged.status, CertificateStatus::Pending);
    assert!(unchanged.verified_by.is_none());
    assert!(unchanged.remark.is_none());
}

#[tokio::test]
async fn decided_certificates_stay_decided() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, SENIOR_FACULTY_ID).await;

    let result =
        workflow.decide(&reviewer, "cert-1", DecisionAction::Reject, "Second thoughts").await;
    assert!(matches!(
        result,
        Err(WorkflowError::AlreadyDecided { ref status, .. }) if status == "approved"
    ));
    assert_eq!(certificate(&gateway, "cert-1").await.status, CertificateStatus::Approved);
}

#[tokio::test]
async fn junior_cannot_decide_outside_assignment() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, JUNIOR_FACULTY_ID).await;

    let result = workflow.decide(&reviewer, "mock-4", DecisionAction::Approve, "Looks fine").await;
    assert!(matches!(result, Err(WorkflowError::NotAssigned(ref id)) if id == "mock-4"));
    assert_eq!(certificate(&gateway, "mock-4").await.status, CertificateStatus::Pending);
}

#[tokio::test]
async fn students_cannot_review() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());
    let student = profile(&gateway, DEMO_STUDENT_ID).await;

    let result =
        workflow.decide(&student, "cert-2", DecisionAction::Approve, "Self approval").await;
    assert!(matches!(result, Err(WorkflowError::AccessDenied(_))));
    assert!(matches!(workflow.review_queue(&student).await, Err(WorkflowError::AccessDenied(_))));
}

#[tokio::test]
async fn review_scope_follows_seniority() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());

    let junior = profile(&gateway, JUNIOR_FACULTY_ID).await;
    let students = workflow.assigned_students(&junior).await.expect("students");
    let names: Vec<&str> = students.iter().map(|s| s.full_name.as_str()).collect();
    assert_eq!(names, ["Alice Johnson", "Bob Smith"]);

    let queue = workflow.review_queue(&junior).await.expect("junior queue");
    assert_eq!(queue.pending.len(), 3);
    assert_eq!(queue.processed.len(), 5);
    assert!(!queue.is_pending("mock-4"));
    assert!(queue.pending.iter().all(|item| item.student.full_name == "Alice Johnson"));

    for admin_like in [SENIOR_FACULTY_ID, ADMIN_ID] {
        let reviewer = profile(&gateway, admin_like).await;
        let queue = workflow.review_queue(&reviewer).await.expect("senior queue");
        assert_eq!(queue.pending.len(), 4);
        assert_eq!(queue.processed.len(), 6);
        assert_eq!(queue.pending[0].certificate.id, "mock-4");
    }
}

#[tokio::test]
async fn standings_carry_per_student_progress() {
    let gateway = Gateway::fixture();
    let workflow = CertificateWorkflow::new(gateway.clone());

    let junior = profile(&gateway, JUNIOR_FACULTY_ID).await;
    let standings = workflow.student_standings(&junior).await.expect("standings");
    let rows: Vec<(&str, usize, usize, u32)> = standings
        .iter()
        .map(|s| {
            let counts = &s.certificates;
            (s.student.id.as_str(), counts.approved, counts.total, s.progress())
        })
        .collect();
    assert_eq!(rows, [(DEMO_STUDENT_ID, 3, 7, 43), ("stu-2", 1, 1, 100)]);

    let senior = profile(&gateway, SENIOR_FACULTY_ID).await;
    let standings = workflow.student_standings(&senior).await.expect("standings");
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[2].student.full_name, "Carol Danvers");
    assert_eq!(standings[2].certificates.pending, 1);
    assert_eq!(standings[2].progress(), 0);

    let student = profile(&gateway, DEMO_STUDENT_ID).await;
    let denied = workflow.student_standings(&student).await;
    assert!(matches!(denied, Err(WorkflowError::AccessDenied(_))));
}

#[tokio::test]
async fn junior_without_students_gets_empty_queue() {
    let store = MemoryStore::with_rows([(
        Table::Profiles,
        vec![json!({
            "id": "fac-9", "full_name": "Dr. New Hire", "email": "new@example.edu",
            "role": "faculty", "faculty_level": "junior"
        })],
    )]);
    let gateway = Gateway::new(Arc::new(store));
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, "fac-9").await;

    let queue = workflow.review_queue(&reviewer).await.expect("queue");
    assert!(queue.pending.is_empty());
    assert!(queue.processed.is_empty());
}

#[tokio::test]
async fn missing_student_shows_as_unknown() {
    let store = MemoryStore::with_rows([
        (
            Table::Profiles,
            vec![json!({
                "id": "fac-2", "full_name": "Dr. Grace Hopper", "email": "g.hopper@example.edu",
                "role": "faculty", "faculty_level": "senior"
            })],
        ),
        (
            Table::Certificates,
            vec![json!({
                "id": "orphan", "student_id": "deleted-student", "title": "Old Award",
                "category": "academic", "status": "pending",
                "file_url": "https://example.com/a.pdf",
                "file_name": "a.pdf", "uploaded_at": "2024-02-01T00:00:00Z"
            })],
        ),
    ]);
    let gateway = Gateway::new(Arc::new(store));
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, SENIOR_FACULTY_ID).await;

    let queue = workflow.review_queue(&reviewer).await.expect("queue");
    assert_eq!(queue.pending.len(), 1);
    assert_eq!(queue.pending[0].student.full_name, "Unknown");
    assert_eq!(queue.pending[0].student.email, "Unknown");
}

#[tokio::test]
async fn concurrent_decision_on_same_certificate_is_refused() {
    let store = Arc::new(GatedStore {
        inner: MemoryStore::with_fixtures(),
        gate: Semaphore::new(0),
        updates_started: AtomicUsize::new(0),
    });
    let gateway = Gateway::new(store.clone());
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, SENIOR_FACULTY_ID).await;

    let first = {
        let workflow = workflow.clone();
        let reviewer = reviewer.clone();
        tokio::spawn(async move {
            workflow
                .decide(&reviewer, "cert-2", DecisionAction::Approve, "Verified")
                .await
        })
    };

    while store.updates_started.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = workflow.decide(&reviewer, "cert-2", DecisionAction::Reject, "Duplicate").await;
    assert!(matches!(second, Err(WorkflowError::InFlight(ref id)) if id == "cert-2"));

    store.gate.add_permits(1);
    let approved = first.await.expect("task").expect("first decision");
    assert_eq!(approved.status, CertificateStatus::Approved);
    assert_eq!(store.updates_started.load(Ordering::SeqCst), 1);

    // The guard is released once the first decision finishes
    let again = workflow.decide(&reviewer, "cert-2", DecisionAction::Reject, "Late").await;
    assert!(matches!(again, Err(WorkflowError::AlreadyDecided { .. })));
}

#[tokio::test]
async fn store_failure_is_reported_and_nothing_changes() {
    let gateway = Gateway::new(Arc::new(ReadOnlyBackend(MemoryStore::with_fixtures())));
    let workflow = CertificateWorkflow::new(gateway.clone());
    let reviewer = profile(&gateway, SENIOR_FACULTY_ID).await;

    let result = workflow.decide(&reviewer, "cert-2", DecisionAction::Approve, "Verified").await;
    assert!(matches!(result, Err(WorkflowError::Store(StoreError::Status { status: 503, .. }))));
    assert_eq!(certificate(&gateway, "cert-2").await.status, CertificateStatus::Pending);

    // A failed decision does not leave the id locked
    let retry = workflow.decide(&reviewer, "cert-2", DecisionAction::Approve, "Verified").await;
    assert!(matches!(retry, Err(WorkflowError::Store(_))));
}
