//! Integration tests for uploads, profile edits, report requests and sessions

use async_trait::async_trait;
use campus_records::core::error::{ValidationError, WorkflowError};
use campus_records::core::institutional::{
    delete_report, list_reports, request_report, ReportRequest,
};
use campus_records::core::models::{Category, CertificateStatus, Profile, ReportStatus, ReportType};
use campus_records::core::profile::{update_profile, ProfileEdit};
use campus_records::core::session::AppState;
use campus_records::core::store::fixtures::{
    ADMIN_ID, DEMO_STUDENT_ID, JUNIOR_FACULTY_ID, SENIOR_FACULTY_ID,
};
use campus_records::core::store::memory::FILE_URL_PREFIX;
use campus_records::core::store::{
    DataSource, Gateway, MemoryStore, Query, RecordStore, StoreError, Table,
};
use campus_records::core::upload::{
    student_certificates, upload_certificate, CertificateUpload, CERTIFICATE_BUCKET,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

async fn profile(gateway: &Gateway, id: &str) -> Profile {
    gateway.fetch_one(Table::Profiles, id).await.expect("fixture profile")
}

fn upload(title: &str, bytes: &[u8]) -> CertificateUpload {
    CertificateUpload {
        title: title.to_string(),
        description: Some("  ".to_string()),
        category: Category::CoCurricular,
        file_name: "award.final.png".to_string(),
        bytes: bytes.to_vec(),
    }
}

#[tokio::test]
async fn upload_stores_file_then_pending_row() {
    let store = Arc::new(MemoryStore::with_fixtures());
    let gateway = Gateway::new(store.clone());
    let student = profile(&gateway, DEMO_STUDENT_ID).await;

    let form = upload("  Chess Champion ", b"png-bytes");
    let certificate = upload_certificate(&gateway, &student, form).await.expect("upload");
    assert_eq!(certificate.status, CertificateStatus::Pending);
    assert_eq!(certificate.title, "Chess Champion");
    assert_eq!(certificate.student_id, DEMO_STUDENT_ID);
    assert!(certificate.description.is_none());
    assert_eq!(certificate.file_name, "award.final.png");

    let prefix = format!("{FILE_URL_PREFIX}{CERTIFICATE_BUCKET}/");
    let path = certificate.file_url.strip_prefix(&prefix).expect("memory url");
    assert!(path.starts_with("user-stu-1/"));
    assert!(path.ends_with(".png"));
    assert_eq!(store.file(CERTIFICATE_BUCKET, path).await.as_deref(), Some(&b"png-bytes"[..]));

    let list = student_certificates(&gateway, DEMO_STUDENT_ID).await.expect("list");
    assert_eq!(list.all.len(), 8);
    assert_eq!(list.all[0].id, certificate.id);
    assert_eq!(list.with_status(CertificateStatus::Pending).len(), 4);
}

#[tokio::test]
async fn invalid_uploads_touch_nothing() {
    let store = Arc::new(MemoryStore::with_fixtures());
    let gateway = Gateway::new(store.clone());
    let student = profile(&gateway, DEMO_STUDENT_ID).await;
    let faculty = profile(&gateway, JUNIOR_FACULTY_ID).await;

    let blank = upload_certificate(&gateway, &student, upload(" ", b"x")).await;
    assert!(matches!(blank, Err(WorkflowError::Validation(ValidationError::MissingTitle))));

    let empty = upload_certificate(&gateway, &student, upload("Award", b"")).await;
    assert!(matches!(empty, Err(WorkflowError::Validation(ValidationError::MissingFile))));

    let not_student = upload_certificate(&gateway, &faculty, upload("Award", b"x")).await;
    assert!(matches!(not_student, Err(WorkflowError::AccessDenied(_))));

    assert_eq!(store.file_count().await, 0);
    let list = student_certificates(&gateway, DEMO_STUDENT_ID).await.expect("list");
    assert_eq!(list.all.len(), 7);
}

/// Memory store whose row inserts fail after file uploads succeed
struct InsertFailingStore(Arc<MemoryStore>);

#[async_trait]
impl RecordStore for InsertFailingStore {
    fn kind(&self) -> &'static str {
        "insert-failing"
    }

    async fn fetch(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.0.fetch(table, query).await
    }

    async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        self.0.count(table, query).await
    }

    async fn insert(&self, _table: Table, _row: Value) -> Result<Value, StoreError> {
        Err(StoreError::Status { status: 500, body: "insert failed".to_string() })
    }

    async fn update(
        &self,
        table: Table,
        query: &Query,
        fields: Value,
    ) -> Result<usize, StoreError> {
        self.0.update(table, query, fields).await
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.0.delete(table, id).await
    }

    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.0.upload_file(bucket, path, bytes).await
    }
}

#[tokio::test]
async fn failed_insert_leaves_uploaded_file_and_logs_it() {
    let dir = TempDir::new().expect("temp dir");
    let log_path = dir.path().join("campusrec.log");
    let file_logging = campus_records::logger::init_file_logging(&log_path);

    let memory = Arc::new(MemoryStore::with_fixtures());
    let gateway = Gateway::new(Arc::new(InsertFailingStore(memory.clone())));
    let student = profile(&gateway, DEMO_STUDENT_ID).await;

    let result = upload_certificate(&gateway, &student, upload("Chess Champion", b"png")).await;
    assert!(matches!(result, Err(WorkflowError::Store(StoreError::Status { status: 500, .. }))));
    assert_eq!(memory.file_count().await, 1);
    let list = student_certificates(&gateway, DEMO_STUDENT_ID).await.expect("list");
    assert_eq!(list.all.len(), 7);

    if file_logging {
        let log = std::fs::read_to_string(&log_path).expect("read log");
        let prefix = format!("uploaded file left at {CERTIFICATE_BUCKET}/user-stu-1/");
        assert!(log.contains(&prefix), "missing orphan path in log: {log}");
    }
}

#[test]
fn upload_reads_file_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("transcript.pdf");
    std::fs::write(&path, b"%PDF-1.7").expect("write");

    let upload =
        CertificateUpload::from_file(&path, "Transcript", Category::Academic, None).expect("read");
    assert_eq!(upload.file_name, "transcript.pdf");
    assert_eq!(upload.bytes, b"%PDF-1.7");
    assert_eq!(upload.validate(), Ok(()));

    let missing = dir.path().join("missing.pdf");
    assert!(CertificateUpload::from_file(&missing, "x", Category::Academic, None).is_err());
}

#[tokio::test]
async fn profile_edit_keeps_student_number() {
    let gateway = Gateway::fixture();
    let student = profile(&gateway, DEMO_STUDENT_ID).await;

    let edit = ProfileEdit {
        full_name: " Alice J. Johnson ".to_string(),
        email: "alice.j@example.edu".to_string(),
    };
    let updated = update_profile(&gateway, &student, edit).await.expect("update");
    assert_eq!(updated.full_name, "Alice J. Johnson");
    assert_eq!(updated.email, "alice.j@example.edu");
    assert_eq!(updated.student_id_number, student.student_id_number);
    assert_eq!(updated.role, student.role);

    let bad = ProfileEdit { full_name: "Alice".to_string(), email: "nope".to_string() };
    let result = update_profile(&gateway, &updated, bad).await;
    assert!(matches!(result, Err(WorkflowError::Validation(ValidationError::InvalidEmail(_)))));
    assert_eq!(profile(&gateway, DEMO_STUDENT_ID).await, updated);
}

#[tokio::test]
async fn senior_requests_and_lists_reports() {
    let gateway = Gateway::fixture();
    let senior = profile(&gateway, SENIOR_FACULTY_ID).await;

    let request = ReportRequest {
        title: " NIRF 2024 ".to_string(),
        description: Some(String::new()),
        report_type: ReportType::Nirf,
        parameters: json!({"year": 2024}),
    };
    let report = request_report(&gateway, &senior, &request).await.expect("request");
    assert_eq!(report.title, "NIRF 2024");
    assert_eq!(report.status, ReportStatus::Generating);
    assert_eq!(report.generated_by.as_deref(), Some(SENIOR_FACULTY_ID));
    assert!(report.description.is_none());
    assert_eq!(report.parameters, json!({"year": 2024}));

    let admin = profile(&gateway, ADMIN_ID).await;
    let reports = list_reports(&gateway, &admin).await.expect("list");
    let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, [report.id.as_str(), "rep-1"]);

    delete_report(&gateway, &admin, &report.id).await.expect("delete");
    assert_eq!(list_reports(&gateway, &admin).await.expect("list").len(), 1);
}

#[tokio::test]
async fn reports_are_closed_to_juniors_and_students() {
    let gateway = Gateway::fixture();
    let request = ReportRequest {
        title: "Internal audit".to_string(),
        description: None,
        report_type: ReportType::Internal,
        parameters: json!({}),
    };

    for id in [JUNIOR_FACULTY_ID, DEMO_STUDENT_ID] {
        let viewer = profile(&gateway, id).await;
        let requested = request_report(&gateway, &viewer, &request).await;
        assert!(matches!(requested, Err(WorkflowError::AccessDenied(_))));
        let listed = list_reports(&gateway, &viewer).await;
        assert!(matches!(listed, Err(WorkflowError::AccessDenied(_))));
        let deleted = delete_report(&gateway, &viewer, "rep-1").await;
        assert!(matches!(deleted, Err(WorkflowError::AccessDenied(_))));
    }

    let untitled = ReportRequest { title: "   ".to_string(), ..request };
    let senior = profile(&gateway, SENIOR_FACULTY_ID).await;
    let result = request_report(&gateway, &senior, &untitled).await;
    assert!(matches!(result, Err(WorkflowError::Validation(ValidationError::MissingTitle))));
}

#[tokio::test]
async fn session_signs_in_against_fixtures() {
    let mut state = AppState::connect(DataSource::Fixture, "", "").expect("fixture state");
    assert_eq!(state.source(), DataSource::Fixture);
    assert_eq!(state.gateway().kind(), "memory");

    let name = state.start(DEMO_STUDENT_ID).await.expect("start").full_name.clone();
    assert_eq!(name, "Alice Johnson");

    let unknown = state.start("nobody").await;
    assert!(matches!(unknown, Err(WorkflowError::Store(StoreError::NotFound { .. }))));

    assert!(matches!(AppState::connect(DataSource::Live, "", ""), Err(StoreError::NotConfigured)));
}
