//! Integration tests for the record store backends

use campus_records::core::models::{
    Certificate, CertificateStatus, InstitutionalReport, ReportStatus,
};
use campus_records::core::store::{
    DataSource, Gateway, MemoryStore, Query, RecordStore, RestStore, StoreError, Table,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer one HTTP request with a canned response and hand back the raw request
async fn serve_once(
    status: &'static str,
    extra_headers: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\n{extra_headers}content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        String::from_utf8_lossy(&request).to_string()
    });
    (format!("http://{addr}"), handle)
}

#[tokio::test]
async fn rest_fetch_sends_filters_and_key() {
    let (endpoint, server) = serve_once(
        "200 OK",
        "content-type: application/json\r\n",
        r#"[{"id":"n1","user_id":"u1","title":"Hi","message":"Body","type":"message",
            "read_at":null,"created_at":"2024-04-01T10:00:00Z"}]"#,
    )
    .await;
    let store = RestStore::new(&endpoint, "anon-key").expect("store");

    let query = Query::new().eq("user_id", "u1").order_desc("created_at").limit(10);
    let rows = store.fetch(Table::Notifications, &query).await.expect("fetch");
    assert_eq!(rows.len(), 1);

    let request = server.await.expect("server").to_ascii_lowercase();
    assert!(request.starts_with(
        "get /rest/v1/notifications?select=*&user_id=eq.u1&order=created_at.desc&limit=10 "
    ));
    assert!(request.contains("apikey: anon-key"));
    assert!(request.contains("authorization: bearer anon-key"));
}

#[tokio::test]
async fn rest_count_reads_content_range() {
    let (endpoint, server) = serve_once("200 OK", "content-range: 0-2/3\r\n", "").await;
    let store = RestStore::new(&endpoint, "anon-key").expect("store");

    let total = store
        .count(Table::Profiles, &Query::new().eq("role", "student"))
        .await
        .expect("count");
    assert_eq!(total, 3);

    let request = server.await.expect("server").to_ascii_lowercase();
    assert!(request.starts_with("head /rest/v1/profiles?role=eq.student "));
    assert!(request.contains("prefer: count=exact"));
}

#[tokio::test]
async fn rest_insert_asks_for_representation() {
    let (endpoint, server) = serve_once(
        "201 Created",
        "content-type: application/json\r\n",
        r#"[{"id":"rep-9","title":"Cycle 3","report_type":"nirf","status":"generating",
            "created_at":"2024-06-01T00:00:00Z"}]"#,
    )
    .await;
    let gateway = Gateway::connect(DataSource::Live, &endpoint, "anon-key").expect("gateway");

    let report: InstitutionalReport = gateway
        .insert(Table::InstitutionalReports, &json!({"title": "Cycle 3", "report_type": "nirf"}))
        .await
        .expect("insert");
    assert_eq!(report.id, "rep-9");
    assert_eq!(report.status, ReportStatus::Generating);

    let request = server.await.expect("server");
    let lower = request.to_ascii_lowercase();
    assert!(lower.starts_with("post /rest/v1/institutional_reports "));
    assert!(lower.contains("prefer: return=representation"));
    assert!(request.contains(r#""title":"Cycle 3""#));
}

#[tokio::test]
async fn rest_error_status_is_surfaced() {
    let (endpoint, server) =
        serve_once("404 Not Found", "", r#"{"message":"relation does not exist"}"#).await;
    let store = RestStore::new(&endpoint, "anon-key").expect("store");

    let result = store.fetch(Table::Certificates, &Query::new()).await;
    match result {
        Err(StoreError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("relation does not exist"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    server.await.expect("server");
}

#[tokio::test]
async fn rest_skips_requests_that_cannot_match() {
    // No server: an empty IN list must not touch the network
    let store = RestStore::new("http://127.0.0.1:9", "anon-key").expect("store");
    let query = Query::new().in_list("student_id", Vec::<String>::new());
    assert!(store.fetch(Table::Certificates, &query).await.expect("fetch").is_empty());
    assert_eq!(store.count(Table::Certificates, &query).await.expect("count"), 0);
    assert_eq!(store.update(Table::Certificates, &query, json!({})).await.expect("update"), 0);
}

#[tokio::test]
async fn live_source_needs_an_endpoint() {
    assert!(matches!(RestStore::new("  ", "key"), Err(StoreError::NotConfigured)));
    assert!(matches!(Gateway::connect(DataSource::Live, "", ""), Err(StoreError::NotConfigured)));
    assert_eq!(Gateway::connect(DataSource::Fixture, "", "").expect("fixture").kind(), "memory");
}

#[tokio::test]
async fn memory_insert_fills_backend_defaults() {
    let gateway = Gateway::new(std::sync::Arc::new(MemoryStore::new()));

    let certificate: Certificate = gateway
        .insert(
            Table::Certificates,
            &json!({
                "student_id": "stu-1", "title": "Award", "category": "academic",
                "file_url": "memory://certificates/a.pdf", "file_name": "a.pdf"
            }),
        )
        .await
        .expect("insert");
    assert_eq!(certificate.status, CertificateStatus::Pending);
    assert!(!certificate.id.is_empty());
    assert!(certificate.verified_by.is_none());

    let again: Certificate =
        gateway.fetch_one(Table::Certificates, &certificate.id).await.expect("fetch");
    assert_eq!(again, certificate);
}

#[tokio::test]
async fn memory_summary_view_is_read_only() {
    let gateway = Gateway::fixture();
    let result: Result<serde_json::Value, _> = gateway
        .insert(Table::StudentAchievementsSummary, &json!({"student_id": "x"}))
        .await;
    assert!(matches!(result, Err(StoreError::ReadOnly(Table::StudentAchievementsSummary))));

    let updated = gateway
        .update_where(
            Table::StudentAchievementsSummary,
            &Query::new(),
            json!({"total_credits": 99}),
        )
        .await;
    assert!(matches!(updated, Err(StoreError::ReadOnly(_))));
}

#[tokio::test]
async fn memory_update_and_delete_by_id() {
    let gateway = Gateway::fixture();

    let missing = gateway.update(Table::Certificates, "nope", json!({"title": "x"})).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));

    gateway.delete(Table::InstitutionalReports, "rep-1").await.expect("delete");
    let remaining = gateway
        .count(Table::InstitutionalReports, &Query::new())
        .await
        .expect("count");
    assert_eq!(remaining, 0);
}
