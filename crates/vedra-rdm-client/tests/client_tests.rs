//! RdmClient against a scripted local server

mod common;

use common::{load_response_fixture, serve};
use vedra_domain::{Creator, Record, Title};
use vedra_editor::{
    ApiConfig, CancelToken, CollectionPath, EditingSession, EditorConfig, EditorError, Identity,
    LifecycleState, MetadataRepository, MisusePolicy, RepositoryError, StaticIdentity,
};
use vedra_rdm_client::{HttpError, RdmClient};

fn client(base: &str) -> RdmClient {
    RdmClient::new(&ApiConfig {
        base_url: base.to_string(),
        timeout_secs: 5,
        ..ApiConfig::default()
    })
    .unwrap()
}

fn identity() -> Identity {
    Identity::new("7", "Jane Doe", "jane@example.org").with_token("secret")
}

#[tokio::test]
async fn test_publish_without_draft_creates_then_publishes() {
    let (base, seen) = serve(vec![
        (201, load_response_fixture("draft_created.json")),
        (202, load_response_fixture("record_published.json")),
    ])
    .await;

    let receipt = client(&base)
        .publish(&Record::new(), None, &identity())
        .await
        .unwrap();
    assert_eq!(receipt.record_id, "abcd-1234");
    assert_eq!(receipt.doi.as_deref(), Some("10.1234/abcd-1234"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/api/records");
    assert_eq!(seen[0].header("authorization"), Some("Bearer secret"));
    assert_eq!(seen[0].header("user-agent"), Some("vedra/0.1"));
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body["access"]["record"], "public");
    assert_eq!(body["metadata"]["recommendedInformation"]["languages"][0], "eng");
    assert_eq!(seen[1].method, "POST");
    assert_eq!(seen[1].path, "/api/records/abcd-1234/draft/actions/publish");
}

#[tokio::test]
async fn test_save_existing_draft_uses_put() {
    let (base, seen) = serve(vec![(200, load_response_fixture("draft_created.json"))]).await;

    let receipt = client(&base)
        .save_draft(&Record::new(), Some("abcd-1234"), &identity())
        .await
        .unwrap();
    assert_eq!(receipt.draft_id, "abcd-1234");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].path, "/api/records/abcd-1234/draft");
}

#[tokio::test]
async fn test_status_errors_map_to_repository_errors() {
    let (base, _) = serve(vec![
        (403, r#"{"message":"Permission denied."}"#.to_string()),
        (503, "maintenance".to_string()),
    ])
    .await;
    let c = client(&base);

    let err = c.save_draft(&Record::new(), None, &identity()).await.unwrap_err();
    assert_eq!(err, RepositoryError::Unauthorized);

    let err = c.save_draft(&Record::new(), None, &identity()).await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Status {
            status: 503,
            body: "maintenance".to_string()
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_response_is_parse_error() {
    let (base, _) = serve(vec![(201, "{not json".to_string())]).await;
    let err = client(&base)
        .save_draft(&Record::new(), None, &identity())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Parse(_)));
}

#[tokio::test]
async fn test_search_records() {
    let (base, seen) = serve(vec![(200, load_response_fixture("search.json"))]).await;
    let results = client(&base).search_records("tides", 10, 2).await.unwrap();
    assert_eq!(results.hits.total, 2);
    assert_eq!(results.hits.hits[0].title(), Some("Tide gauge records"));
    assert!(results.aggregations.is_some());

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].path, "/api/records?q=tides&size=10&page=2");
    assert_eq!(seen[0].header("authorization"), None);
}

#[tokio::test]
async fn test_record_files_and_download() {
    let (base, seen) = serve(vec![
        (200, load_response_fixture("files.json")),
        (200, "a,b\n1,2\n".to_string()),
        (404, r#"{"status":404}"#.to_string()),
    ])
    .await;
    let c = client(&base);

    let files = c.get_record_files("abcd-1234").await.unwrap();
    assert_eq!(files.entries.len(), 2);
    assert_eq!(files.total_size(), 1048576 + 2048);

    let bytes = c.download_file("abcd-1234", "my data.csv").await.unwrap();
    assert_eq!(bytes, b"a,b\n1,2\n");

    let err = c.get_record("missing").await.unwrap_err();
    assert!(matches!(err, HttpError::NotFound { ref what } if what == "record missing"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[1].path, "/api/records/abcd-1234/files/my%20data.csv/content");
}

#[tokio::test]
async fn test_create_upload_slot() {
    let slot_json = r#"{
        "uploadUrl": "https://mock-s3.example.com/papers/1--paper.pdf",
        "objectKey": "papers/1--paper.pdf",
        "uploaderId": 7,
        "uploaderName": "Jane Doe",
        "role": "researcher",
        "scopeCode": "UNI1",
        "message": "Mock upload endpoint"
    }"#;
    let (base, seen) = serve(vec![(200, slot_json.to_string())]).await;

    let slot = client(&base)
        .create_upload("paper.pdf", "application/pdf", &identity())
        .await
        .unwrap();
    assert_eq!(slot.object_key, "papers/1--paper.pdf");
    assert_eq!(slot.uploader_name.as_deref(), Some("Jane Doe"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].path, "/papers/uploads");
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body["filename"], "paper.pdf");
    assert_eq!(body["content_type"], "application/pdf");
}

#[tokio::test]
async fn test_unreachable_server_is_retryable() {
    let err = client("http://127.0.0.1:9")
        .save_draft(&Record::new(), None, &identity())
        .await
        .unwrap_err();
    assert!(err.is_retryable(), "{:?}", err);
}

#[tokio::test]
async fn test_session_retry_reuses_draft_after_failed_publish() {
    let (base, seen) = serve(vec![
        (201, load_response_fixture("draft_created.json")),
        (200, load_response_fixture("draft_created.json")),
        (500, "publish backend down".to_string()),
        (200, load_response_fixture("draft_created.json")),
        (202, load_response_fixture("record_published.json")),
    ])
    .await;

    let config = EditorConfig {
        misuse: MisusePolicy::Ignore,
        api: ApiConfig {
            base_url: base.clone(),
            timeout_secs: 5,
            ..ApiConfig::default()
        },
        ..EditorConfig::default()
    };
    let mut session = EditingSession::new(client(&base), StaticIdentity::new(identity()), config);
    session
        .add_item(CollectionPath::Titles, Title::new("Tide gauge records"))
        .unwrap();
    session
        .add_item(CollectionPath::Creators, Creator::new("Doe, Jane"))
        .unwrap();
    let cancel = CancelToken::new();

    let err = session.publish(&cancel).await.unwrap_err();
    assert!(matches!(
        err,
        EditorError::Transport(RepositoryError::Status { status: 500, .. })
    ));
    assert!(err.is_retryable());
    assert_eq!(session.state(), LifecycleState::Editing);
    assert_eq!(session.draft_id(), Some("abcd-1234"));

    let receipt = session.publish(&cancel).await.unwrap();
    assert_eq!(receipt.record_id, "abcd-1234");
    assert_eq!(session.state(), LifecycleState::Published);

    let seen = seen.lock().unwrap();
    let creates = seen
        .iter()
        .filter(|r| r.method == "POST" && r.path == "/api/records")
        .count();
    assert_eq!(creates, 1);
    assert_eq!(seen[3].method, "PUT");
    assert_eq!(seen[3].path, "/api/records/abcd-1234/draft");
    assert_eq!(seen[4].path, "/api/records/abcd-1234/draft/actions/publish");
}
