//! Publish and save-draft against a fake repository

mod common;

use std::time::Duration;

use common::fixtures::load_record_fixture;
use common::{session_with, test_config, FakeRepository};
use vedra_editor::{
    CancelToken, EditingSession, EditorError, LifecycleState, RepositoryError, StaticIdentity,
};
use vedra_identifiers::SequentialIdGenerator;

fn publishable(repo: FakeRepository) -> common::TestSession {
    session_with(repo).with_record(load_record_fixture("publishable.json"))
}

#[tokio::test]
async fn test_draft_id_reused_for_publish() {
    let repo = FakeRepository::new().with_doi("10.1234/vedra.42");
    let mut s = publishable(repo.clone());
    let cancel = CancelToken::new();

    let first = s.save_draft(&cancel).await.unwrap();
    assert_eq!(first.draft_id, "draft-1");
    let second = s.save_draft(&cancel).await.unwrap();
    assert_eq!(second.draft_id, "draft-1");
    assert_eq!(repo.drafts_saved(), 2);
    assert_eq!(s.state(), LifecycleState::Editing);

    let receipt = s.publish(&cancel).await.unwrap();
    assert_eq!(receipt.record_id, "draft-1");
    assert_eq!(receipt.doi_url().as_deref(), Some("https://doi.org/10.1234/vedra.42"));
    assert_eq!(
        s.share_link().as_deref(),
        Some("https://vedra.com/records/draft-1")
    );
}

#[tokio::test]
async fn test_publish_from_preview() {
    let mut s = publishable(FakeRepository::new());
    s.preview().unwrap();
    s.publish(&CancelToken::new()).await.unwrap();
    assert_eq!(s.state(), LifecycleState::Published);
    assert!(s.state().is_terminal());
}

#[tokio::test]
async fn test_transport_failure_returns_to_editing() {
    let repo = FakeRepository::failing(RepositoryError::Status {
        status: 503,
        body: "maintenance".to_string(),
    });
    let mut s = publishable(repo.clone());
    let before = s.record().clone();

    let err = s.publish(&CancelToken::new()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(s.state(), LifecycleState::Editing);
    assert_eq!(s.record(), &before);
    assert_eq!(s.last_errors().len(), 1);
    assert!(s.last_errors()[0].contains("503"));
    assert!(s.published().is_none());
    assert!(s.share_link().is_none());
}

#[tokio::test]
async fn test_failed_submit_keeps_draft_for_retry() {
    let repo = FakeRepository::failing_publish(RepositoryError::Status {
        status: 500,
        body: "boom".to_string(),
    });
    let mut s = publishable(repo.clone());
    let cancel = CancelToken::new();

    let err = s.publish(&cancel).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(s.state(), LifecycleState::Editing);
    assert_eq!(s.draft_id(), Some("draft-1"));
    assert_eq!(repo.drafts_saved(), 1);

    s.publish(&cancel).await.unwrap_err();
    assert_eq!(repo.drafts_saved(), 1);
    assert_eq!(s.draft_id(), Some("draft-1"));
}

#[tokio::test]
async fn test_dropped_publish_returns_to_editing() {
    let repo = FakeRepository::new().with_delay(Duration::from_secs(5));
    let mut s = publishable(repo.clone());
    let cancel = CancelToken::new();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), s.publish(&cancel)).await;
    assert!(abandoned.is_err());

    assert_eq!(s.state(), LifecycleState::Editing);
    assert!(!s.is_busy());
    assert_eq!(s.last_errors(), [EditorError::Cancelled.to_string()]);
    assert!(repo.published().is_empty());
    s.add_keyword("after").unwrap();
    s.preview().unwrap();
}

#[tokio::test]
async fn test_unauthorized_is_not_retryable() {
    let mut s = publishable(FakeRepository::failing(RepositoryError::Unauthorized));
    let err = s.save_draft(&CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, EditorError::Transport(RepositoryError::Unauthorized)));
    assert!(!err.is_retryable());
    assert_eq!(s.draft_id(), None);
}

#[tokio::test]
async fn test_publish_times_out() {
    let repo = FakeRepository::new().with_delay(Duration::from_secs(5));
    let mut config = test_config();
    config.api.timeout_secs = 1;
    let mut s = EditingSession::with_id_generator(
        repo.clone(),
        StaticIdentity::new(common::test_identity()),
        config,
        SequentialIdGenerator::new(),
    )
    .with_record(load_record_fixture("publishable.json"));

    let err = s.publish(&CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, EditorError::Transport(RepositoryError::Timeout)));
    assert!(err.is_retryable());
    assert_eq!(s.state(), LifecycleState::Editing);
    assert!(repo.published().is_empty());
}

#[tokio::test]
async fn test_cancelled_publish_leaves_record() {
    let repo = FakeRepository::new().with_delay(Duration::from_secs(5));
    let mut s = publishable(repo.clone());
    let before = s.record().clone();

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = s.publish(&cancel).await.unwrap_err();
    assert!(matches!(err, EditorError::Cancelled));
    assert_eq!(s.state(), LifecycleState::Editing);
    assert_eq!(s.record(), &before);
    assert!(repo.published().is_empty());

    // A fresh token lets the user try again
    let retry = FakeRepository::new();
    let mut s = publishable(retry);
    assert!(s.publish(&CancelToken::new()).await.is_ok());
}

#[tokio::test]
async fn test_anonymous_session_cannot_save() {
    let mut s = EditingSession::with_id_generator(
        FakeRepository::new(),
        StaticIdentity::anonymous(),
        test_config(),
        SequentialIdGenerator::new(),
    );
    assert!(matches!(
        s.save_draft(&CancelToken::new()).await,
        Err(EditorError::NotAuthenticated)
    ));
}
