//! Shared helpers for vedra-editor integration tests

#![allow(dead_code)]

pub mod fake_repository;
pub mod fixtures;

use vedra_editor::{EditingSession, EditorConfig, Identity, MisusePolicy, StaticIdentity};
use vedra_identifiers::SequentialIdGenerator;

pub use fake_repository::FakeRepository;

pub type TestSession = EditingSession<FakeRepository, StaticIdentity, SequentialIdGenerator>;

pub fn test_identity() -> Identity {
    Identity::new("user-1", "Jane Doe", "jane@example.org").with_token("test-token")
}

/// Config with misuse errors returned instead of panicking
pub fn test_config() -> EditorConfig {
    EditorConfig {
        misuse: MisusePolicy::Ignore,
        ..EditorConfig::default()
    }
}

pub fn session_with(repository: FakeRepository) -> TestSession {
    EditingSession::with_id_generator(
        repository,
        StaticIdentity::new(test_identity()),
        test_config(),
        SequentialIdGenerator::new(),
    )
}

pub fn session() -> TestSession {
    session_with(FakeRepository::new())
}
