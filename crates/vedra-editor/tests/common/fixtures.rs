//! Test fixture loading utilities

use std::path::PathBuf;

use vedra_domain::Record;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a record fixture
pub fn load_record_fixture(name: &str) -> Record {
    let json = load_fixture(&format!("records/{}", name));
    Record::from_json(&json).unwrap_or_else(|e| panic!("Invalid record fixture {}: {}", name, e))
}
