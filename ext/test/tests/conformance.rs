//! Conformance tests that run YAML fixtures against prefmatch
//!
//! Run with: cargo test -p prefmatch-test --test conformance
//!
//! Note: This test file requires the `fixtures` feature (on by default).

#![cfg(feature = "fixtures")]

use prefmatch_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// The fixtures directory next to this crate's manifest
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run one fixture file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    println!("Running fixture: {}", path.display());

    let yaml = fs::read_to_string(&path).expect("read yaml");

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} has no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_paths() {
    run_fixture_file("01_paths.yaml");
}

#[test]
fn test_operators() {
    run_fixture_file("02_operators.yaml");
}

#[test]
fn test_patterns() {
    run_fixture_file("03_patterns.yaml");
}

#[test]
fn test_semantics() {
    run_fixture_file("04_semantics.yaml");
}

#[test]
fn test_every_fixture_file_is_covered() {
    let mut files: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    files.sort();
    assert_eq!(
        files,
        [
            "01_paths.yaml",
            "02_operators.yaml",
            "03_patterns.yaml",
            "04_semantics.yaml"
        ]
    );
}
