//! Integration tests for catalog loading from disk, including the catalog
//! shipped in `config/`.

use std::io::Write;
use std::path::PathBuf;

use assert_matches::assert_matches;
use infracheck_core::probe::shell::ShellProbeRunner;
use infracheck_core::{
    CatalogError, Category, CheckCatalog, CheckOrchestrator, CheckType, RunOptions, Status,
};
use tokio_util::sync::CancellationToken;

fn shipped_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/check_items.yaml")
}

// ---------------------------------------------------------------------------
// Test: loading from a file
// ---------------------------------------------------------------------------

/// A catalog file is read, sections are stamped and null sections are empty.
#[test]
fn loads_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
check_items:
  os:
    - id: OS-001
      name: Disk usage
      command: df -h /
      threshold: 80
      unit: "%"
  kubernetes:
  services:
    - id: SVC-001
      name: Deployments
      command: kubectl get deploy
      check_type: replica_match
"#
    )
    .expect("write catalog");

    let catalog = CheckCatalog::from_path(file.path()).expect("catalog loads");
    assert_eq!(catalog.len(), 2);
    assert!(catalog.section(Category::Kubernetes).is_empty());

    let svc = &catalog.section(Category::Services)[0];
    assert_eq!(svc.category, Category::Services);
    assert_eq!(svc.check_type, Some(CheckType::ReplicaMatch));
}

/// A missing file surfaces as `CatalogError::Io` naming the path.
#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.yaml");

    let err = CheckCatalog::from_path(&path).expect_err("missing file");
    assert_matches!(err, CatalogError::Io { ref path, .. } if path.ends_with("absent.yaml"));
}

/// Broken YAML surfaces as `CatalogError::Parse`.
#[test]
fn invalid_yaml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "check_items: [unclosed").expect("write catalog");

    let err = CheckCatalog::from_path(file.path()).expect_err("invalid yaml");
    assert_matches!(err, CatalogError::Parse(_));
}

// ---------------------------------------------------------------------------
// Test: shipped catalog
// ---------------------------------------------------------------------------

/// The shipped catalog holds ten items per category.
#[test]
fn shipped_catalog_has_thirty_items() {
    let catalog = CheckCatalog::from_path(shipped_catalog_path()).expect("shipped catalog loads");
    assert_eq!(catalog.len(), 30);
    for category in Category::ALL {
        assert_eq!(catalog.section(category).len(), 10, "{category}");
    }
}

/// Only the three workload checks use replica matching.
#[test]
fn shipped_catalog_replica_items_are_services() {
    let catalog = CheckCatalog::from_path(shipped_catalog_path()).expect("shipped catalog loads");
    let replica_ids: Vec<&str> = catalog
        .entries()
        .filter(|item| item.check_type == Some(CheckType::ReplicaMatch))
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(replica_ids, vec!["SVC-001", "SVC-002", "SVC-003"]);
}

/// A demo run over the shipped catalog is complete and all `OK`.
#[tokio::test]
async fn shipped_catalog_demo_run_is_healthy() {
    let catalog = CheckCatalog::from_path(shipped_catalog_path()).expect("shipped catalog loads");
    let options = RunOptions {
        demo_mode: true,
        ..RunOptions::default()
    };
    let run = CheckOrchestrator::new(catalog, ShellProbeRunner::new(), options)
        .run(&CancellationToken::new())
        .await;

    assert!(run.is_complete());
    assert_eq!(run.summary.total, 30);
    assert_eq!(run.summary.counts.get(Status::Ok), 30);
    assert_eq!(run.summary.exit_code(), 0);
}
