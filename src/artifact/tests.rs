//! Tests for the filesystem artifact store.

use super::*;
use crate::error::PipelineError;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn store_with_file(name: &str, content: &str) -> (TempDir, FsArtifactStore, PathBuf) {
    let temp = TempDir::new().unwrap();
    let store = FsArtifactStore::new(temp.path().join("store"));
    let file = temp.path().join(name);
    fs::write(&file, content).unwrap();
    (temp, store, file)
}

fn draft(file: &Path) -> ArtifactDraft {
    ArtifactDraft::new("sample.csv", "raw_data", "Raw listings sample").with_file(file)
}

#[test]
fn test_publish_creates_first_version_and_latest_alias() {
    let (_temp, store, file) = store_with_file("sample.csv", "id,price\n1,100\n");

    let manifest = store.publish(&draft(&file)).unwrap();

    assert_eq!(manifest.name, "sample.csv");
    assert_eq!(manifest.version, 1);
    assert_eq!(manifest.artifact_type, "raw_data");
    assert_eq!(manifest.aliases, vec!["latest".to_string()]);
    assert_eq!(manifest.files.len(), 1);
    assert_eq!(manifest.files[0].path, "sample.csv");
    assert!(manifest.files[0].digest.starts_with("sha256:"));
    assert_eq!(manifest.files[0].size, 15);
    assert!(
        store
            .root()
            .join("artifacts/sample.csv/v1/manifest.json")
            .exists()
    );
}

#[test]
fn test_publish_identical_content_reuses_version() {
    let (_temp, store, file) = store_with_file("sample.csv", "id,price\n1,100\n");

    let first = store.publish(&draft(&file)).unwrap();
    let second = store.publish(&draft(&file)).unwrap();

    assert_eq!(first.version, second.version);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_publish_changed_content_bumps_version() {
    let (_temp, store, file) = store_with_file("sample.csv", "id,price\n1,100\n");

    store.publish(&draft(&file)).unwrap();
    fs::write(&file, "id,price\n1,100\n2,200\n").unwrap();
    let second = store.publish(&draft(&file)).unwrap();

    assert_eq!(second.version, 2);
    let v1 = store.resolve(&ArtifactRef::parse("sample.csv:v1").unwrap()).unwrap();
    assert!(v1.aliases.is_empty());
    let latest = store.resolve(&ArtifactRef::parse("sample.csv").unwrap()).unwrap();
    assert_eq!(latest.version, 2);
}

#[test]
fn test_publish_keeps_metadata() {
    let (_temp, store, file) = store_with_file("sample.csv", "id\n1\n");

    let manifest = store
        .publish(&draft(&file).with_metadata("rows", json!(1)))
        .unwrap();
    let resolved = store.resolve(&manifest.reference()).unwrap();

    assert_eq!(resolved.metadata["rows"], json!(1));
    assert_eq!(resolved.description, "Raw listings sample");
}

#[test]
fn test_publish_rejects_invalid_drafts() {
    let (_temp, store, file) = store_with_file("sample.csv", "id\n1\n");

    let no_files = ArtifactDraft::new("sample.csv", "raw_data", "");
    assert!(store.publish(&no_files).is_err());

    let bad_name = ArtifactDraft::new("bad name", "raw_data", "").with_file(&file);
    assert!(store.publish(&bad_name).is_err());

    let no_type = ArtifactDraft::new("sample.csv", " ", "").with_file(&file);
    assert!(store.publish(&no_type).is_err());

    let duplicate = draft(&file).with_file(&file);
    let err = store.publish(&duplicate).unwrap_err();
    assert!(err.to_string().contains("twice"));
}

#[test]
fn test_resolve_unknown_artifact() {
    let temp = TempDir::new().unwrap();
    let store = FsArtifactStore::new(temp.path());

    let err = store
        .resolve(&ArtifactRef::parse("missing.csv:latest").unwrap())
        .unwrap_err();

    assert!(matches!(err, PipelineError::ArtifactError(_)));
    assert!(err.to_string().contains("missing.csv:latest"));
}

#[test]
fn test_resolve_unknown_version_lists_available() {
    let (_temp, store, file) = store_with_file("sample.csv", "id\n1\n");
    store.publish(&draft(&file)).unwrap();

    let err = store
        .resolve(&ArtifactRef::parse("sample.csv:v7").unwrap())
        .unwrap_err();

    assert!(err.to_string().contains("Available: v1, latest"));
}

#[test]
fn test_set_alias_and_resolve_by_alias() {
    let (_temp, store, file) = store_with_file("sample.csv", "id\n1\n");
    store.publish(&draft(&file)).unwrap();
    fs::write(&file, "id\n1\n2\n").unwrap();
    store.publish(&draft(&file)).unwrap();

    let tagged = store
        .set_alias(&ArtifactRef::parse("sample.csv:v1").unwrap(), "reference")
        .unwrap();
    assert_eq!(tagged.aliases, vec!["reference".to_string()]);

    let resolved = store
        .resolve(&ArtifactRef::parse("sample.csv:reference").unwrap())
        .unwrap();
    assert_eq!(resolved.version, 1);

    assert!(
        store
            .set_alias(&ArtifactRef::parse("sample.csv:v1").unwrap(), "v3")
            .is_err()
    );
}

#[test]
fn test_download_materializes_files() {
    let (temp, store, file) = store_with_file("sample.csv", "id,price\n1,100\n");
    let manifest = store.publish(&draft(&file)).unwrap();

    let dest = temp.path().join("download");
    let dir = store.download(&manifest, &dest).unwrap();

    let downloaded = dir.join("sample.csv");
    assert_eq!(fs::read_to_string(downloaded).unwrap(), "id,price\n1,100\n");
}

#[test]
fn test_download_detects_tampered_blob() {
    let (temp, store, file) = store_with_file("sample.csv", "id,price\n1,100\n");
    let manifest = store.publish(&draft(&file)).unwrap();

    let hex = manifest.files[0].digest.trim_start_matches("sha256:");
    let blob = store
        .root()
        .join("blobs/sha256")
        .join(&hex[0..2])
        .join(&hex[2..4])
        .join(hex);
    fs::write(&blob, "tampered").unwrap();

    let err = store
        .download(&manifest, &temp.path().join("download"))
        .unwrap_err();
    assert!(err.to_string().contains("does not match"));
}

#[test]
fn test_list_sorted_by_name_then_version() {
    let temp = TempDir::new().unwrap();
    let store = FsArtifactStore::new(temp.path().join("store"));
    let a = temp.path().join("b.csv");
    let b = temp.path().join("a.csv");
    fs::write(&a, "x\n1\n").unwrap();
    fs::write(&b, "x\n2\n").unwrap();

    store
        .publish(&ArtifactDraft::new("b.csv", "raw", "").with_file(&a))
        .unwrap();
    store
        .publish(&ArtifactDraft::new("a.csv", "raw", "").with_file(&b))
        .unwrap();
    fs::write(&b, "x\n3\n").unwrap();
    store
        .publish(&ArtifactDraft::new("a.csv", "raw", "").with_file(&b))
        .unwrap();

    let listed: Vec<String> = store
        .list()
        .unwrap()
        .iter()
        .map(|m| m.reference().to_string())
        .collect();
    assert_eq!(listed, vec!["a.csv:v1", "a.csv:v2", "b.csv:v1"]);
}

#[test]
fn test_runs_dir_under_root() {
    let store = FsArtifactStore::new("/data/store");
    assert_eq!(store.runs_dir(), PathBuf::from("/data/store/runs"));
}
