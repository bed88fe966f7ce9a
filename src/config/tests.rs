//! Tests for config functionality.

use crate::config::{Config, MissingGroupPolicy};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.store_root, ".artifacts");
    assert_eq!(config.project, "nyc_airbnb");
    assert!(config.entity.is_none());
    assert_eq!(config.validation.csv, "clean_sample.csv:latest");
    assert_eq!(config.validation.reference, "clean_sample.csv:reference");
    assert_eq!(config.validation.kl_threshold, 0.2);
    assert_eq!(config.validation.min_price, 10.0);
    assert_eq!(config.validation.max_price, 350.0);
    assert_eq!(config.validation.min_rows, 15_000);
    assert_eq!(config.validation.max_rows, 1_000_000);
    assert_eq!(
        config.validation.missing_group_policy,
        MissingGroupPolicy::Fail
    );
    assert!(!config.validation.fail_fast);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.project, "nyc_airbnb");
    assert_eq!(config.validation.kl_threshold, 0.2);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
project: listings_dev
validation:
  kl_threshold: 0.05
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.project, "listings_dev");
    assert_eq!(config.validation.kl_threshold, 0.05);

    // Unspecified values should use defaults
    assert_eq!(config.store_root, ".artifacts");
    assert_eq!(config.validation.max_price, 350.0);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
store_root: /data/store
project: nyc
entity: data-team
validation:
  csv: "clean_sample.csv:v4"
  reference: "clean_sample.csv:v1"
  kl_threshold: 0.1
  min_price: 20
  max_price: 500
  min_rows: 100
  max_rows: 2000
  missing_group_policy: skip
  fail_fast: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.store_root, "/data/store");
    assert_eq!(config.project, "nyc");
    assert_eq!(config.entity.as_deref(), Some("data-team"));
    assert_eq!(config.validation.csv, "clean_sample.csv:v4");
    assert_eq!(config.validation.reference, "clean_sample.csv:v1");
    assert_eq!(config.validation.kl_threshold, 0.1);
    assert_eq!(config.validation.min_price, 20.0);
    assert_eq!(config.validation.max_price, 500.0);
    assert_eq!(config.validation.min_rows, 100);
    assert_eq!(config.validation.max_rows, 2000);
    assert_eq!(
        config.validation.missing_group_policy,
        MissingGroupPolicy::Skip
    );
    assert!(config.validation.fail_fast);
}

#[test]
fn test_parse_yaml_with_unknown_fields() {
    let yaml = r#"
project: nyc
unknown_field: "some value"
etl:
  sample: sample1.csv
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.project, "nyc");
    assert_eq!(config.store_root, ".artifacts");
}

#[test]
fn test_validate_kl_threshold_range() {
    for bad in ["0", "1", "-0.5", "1.5"] {
        let yaml = format!("validation:\n  kl_threshold: {}\n", bad);
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("kl_threshold"), "{}", bad);
    }
}

#[test]
fn test_validate_price_bounds_ordered() {
    let yaml = r#"
validation:
  min_price: 400
  max_price: 350
"#;
    let err = Config::from_yaml(yaml).unwrap_err();

    assert!(err.to_string().contains("min_price"));
    assert!(err.to_string().contains("must not exceed"));
}

#[test]
fn test_validate_row_bounds_ordered() {
    let yaml = r#"
validation:
  min_rows: 10
  max_rows: 10
"#;
    let err = Config::from_yaml(yaml).unwrap_err();

    assert!(err.to_string().contains("min_rows"));
}

#[test]
fn test_validate_reference_syntax() {
    let yaml = r#"
validation:
  reference: "clean sample:v1"
"#;
    let err = Config::from_yaml(yaml).unwrap_err();

    assert!(err.to_string().contains("validation.reference"));
}

#[test]
fn test_validate_empty_store_root() {
    let err = Config::from_yaml("store_root: \"  \"").unwrap_err();
    assert!(err.to_string().contains("store_root"));
}

#[test]
fn test_missing_group_policy_from_str() {
    assert_eq!(
        MissingGroupPolicy::from_str("fail"),
        Some(MissingGroupPolicy::Fail)
    );
    assert_eq!(
        MissingGroupPolicy::from_str("skip"),
        Some(MissingGroupPolicy::Skip)
    );
    assert_eq!(MissingGroupPolicy::from_str("ignore"), None);
    assert_eq!(MissingGroupPolicy::Skip.to_string(), "skip");
}

#[test]
fn test_to_yaml() {
    let config = Config::default();
    let yaml = config.to_yaml().unwrap();

    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.project, config.project);
    assert_eq!(parsed.validation.kl_threshold, config.validation.kl_threshold);
}

#[test]
fn test_config_load_from_file() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "project: from_file").unwrap();
    writeln!(file, "store_root: /tmp/listings-store").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.project, "from_file");
    assert_eq!(config.store_root, "/tmp/listings-store");
}

#[test]
fn test_config_load_missing_file() {
    let err = Config::load("/nonexistent/path/listings.yaml").unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_resolve_explicit_missing_file_is_error() {
    let path = std::path::Path::new("/nonexistent/path/listings.yaml");
    assert!(Config::resolve(Some(path)).is_err());
}
