use std::fs;

use bindery_core::config::{BinderyConfig, ConfigError, ConfigValue};
use bindery_core::BindOptions;
use serial_test::serial;

#[test]
fn test_empty_config() {
    let config = BinderyConfig::empty();
    assert!(matches!(
        config.get::<String>("nonexistent"),
        Err(ConfigError::NotFound(_))
    ));
    assert_eq!(config.profile(), "test");
}

#[test]
fn test_set_and_get() {
    let mut config = BinderyConfig::empty();
    config.set("openapi.title", ConfigValue::String("Pets".into()));
    assert_eq!(config.get::<String>("openapi.title").unwrap(), "Pets");
    assert!(config.contains_key("openapi.title"));
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
bindery:
  form:
    limit: 1024
  errors:
    detail: false
openapi:
  title: "Pet store"
"#;
    let config = BinderyConfig::from_yaml_str(yaml, "dev").unwrap();
    assert_eq!(config.get::<usize>("bindery.form.limit").unwrap(), 1024);
    assert!(!config.get::<bool>("bindery.errors.detail").unwrap());
    assert_eq!(config.get::<String>("openapi.title").unwrap(), "Pet store");
    assert_eq!(config.profile(), "dev");
}

#[test]
fn test_type_mismatch() {
    let config = BinderyConfig::from_yaml_str("bindery:\n  form:\n    limit: lots\n", "test").unwrap();
    match config.get::<usize>("bindery.form.limit") {
        Err(ConfigError::TypeMismatch { key, expected }) => {
            assert_eq!(key, "bindery.form.limit");
            assert_eq!(expected, "i64");
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
    assert_eq!(config.get_or("bindery.form.limit", 7usize), 7);
}

#[test]
fn test_negative_limit_is_mismatch() {
    let mut config = BinderyConfig::empty();
    config.set("bindery.form.limit", ConfigValue::Integer(-1));
    assert!(config.get::<usize>("bindery.form.limit").is_err());
}

#[test]
fn test_invalid_yaml() {
    let result = BinderyConfig::from_yaml_str("bindery: [unclosed", "test");
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_bind_options_defaults() {
    let options = BindOptions::from_config(&BinderyConfig::empty());
    assert_eq!(options, BindOptions::default());
    assert_eq!(options.form_body_limit, 2 * 1024 * 1024);
    assert!(options.expose_details);
}

#[test]
fn test_bind_options_from_config() {
    let yaml = "bindery:\n  form:\n    limit: 64\n  errors:\n    detail: false\n";
    let config = BinderyConfig::from_yaml_str(yaml, "test").unwrap();
    let options = BindOptions::from_config(&config);
    assert_eq!(options.form_body_limit, 64);
    assert!(!options.expose_details);
}

#[test]
#[serial]
fn test_load_from_profile_overrides_base() {
    std::env::remove_var("BINDERY_PROFILE");
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("bindery.yaml"),
        "openapi:\n  title: base\n  version: \"1.0.0\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("bindery-prod.yaml"), "openapi:\n  title: prod\n").unwrap();

    let config = BinderyConfig::load_from(dir.path(), "prod").unwrap();
    assert_eq!(config.profile(), "prod");
    assert_eq!(config.get::<String>("openapi.title").unwrap(), "prod");
    assert_eq!(config.get::<String>("openapi.version").unwrap(), "1.0.0");
}

#[test]
#[serial]
fn test_load_from_missing_files_is_empty() {
    std::env::remove_var("BINDERY_PROFILE");
    let dir = tempfile::tempdir().unwrap();
    let config = BinderyConfig::load_from(dir.path(), "dev").unwrap();
    assert!(!config.contains_key("openapi.title"));
}

#[test]
#[serial]
fn test_env_overrides_yaml() {
    std::env::remove_var("BINDERY_PROFILE");
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bindery.yaml"), "bindery:\n  form:\n    limit: 10\n").unwrap();

    std::env::set_var("BINDERY_FORM_LIMIT", "4096");
    let config = BinderyConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("BINDERY_FORM_LIMIT");

    assert_eq!(config.get::<usize>("bindery.form.limit").unwrap(), 4096);
}

#[test]
#[serial]
fn test_profile_env_var_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bindery-staging.yaml"), "openapi:\n  title: staging\n").unwrap();

    std::env::set_var("BINDERY_PROFILE", "staging");
    let config = BinderyConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("BINDERY_PROFILE");

    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("openapi.title").unwrap(), "staging");
}

#[test]
#[serial]
fn test_dotenv_file_feeds_overlay() {
    std::env::remove_var("BINDERY_PROFILE");
    std::env::remove_var("BINDERY_ERRORS_DETAIL");
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".env"), "BINDERY_ERRORS_DETAIL=false\n").unwrap();

    let config = BinderyConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("BINDERY_ERRORS_DETAIL");

    assert!(!config.get::<bool>("bindery.errors.detail").unwrap());
}
