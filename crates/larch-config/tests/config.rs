use larch_config::{
    json_schema_string, load_for_workspace, ConfigError, EloquentConfig, LarchConfig,
    DEFAULT_MODEL_CLASS, DEFAULT_RELATION_CLASS,
};
use pretty_assertions::assert_eq;

#[test]
fn empty_config_uses_defaults() {
    let config = LarchConfig::load_from_str("").unwrap();
    assert_eq!(config, LarchConfig::default());
    assert_eq!(config.eloquent.model_class, DEFAULT_MODEL_CLASS);
    assert_eq!(config.eloquent.relation_class, DEFAULT_RELATION_CLASS);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn eloquent_class_names_are_normalized() {
    let config = LarchConfig::load_from_str(
        r#"
        [eloquent]
        model_class = " \\App\\Models\\BaseModel "
        "#,
    )
    .unwrap();

    assert_eq!(
        config.eloquent,
        EloquentConfig {
            model_class: "App\\Models\\BaseModel".to_string(),
            relation_class: DEFAULT_RELATION_CLASS.to_string(),
        }
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let err = LarchConfig::load_from_str("[eloquent]\nmodel = \"X\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LarchConfig::load_from_path(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}

#[test]
fn workspace_without_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (config, path) = load_for_workspace(dir.path()).unwrap();
    assert_eq!(config, LarchConfig::default());
    assert_eq!(path, None);
}

#[test]
fn workspace_config_prefers_larch_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".larch.toml"),
        "[logging]\nlevel = \"error\"\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("larch.toml"),
        "[logging]\nlevel = \"debug\"\njson = true\n",
    )
    .unwrap();

    let (config, path) = load_for_workspace(dir.path()).unwrap();
    assert_eq!(path, Some(dir.path().join("larch.toml")));
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn schema_names_the_config_sections() {
    let schema = json_schema_string().unwrap();
    assert!(schema.contains("\"eloquent\""), "{schema}");
    assert!(schema.contains("\"model_class\""), "{schema}");
}
