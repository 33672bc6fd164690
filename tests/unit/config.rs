use super::*;

#[test]
fn defaults_enable_verification() {
    let cfg = GraphicsConfig::default();
    assert!(cfg.verify_main_thread);
    assert_eq!(cfg.max_fbo_dimension, 8192);
    cfg.validate().unwrap();
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = GraphicsConfig::from_json_str(r#"{ "verify_main_thread": false }"#).unwrap();
    assert!(!cfg.verify_main_thread);
    assert_eq!(cfg.max_fbo_dimension, 8192);
}

#[test]
fn json_rejects_unknown_fields_and_bad_values() {
    assert!(matches!(
        GraphicsConfig::from_json_str(r#"{ "verify": true }"#),
        Err(GraphicsError::Validation(_))
    ));
    assert!(matches!(
        GraphicsConfig::from_json_str(r#"{ "max_fbo_dimension": 0 }"#),
        Err(GraphicsError::Validation(_))
    ));
    assert!(matches!(
        GraphicsConfig::from_json_str(r#"{ "max_fbo_dimension": 70000 }"#),
        Err(GraphicsError::Validation(_))
    ));
}

#[test]
fn flags_accept_numeric_and_word_forms() {
    assert!(parse_flag("X", "1").unwrap());
    assert!(parse_flag("X", " TRUE ").unwrap());
    assert!(!parse_flag("X", "0").unwrap());
    assert!(!parse_flag("X", "off").unwrap());
    assert!(parse_flag("X", "maybe").is_err());
}

#[test]
fn from_path_prefixes_errors_with_path() {
    let dir = std::path::PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");
    std::fs::write(&path, r#"{ "max_fbo_dimension": 0 }"#).unwrap();
    let err = GraphicsConfig::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("bad.json"));

    let missing = GraphicsConfig::from_path(dir.join("missing.json")).unwrap_err();
    assert!(matches!(missing, GraphicsError::Io(_)));
}
