//! Loading table descriptors and targets from arbor.toml.

use std::fs;
use std::path::PathBuf;

use arbor::config::{Settings, SettingsError};
use arbor::prelude::*;

const CONFIG: &str = r#"
[target]
dialect = "postgresql"
version = "16.2"

[[tables]]
name = "dummy_hierarchy"
columns = [
  { name = "id", type = "integer" },
  { name = "name", type = "varchar(10)" },
  { name = "parent_id", type = "integer", references = "dummy_hierarchy.id" },
  { name = "active", type = "boolean" },
]

[[tables]]
name = "no_fk_tb"
columns = [
  { name = "id", type = "integer" },
  { name = "name", type = "varchar(10)" },
  { name = "descrip", type = "varchar(100)" },
]
"#;

fn write_config(file_name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arbor-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_from_file() {
    let path = write_config("load_from_file.toml", CONFIG);
    let settings = Settings::load(&path).unwrap();

    assert_eq!(
        settings.table_names().collect::<Vec<_>>(),
        vec!["dummy_hierarchy", "no_fk_tb"]
    );

    let target = settings.target.as_ref().unwrap();
    assert_eq!(target.resolved_dialect().unwrap(), "postgresql");
    assert_eq!(target.resolved_version().unwrap(), Version::new(16, 2, 0));

    fs::remove_file(path).unwrap();
}

#[test]
fn missing_file() {
    let err = Settings::load("/definitely/not/here/arbor.toml").unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn malformed_toml() {
    let err = Settings::from_toml_str("[[tables]\nname = ").unwrap_err();
    assert!(matches!(err, SettingsError::ParseError(_)));
}

#[test]
fn descriptor_matches_code_built_table() {
    let settings = Settings::from_toml_str(CONFIG).unwrap();
    let table = settings.find_table("dummy_hierarchy").unwrap();

    let expected = TableDescriptor::new("dummy_hierarchy")
        .column(ColumnDescriptor::new("id", DataType::Int32))
        .column(ColumnDescriptor::new("name", DataType::Varchar(10)))
        .column(
            ColumnDescriptor::new("parent_id", DataType::Int32).references("dummy_hierarchy", "id"),
        )
        .column(ColumnDescriptor::new("active", DataType::Bool));
    assert_eq!(table, expected);
}

#[test]
fn configured_tables_compile() {
    let settings = Settings::from_toml_str(CONFIG).unwrap();
    let target = settings.target.as_ref().unwrap();

    let table = settings.find_table("dummy_hierarchy").unwrap();
    let request = HierarchyRequest::for_table(&table, HierarchyOptions::default()).unwrap();
    let out = request
        .compile(
            &target.resolved_dialect().unwrap(),
            target.resolved_version().unwrap(),
        )
        .unwrap();
    assert_eq!(out.dialect, Dialect::Postgres);

    let flat = settings.find_table("no_fk_tb").unwrap();
    assert!(matches!(
        HierarchyRequest::for_table(&flat, HierarchyOptions::default()),
        Err(HierarchyError::MissingForeignKey { .. })
    ));
}

#[test]
fn target_expands_environment() {
    std::env::set_var("ARBOR_SETTINGS_TEST_DIALECT", "oracle");
    std::env::set_var("ARBOR_SETTINGS_TEST_VERSION", "11.2.0");

    let settings = Settings::from_toml_str(
        r#"
[target]
dialect = "${ARBOR_SETTINGS_TEST_DIALECT}"
version = "$ARBOR_SETTINGS_TEST_VERSION"
"#,
    )
    .unwrap();
    let target = settings.target.unwrap();
    assert_eq!(target.resolved_dialect().unwrap(), "oracle");
    assert_eq!(target.resolved_version().unwrap(), Version::new(11, 2, 0));

    std::env::remove_var("ARBOR_SETTINGS_TEST_DIALECT");
    std::env::remove_var("ARBOR_SETTINGS_TEST_VERSION");
}

#[test]
fn invalid_target_version() {
    let settings = Settings::from_toml_str(
        r#"
[target]
dialect = "oracle"
version = "ten"
"#,
    )
    .unwrap();
    let err = settings.target.unwrap().resolved_version().unwrap_err();
    assert!(matches!(err, SettingsError::InvalidVersion(_)));
}

#[test]
fn unknown_table() {
    let settings = Settings::from_toml_str(CONFIG).unwrap();
    let err = settings.find_table("missing").unwrap_err();
    assert_eq!(err.to_string(), "Table not found: missing");
}
