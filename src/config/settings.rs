//! TOML-based configuration for arbor.
//!
//! Supports a config file (arbor.toml) with environment variable expansion
//! in the `[target]` section.
//!
//! Example configuration:
//! ```toml
//! [target]
//! dialect = "postgresql"
//! version = "${PG_VERSION}"
//!
//! [[tables]]
//! name = "dummy_hierarchy"
//! columns = [
//!   { name = "id", type = "integer" },
//!   { name = "name", type = "varchar(10)" },
//!   { name = "parent_id", type = "integer", references = "dummy_hierarchy.id" },
//! ]
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::hierarchy::Version;
use crate::schema::{ColumnDescriptor, ColumnRef, TableDescriptor};
use crate::sql::types::DataType;

/// `${VAR}` or `$VAR`.
static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Unknown type '{column_type}' for column {table}.{column}")]
    InvalidColumnType {
        table: String,
        column: String,
        column_type: String,
    },

    #[error("Invalid reference '{reference}' on column {table}.{column} (expected table.column)")]
    InvalidReference {
        table: String,
        column: String,
        reference: String,
    },

    #[error("Invalid target version: {0}")]
    InvalidVersion(#[from] crate::hierarchy::VersionParseError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Default dialect and server version for compilation.
    pub target: Option<TargetSettings>,

    /// Table descriptors.
    pub tables: Vec<TableSettings>,
}

/// Compilation target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetSettings {
    /// Dialect name (postgresql, oracle). Supports ${ENV_VAR} expansion.
    pub dialect: String,

    /// Server version, `major[.minor[.patch]]`. Supports ${ENV_VAR} expansion.
    pub version: String,
}

impl TargetSettings {
    /// Get the dialect name with environment variables expanded.
    pub fn resolved_dialect(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.dialect)
    }

    /// Get the parsed server version with environment variables expanded.
    pub fn resolved_version(&self) -> Result<Version, SettingsError> {
        Ok(expand_env_vars(&self.version)?.parse()?)
    }
}

/// One table as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableSettings {
    pub name: String,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub columns: Vec<ColumnSettings>,
}

/// One column as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnSettings {
    pub name: String,

    /// Type name, e.g. `integer`, `varchar(10)`, `number(10)`.
    #[serde(rename = "type")]
    pub column_type: String,

    /// Foreign-key target, `table.column`.
    #[serde(default)]
    pub references: Option<String>,
}

impl TableSettings {
    /// Build a table descriptor, parsing column types and references.
    pub fn to_descriptor(&self) -> Result<TableDescriptor, SettingsError> {
        let mut table = TableDescriptor::new(&self.name);
        if let Some(schema) = &self.schema {
            table = table.with_schema(schema);
        }

        for column in &self.columns {
            let data_type = DataType::parse(&column.column_type).ok_or_else(|| {
                SettingsError::InvalidColumnType {
                    table: self.name.clone(),
                    column: column.name.clone(),
                    column_type: column.column_type.clone(),
                }
            })?;

            let mut descriptor = ColumnDescriptor::new(&column.name, data_type);
            if let Some(reference) = &column.references {
                let target = ColumnRef::parse(reference).ok_or_else(|| {
                    SettingsError::InvalidReference {
                        table: self.name.clone(),
                        column: column.name.clone(),
                        reference: reference.clone(),
                    }
                })?;
                descriptor.references = Some(target);
            }
            table = table.column(descriptor);
        }

        Ok(table)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!(
            "loaded {} table(s) from {}",
            settings.tables.len(),
            path.display()
        );
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `ARBOR_CONFIG`
    /// 2. `./arbor.toml`
    pub fn discover() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("ARBOR_CONFIG") {
            return Self::load(path);
        }
        Self::load("arbor.toml")
    }

    /// Get a table descriptor by name.
    pub fn find_table(&self, name: &str) -> Result<TableDescriptor, SettingsError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| SettingsError::TableNotFound(name.to_string()))?
            .to_descriptor()
    }

    /// Names of all configured tables, in file order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a variable
/// name is kept as-is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut missing = None;
    let expanded = ENV_VAR.replace_all(s, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        match env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(SettingsError::MissingEnvVar(name)),
        None => Ok(expanded.into_owned()),
    }
}
