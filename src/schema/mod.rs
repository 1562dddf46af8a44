//! Table metadata consumed by the hierarchy compiler.
//!
//! A [`TableDescriptor`] is a passive description of one table: its typed
//! columns in declaration order and the foreign keys those columns carry.
//! Descriptors are built either in code or from an `arbor.toml` file (see
//! [`crate::config`]) and are never modified by compilation.
//!
//! # Examples
//!
//! ```ignore
//! use arbor::schema::{ColumnDescriptor, TableDescriptor};
//! use arbor::sql::types::DataType;
//!
//! let table = TableDescriptor::new("dummy_hierarchy")
//!     .column(ColumnDescriptor::new("id", DataType::Int32))
//!     .column(ColumnDescriptor::new("name", DataType::Varchar(10)))
//!     .column(
//!         ColumnDescriptor::new("parent_id", DataType::Int32)
//!             .references("dummy_hierarchy", "id"),
//!     );
//! ```

use serde::{Deserialize, Serialize};

use crate::sql::query::TableRef;
use crate::sql::types::DataType;

/// Target of a foreign key: `table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse `"table.column"`. The split happens at the last dot so a
    /// schema-qualified `"schema.table.column"` keeps `schema.table` whole.
    pub fn parse(s: &str) -> Option<Self> {
        let (table, column) = s.trim().rsplit_once('.')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self::new(table, column))
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A single foreign-key edge: `column` → `target.table`.`target.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub target: ColumnRef,
}

/// A typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            references: None,
        }
    }

    /// Declare a foreign key from this column.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ColumnRef::new(table, column));
        self
    }
}

/// Columns and foreign keys of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a column.
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Add multiple columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Foreign-key edges in column declaration order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = ForeignKey> + '_ {
        self.columns.iter().filter_map(|c| {
            c.references.as_ref().map(|target| ForeignKey {
                column: c.name.clone(),
                target: target.clone(),
            })
        })
    }

    /// Whether a foreign-key target names this table.
    ///
    /// A target may be bare (`tree`) or schema-qualified (`app.tree`); the
    /// latter only matches when this descriptor carries the same schema.
    pub fn is_self(&self, target_table: &str) -> bool {
        match target_table.rsplit_once('.') {
            Some((schema, table)) => {
                table == self.name && self.schema.as_deref() == Some(schema)
            }
            None => target_table == self.name,
        }
    }

    /// `FROM` reference for this table.
    pub fn table_ref(&self) -> TableRef {
        let table = TableRef::new(&self.name);
        match &self.schema {
            Some(schema) => table.with_schema(schema),
            None => table,
        }
    }
}
