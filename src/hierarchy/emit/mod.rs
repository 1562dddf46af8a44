//! Dialect emitters.
//!
//! Each supported dialect has one [`HierarchyEmitter`] that turns a validated
//! [`HierarchyRequest`] into a statement in that dialect's native idiom:
//!
//! | Dialect    | Idiom                                    | Emitter                 |
//! |------------|------------------------------------------|-------------------------|
//! | PostgreSQL | `WITH RECURSIVE` + `LEAD` leaf detection | [`RecursiveCteEmitter`] |
//! | Oracle     | `START WITH` / `CONNECT BY PRIOR`        | [`ConnectByEmitter`]    |
//!
//! Both add the same three columns after the caller's projection: `level`,
//! `connect_path` and `is_leaf`. Their value types differ per dialect and are
//! reported through [`SyntheticColumn`].

pub mod connect_by;
pub mod recursive_cte;

pub use connect_by::ConnectByEmitter;
pub use recursive_cte::RecursiveCteEmitter;

use serde::Serialize;

use super::request::HierarchyRequest;
use crate::sql::dialect::Dialect;
use crate::sql::types::DataType;

/// Depth of a row, 1 for roots.
pub const LEVEL: &str = "level";
/// Key values from the root to the row.
pub const CONNECT_PATH: &str = "connect_path";
/// Whether the row has no children in the result.
pub const IS_LEAF: &str = "is_leaf";
/// Internal recursion guard of the recursive CTE.
pub const CYCLE: &str = "cycle";

/// Names a projected column may not use.
pub(crate) const RESERVED_COLUMNS: &[&str] = &[LEVEL, CONNECT_PATH, IS_LEAF, CYCLE];

/// Writes a hierarchy request in one dialect's hierarchical idiom.
///
/// Emitters are stateless; the same request always yields the same output.
pub trait HierarchyEmitter: std::fmt::Debug + Sync {
    fn dialect(&self) -> Dialect;

    fn emit(&self, request: &HierarchyRequest) -> HierarchySql;
}

/// Value type of a generated column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Boolean,
    /// Engine-native array of key values.
    KeyArray { element: DataType },
    /// Key values joined by the path separator.
    Text { separator: String },
}

/// A column the emitter adds after the caller's projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntheticColumn {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

impl SyntheticColumn {
    pub fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// A compiled hierarchical statement.
///
/// `params` are bound positionally (`$1`, `$2` or `:1`) in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchySql {
    pub dialect: Dialect,
    pub sql: String,
    pub params: Vec<String>,
    /// The caller's projection, in order.
    pub columns: Vec<String>,
    /// Generated columns, following `columns` in the result.
    pub synthetic: Vec<SyntheticColumn>,
}

impl HierarchySql {
    /// All result column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(self.synthetic.iter().map(|c| c.name))
    }
}

impl std::fmt::Display for HierarchySql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
