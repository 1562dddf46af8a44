//! # arbor
//!
//! Compiles queries over adjacency-list tables into dialect-specific
//! hierarchical SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        TableDescriptor (schema) + BaseQuery              │
//! │   (typed columns, self-referential foreign key)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [hierarchy::request]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 HierarchyRequest                         │
//! │   (parent/child pair, key type, starting node)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [hierarchy::capability]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Capability gate (dialect, minimum version)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [hierarchy::emit]
//! ┌─────────────────────────────────────────────────────────┐
//! │   WITH RECURSIVE (PostgreSQL) │ CONNECT BY (Oracle)      │
//! │           built with sql::{expr, query, token}           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use arbor::prelude::*;
//!
//! let table = TableDescriptor::new("dummy_hierarchy")
//!     .column(ColumnDescriptor::new("id", DataType::Int32))
//!     .column(ColumnDescriptor::new("parent_id", DataType::Int32).references("dummy_hierarchy", "id"));
//!
//! let request = HierarchyRequest::for_table(&table, HierarchyOptions::default())?;
//! let out = request.compile("postgresql", Version::new(16, 2, 0))?;
//! ```

pub mod config;
pub mod hierarchy;
pub mod schema;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::expr::{col, lit_bool, lit_int, lit_null, lit_str, table_col, Expr, ExprExt};
    pub use crate::hierarchy::{
        compile, compile_for, BaseQuery, HierarchyError, HierarchyOptions, HierarchyRequest,
        HierarchyResult, HierarchySql, StartingNode, Version,
    };
    pub use crate::schema::{ColumnDescriptor, TableDescriptor};
    pub use crate::sql::types::DataType;
}
