//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates the SQL for
//! both supported dialects. It includes:
//!
//! - [`query`] - SELECT query builder, CTEs, UNION, CONNECT BY
//! - [`expr`] - Expression AST and builder DSL
//! - [`types`] - Column data types
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    array, case_when, cast, coalesce, col, conjunction, func, lead_offset, lit_bool, lit_int,
    lit_null, lit_str, placeholder, prior, raw_sql, table_col, BinaryOperator, Expr, ExprExt,
    Literal, SortDir, UnaryOperator, WindowExt, WindowOrderBy,
};
pub use query::{ConnectBy, Cte, Join, OrderByExpr, Query, SelectExpr, SetOperation, TableRef};
pub use token::{Token, TokenStream};
pub use types::DataType;
