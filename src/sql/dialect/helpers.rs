//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, Oracle (when quoting is required)
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: Oracle (no SQL-level BOOLEAN before 23c)
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Bind Placeholders
// =============================================================================

/// `$n` positional placeholder.
/// Used by: Postgres
pub fn placeholder_dollar(index: usize) -> String {
    format!("${}", index)
}

/// `:n` positional placeholder.
/// Used by: Oracle
pub fn placeholder_colon(index: usize) -> String {
    format!(":{}", index)
}

// =============================================================================
// Data Type Emission
// =============================================================================

use crate::sql::types::DataType;

/// Emit data type for Postgres.
pub fn emit_data_type_postgres(dt: &DataType) -> String {
    match dt {
        DataType::Array(inner) => format!("{}[]", emit_data_type_postgres(inner)),
        other => other.to_string(),
    }
}

/// Emit data type for Oracle.
///
/// Oracle has no array column type; `Array` falls back to its element type
/// (only reachable if a caller casts a path explicitly).
pub fn emit_data_type_oracle(dt: &DataType) -> String {
    match dt {
        DataType::Bool => "NUMBER(1)".into(),
        DataType::Int16 => "NUMBER(5)".into(),
        DataType::Int32 => "NUMBER(10)".into(),
        DataType::Int64 => "NUMBER(19)".into(),
        DataType::Float64 => "BINARY_DOUBLE".into(),
        DataType::Decimal(p, s) => format!("NUMBER({}, {})", p, s),
        DataType::String => "VARCHAR2(4000)".into(),
        DataType::Char(n) => format!("CHAR({})", n),
        DataType::Varchar(n) => format!("VARCHAR2({})", n),
        DataType::Date => "DATE".into(),
        DataType::Timestamp => "TIMESTAMP".into(),
        DataType::Uuid => "RAW(16)".into(),
        DataType::Array(inner) => emit_data_type_oracle(inner),
    }
}
