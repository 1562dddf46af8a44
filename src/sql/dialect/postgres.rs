//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - `$n` bind parameters
//! - Typed arrays (`INTEGER[]`), `ARRAY_APPEND`, `= ANY(..)`, `<@`
//! - WITH RECURSIVE (8.4+)

use super::helpers;
use super::SqlDialect;
use crate::sql::types::DataType;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn placeholder(&self, index: usize) -> String {
        helpers::placeholder_dollar(index)
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_postgres(dt)
    }
}
