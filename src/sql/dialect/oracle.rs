//! Oracle SQL dialect.
//!
//! Oracle features:
//! - Unquoted identifiers fold to upper case; quoted ones are case-sensitive
//! - No SQL-level boolean (1/0)
//! - `:n` bind parameters
//! - Hierarchical queries: START WITH / CONNECT BY / SYS_CONNECT_BY_PATH
//! - WITH without the RECURSIVE keyword

use std::sync::LazyLock;

use regex::Regex;

use super::helpers;
use super::SqlDialect;
use crate::sql::types::DataType;

static BARE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_$#]*$").unwrap());

/// Words that cannot appear as bare identifiers, including the
/// hierarchical pseudo-columns.
const RESERVED: &[&str] = &[
    "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUDIT", "BETWEEN", "BY",
    "CHAR", "CHECK", "CLUSTER", "COLUMN", "COMMENT", "COMPRESS", "CONNECT",
    "CONNECT_BY_ISCYCLE", "CONNECT_BY_ISLEAF", "CREATE", "CURRENT", "DATE", "DECIMAL",
    "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "EXCLUSIVE", "EXISTS", "FILE",
    "FLOAT", "FOR", "FROM", "GRANT", "GROUP", "HAVING", "IDENTIFIED", "IMMEDIATE", "IN",
    "INCREMENT", "INDEX", "INITIAL", "INSERT", "INTEGER", "INTERSECT", "INTO", "IS", "LEVEL",
    "LIKE", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MODE", "MODIFY", "NOAUDIT", "NOCOMPRESS",
    "NOT", "NOWAIT", "NULL", "NUMBER", "OF", "OFFLINE", "ON", "ONLINE", "OPTION", "OR",
    "ORDER", "PCTFREE", "PRIOR", "PUBLIC", "RAW", "RENAME", "RESOURCE", "REVOKE", "ROW",
    "ROWID", "ROWNUM", "ROWS", "SELECT", "SESSION", "SET", "SHARE", "SIZE", "SMALLINT",
    "START", "SUCCESSFUL", "SYNONYM", "SYSDATE", "TABLE", "THEN", "TO", "TRIGGER", "UID",
    "UNION", "UNIQUE", "UPDATE", "USER", "VALIDATE", "VALUES", "VARCHAR", "VARCHAR2", "VIEW",
    "WHENEVER", "WHERE", "WITH",
];

/// Oracle SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl Oracle {
    fn needs_quoting(ident: &str) -> bool {
        if !BARE_IDENT.is_match(ident) {
            return true;
        }
        let upper = ident.to_ascii_uppercase();
        RESERVED.contains(&upper.as_str())
    }
}

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        if Self::needs_quoting(ident) {
            helpers::quote_double(ident)
        } else {
            ident.to_string()
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn placeholder(&self, index: usize) -> String {
        helpers::placeholder_colon(index)
    }

    fn emit_recursive_keyword(&self) -> bool {
        false
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_oracle(dt)
    }
}
