//! SQL-level column data types.
//!
//! These describe the declared type of a table column in a
//! [`TableDescriptor`](crate::schema::TableDescriptor). The hierarchy
//! compiler only cares about two families (integers and bounded text) when
//! choosing sentinels and literal casts, but descriptors carry the full
//! declared type so emitted casts and path arrays match the column exactly.
//!
//! # Examples
//!
//! ```ignore
//! use arbor::sql::types::DataType;
//!
//! assert_eq!(DataType::parse("bigint"), Some(DataType::Int64));
//! assert_eq!(DataType::parse("varchar(255)"), Some(DataType::Varchar(255)));
//! assert_eq!(DataType::parse("decimal(18,2)"), Some(DataType::Decimal(18, 2)));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// SQL-level data type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    /// Boolean type.
    Bool,

    /// 16-bit signed integer (SMALLINT).
    Int16,

    /// 32-bit signed integer (INT/INTEGER).
    Int32,

    /// 64-bit signed integer (BIGINT).
    Int64,

    /// 64-bit floating point (DOUBLE PRECISION).
    Float64,

    /// Fixed-precision decimal with precision and scale.
    Decimal(u8, u8),

    /// Variable-length string without a declared limit (TEXT).
    String,

    /// Fixed-length character string.
    Char(u16),

    /// Variable-length character string with maximum length.
    Varchar(u16),

    /// Date without time.
    Date,

    /// Timestamp without timezone.
    Timestamp,

    /// UUID type.
    Uuid,

    /// One-dimensional array of the element type.
    ///
    /// Only produced by the compiler for `connect_path`; never parsed.
    Array(Box<DataType>),
}

impl DataType {
    /// Parse a SQL data type from a string.
    ///
    /// Supports common SQL type names and syntax:
    /// - `bool`, `boolean`
    /// - `smallint`, `int2`
    /// - `int`, `integer`, `int4`
    /// - `bigint`, `int8`
    /// - `double`, `float8`, `double precision`, `float`
    /// - `decimal(p,s)`, `numeric(p,s)`, `number(p,s)`
    /// - `text`, `string`, `clob`
    /// - `char(n)`, `character(n)`
    /// - `varchar(n)`, `varchar2(n)`, `character varying(n)`
    /// - `date`, `timestamp`
    /// - `uuid`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        if let Some(inner) = extract_parens(&s, "decimal")
            .or_else(|| extract_parens(&s, "numeric"))
            .or_else(|| extract_parens(&s, "number"))
        {
            return parse_decimal_params(&inner);
        }

        if let Some(inner) = extract_parens(&s, "varchar2")
            .or_else(|| extract_parens(&s, "varchar"))
            .or_else(|| extract_parens(&s, "character varying"))
        {
            return parse_length_param(&inner).map(DataType::Varchar);
        }

        if let Some(inner) =
            extract_parens(&s, "char").or_else(|| extract_parens(&s, "character"))
        {
            return parse_length_param(&inner).map(DataType::Char);
        }

        match s.as_str() {
            "bool" | "boolean" => Some(DataType::Bool),

            "smallint" | "int2" => Some(DataType::Int16),
            "int" | "integer" | "int4" => Some(DataType::Int32),
            "bigint" | "int8" => Some(DataType::Int64),

            "double" | "float8" | "double precision" | "float" => Some(DataType::Float64),

            "decimal" | "numeric" | "number" => Some(DataType::Decimal(18, 2)),

            "text" | "string" | "clob" | "varchar" => Some(DataType::String),

            "date" => Some(DataType::Date),
            "timestamp" => Some(DataType::Timestamp),

            "uuid" => Some(DataType::Uuid),

            _ => None,
        }
    }

    /// Returns true if this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int16 | DataType::Int32 | DataType::Int64)
    }

    /// Returns true if this is a string/text type.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DataType::String | DataType::Char(_) | DataType::Varchar(_)
        )
    }

    /// Declared maximum length of a text type, if it has one.
    pub fn text_length(&self) -> Option<u16> {
        match self {
            DataType::Char(n) | DataType::Varchar(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::Int16 => write!(f, "SMALLINT"),
            DataType::Int32 => write!(f, "INTEGER"),
            DataType::Int64 => write!(f, "BIGINT"),
            DataType::Float64 => write!(f, "DOUBLE PRECISION"),
            DataType::Decimal(p, s) => write!(f, "DECIMAL({}, {})", p, s),
            DataType::String => write!(f, "TEXT"),
            DataType::Char(n) => write!(f, "CHAR({})", n),
            DataType::Varchar(n) => write!(f, "VARCHAR({})", n),
            DataType::Date => write!(f, "DATE"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Uuid => write!(f, "UUID"),
            DataType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DataType::parse(&value).ok_or_else(|| format!("unknown column type '{}'", value))
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.to_string()
    }
}

/// Extract content inside parentheses for a given type prefix.
/// e.g., extract_parens("decimal(10,2)", "decimal") returns Some("10,2")
fn extract_parens(s: &str, prefix: &str) -> Option<String> {
    let s = s.trim();
    if !s.starts_with(prefix) {
        return None;
    }

    let rest = s[prefix.len()..].trim();
    if !rest.starts_with('(') || !rest.ends_with(')') {
        return None;
    }

    Some(rest[1..rest.len() - 1].to_string())
}

/// Parse decimal parameters "precision,scale" or "precision, scale".
fn parse_decimal_params(inner: &str) -> Option<DataType> {
    let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
    match parts.as_slice() {
        [precision] => Some(DataType::Decimal(precision.parse().ok()?, 0)),
        [precision, scale] => Some(DataType::Decimal(
            precision.parse().ok()?,
            scale.parse().ok()?,
        )),
        _ => None,
    }
}

/// Parse a single length parameter.
fn parse_length_param(inner: &str) -> Option<u16> {
    inner.trim().parse().ok()
}
