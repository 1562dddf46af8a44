//! Hierarchy requests: the compiler's input value.
//!
//! A [`HierarchyRequest`] bundles the caller's base query with the resolved
//! self-referential foreign key, the key's value type and the effective
//! starting node. It is validated once at construction and never changes
//! afterwards, so the same request can be compiled for several dialects.

use crate::schema::TableDescriptor;
use crate::sql::expr::{conjunction, table_col, Expr};
use crate::sql::query::{Query, TableRef};
use crate::sql::types::DataType;

use super::capability::Version;
use super::emit::{HierarchySql, RESERVED_COLUMNS};
use super::error::{HierarchyError, HierarchyResult};

// ============================================================================
// Self-reference
// ============================================================================

/// The parent/child column pair of a self-referential foreign key.
///
/// `parent` is the referencing column (e.g. `parent_id`); `child` is the
/// column it references on the same table (e.g. `id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelfReference {
    pub parent: String,
    pub child: String,
}

/// Find the first foreign key of `table` whose target is `table` itself.
pub fn resolve_self_reference(table: &TableDescriptor) -> HierarchyResult<SelfReference> {
    table
        .foreign_keys()
        .find(|fk| table.is_self(&fk.target.table))
        .map(|fk| SelfReference {
            parent: fk.column,
            child: fk.target.column,
        })
        .ok_or_else(|| HierarchyError::MissingForeignKey {
            table: table.name.clone(),
        })
}

// ============================================================================
// Key type and starting node
// ============================================================================

/// Value family of the parent/child key columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Integer,
    Text { max_length: Option<u16> },
}

impl KeyType {
    /// Text types map to `Text`; every other type is handled as `Integer`.
    pub fn from_data_type(data_type: &DataType) -> Self {
        if data_type.is_string() {
            KeyType::Text {
                max_length: data_type.text_length(),
            }
        } else {
            KeyType::Integer
        }
    }

    /// Placeholder a NULL parent is coalesced to when selecting roots.
    ///
    /// Text keys use a non-numeric sentinel so engines cannot coerce the
    /// comparison to a numeric one.
    pub fn sentinel(&self) -> &'static str {
        match self {
            KeyType::Integer => "0",
            KeyType::Text { .. } => "a",
        }
    }
}

/// Which rows the traversal starts from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StartingNode {
    /// Start from rows whose parent is NULL (via the key type's sentinel).
    #[default]
    Default,
    /// Start from rows whose parent equals this value (text-encoded).
    Explicit(String),
    /// No root predicate: every row starts a traversal.
    Disabled,
}

impl StartingNode {
    pub fn explicit(value: impl ToString) -> Self {
        StartingNode::Explicit(value.to_string())
    }
}

// ============================================================================
// Options
// ============================================================================

/// Request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyOptions {
    pub starting_node: StartingNode,
    /// Separator between path elements in CONNECT BY `connect_path` strings.
    pub path_separator: String,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            starting_node: StartingNode::Default,
            path_separator: ",".into(),
        }
    }
}

impl HierarchyOptions {
    /// Start the traversal at rows whose parent equals `value`.
    pub fn starting_node(mut self, value: impl ToString) -> Self {
        self.starting_node = StartingNode::explicit(value);
        self
    }

    /// Treat every row as a potential root.
    pub fn disable_starting_node(mut self) -> Self {
        self.starting_node = StartingNode::Disabled;
        self
    }

    pub fn path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }
}

// ============================================================================
// Base query
// ============================================================================

/// The caller's tabular query: one table, a projection and an optional filter.
///
/// Emitters never modify it; [`BaseQuery::to_query`] hands out a fresh
/// [`Query`] for them to extend.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseQuery {
    table: TableRef,
    projection: Vec<String>,
    filter: Option<Expr>,
}

impl BaseQuery {
    /// Select every column of `table`, in declaration order.
    pub fn new(table: &TableDescriptor) -> Self {
        Self {
            table: table.table_ref(),
            projection: table.column_names().map(String::from).collect(),
            filter: None,
        }
    }

    /// Replace the projection.
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.projection = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row filter (ANDed with any existing filter).
    ///
    /// Unqualified column references resolve against the base table.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter = match self.filter.take() {
            Some(existing) => conjunction([existing, condition]),
            None => Some(condition),
        };
        self
    }

    /// Reference the table under an alias.
    pub fn alias(mut self, alias: &str) -> Self {
        self.table = self.table.with_alias(alias);
        self
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    pub fn filter_expr(&self) -> Option<&Expr> {
        self.filter.as_ref()
    }

    /// Name columns are qualified with.
    pub fn qualifier(&self) -> &str {
        self.table.qualifier()
    }

    /// The filter with its columns qualified by the base table.
    pub fn qualified_filter(&self) -> Option<Expr> {
        self.filter.as_ref().map(|f| f.qualified(self.qualifier()))
    }

    /// `SELECT <projection> FROM <table> [WHERE <filter>]`, fully qualified.
    pub fn to_query(&self) -> Query {
        let qualifier = self.qualifier();
        let mut query = Query::new()
            .select(
                self.projection
                    .iter()
                    .map(|c| table_col(qualifier, c))
                    .collect::<Vec<_>>(),
            )
            .from(self.table.clone());
        if let Some(filter) = self.qualified_filter() {
            query = query.filter(filter);
        }
        query
    }
}

// ============================================================================
// Request
// ============================================================================

/// A validated hierarchy compilation request.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyRequest {
    table_name: String,
    base_query: BaseQuery,
    self_reference: SelfReference,
    key_type: KeyType,
    key_data_type: DataType,
    options: HierarchyOptions,
}

impl HierarchyRequest {
    /// Build a request over `table`.
    ///
    /// Fails with `MissingForeignKey` when the table has no self-referential
    /// foreign key, and with `UnknownColumn`/`InvalidIdentifier` when the base
    /// query does not fit the table.
    pub fn new(
        table: &TableDescriptor,
        base_query: BaseQuery,
        options: HierarchyOptions,
    ) -> HierarchyResult<Self> {
        let self_reference = resolve_self_reference(table)?;

        let unknown = |column: &str| HierarchyError::UnknownColumn {
            table: table.name.clone(),
            column: column.to_string(),
        };

        let parent = table
            .get_column(&self_reference.parent)
            .ok_or_else(|| unknown(&self_reference.parent))?;
        if !table.has_column(&self_reference.child) {
            return Err(unknown(&self_reference.child));
        }

        validate_identifier(&table.name)?;
        if let Some(schema) = &table.schema {
            validate_identifier(schema)?;
        }
        if let Some(alias) = &base_query.table.alias {
            validate_identifier(alias)?;
        }

        for column in base_query.projection() {
            validate_identifier(column)?;
            if !table.has_column(column) {
                return Err(unknown(column));
            }
            if RESERVED_COLUMNS.contains(&column.as_str()) {
                return Err(HierarchyError::ReservedColumn {
                    column: column.clone(),
                });
            }
        }
        if !base_query.projection().contains(&self_reference.child) {
            return Err(unknown(&self_reference.child));
        }

        if let Some(filter) = base_query.filter_expr() {
            for column in filter.unqualified_columns() {
                validate_identifier(column)?;
                if !table.has_column(column) {
                    return Err(unknown(column));
                }
            }
        }

        if options.path_separator.is_empty() {
            return Err(HierarchyError::InvalidOption {
                option: "path_separator".into(),
                reason: "must not be empty".into(),
            });
        }

        let key_data_type = parent.data_type.clone();
        let key_type = KeyType::from_data_type(&key_data_type);

        let request = Self {
            table_name: table.name.clone(),
            base_query,
            self_reference,
            key_type,
            key_data_type,
            options,
        };

        log::debug!(
            "hierarchy request on {}: parent={} child={} key={:?} root={:?}",
            request.table_name,
            request.self_reference.parent,
            request.self_reference.child,
            request.key_type,
            request.root_value()
        );

        Ok(request)
    }

    /// Build a request selecting every column of `table` without a filter.
    pub fn for_table(table: &TableDescriptor, options: HierarchyOptions) -> HierarchyResult<Self> {
        Self::new(table, BaseQuery::new(table), options)
    }

    /// Compile for a dialect name and server version.
    pub fn compile(&self, dialect: &str, version: Version) -> HierarchyResult<HierarchySql> {
        super::compile::compile(self, dialect, version)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn base_query(&self) -> &BaseQuery {
        &self.base_query
    }

    pub fn self_reference(&self) -> &SelfReference {
        &self.self_reference
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Declared type of the parent column.
    pub fn key_data_type(&self) -> &DataType {
        &self.key_data_type
    }

    pub fn options(&self) -> &HierarchyOptions {
        &self.options
    }

    pub fn starting_node(&self) -> &StartingNode {
        &self.options.starting_node
    }

    pub fn sentinel(&self) -> &'static str {
        self.key_type.sentinel()
    }

    /// Effective root value: the sentinel for `Default`, the explicit value,
    /// or `None` when the starting node is disabled.
    pub fn root_value(&self) -> Option<&str> {
        match &self.options.starting_node {
            StartingNode::Default => Some(self.sentinel()),
            StartingNode::Explicit(value) => Some(value),
            StartingNode::Disabled => None,
        }
    }

    /// Whether the traversal starts at NULL-parent rows.
    pub fn starts_at_roots(&self) -> bool {
        self.root_value() == Some(self.sentinel())
    }
}

/// Reject identifiers no quoting rule can represent.
fn validate_identifier(identifier: &str) -> HierarchyResult<()> {
    if identifier.is_empty() || identifier.chars().any(char::is_control) {
        return Err(HierarchyError::InvalidIdentifier {
            identifier: identifier.to_string(),
        });
    }
    Ok(())
}
