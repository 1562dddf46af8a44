//! Query builder - construct SQL queries with a fluent API.

use super::dialect::{Dialect, SqlDialect};
use super::expr::{conjunction, Expr, SortDir};
use super::token::{Token, TokenStream};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
    /// Quote the alias even where the dialect would leave it bare.
    pub quote_alias: bool,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            alias: None,
            quote_alias: false,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_quoted_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self.quote_alias = true;
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        if let Some(alias) = &self.alias {
            let name = if self.quote_alias {
                Token::QuotedIdent(alias.clone())
            } else {
                Token::Ident(alias.clone())
            };
            ts.space().push(Token::As).space().push(name);
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference with optional schema and alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name that column references use to qualify against this table:
    /// the alias if one is set, otherwise the bare table name.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    /// Oracle rejects `AS` before a table alias; PostgreSQL accepts both forms.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.table.clone(),
        });
        if let Some(alias) = &self.alias {
            ts.space().push(Token::Ident(alias.clone()));
        }
        ts
    }
}

// =============================================================================
// Joins
// =============================================================================

/// An INNER JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Inner).space().push(Token::Join).space();
        ts.append(&self.table.to_tokens());
        ts.space().push(Token::On).space();
        ts.append(&self.on.to_tokens_for_dialect(dialect));
        ts
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
}

impl OrderByExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, dir: None }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Asc),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Desc),
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);

        if let Some(dir) = &self.dir {
            ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }

        ts
    }
}

// =============================================================================
// Hierarchical clause (START WITH / CONNECT BY)
// =============================================================================

/// Oracle-style top-down traversal: `START WITH ... CONNECT BY ...`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectBy {
    /// Root row predicate. `None` treats every row as a root.
    pub start_with: Option<Expr>,
    /// Parent/child link, normally containing a `PRIOR` reference.
    pub condition: Option<Expr>,
}

impl ConnectBy {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        if let Some(start) = &self.start_with {
            ts.newline().push(Token::StartWith).space();
            ts.append(&start.to_tokens_for_dialect(dialect));
        }

        if let Some(condition) = &self.condition {
            ts.newline().push(Token::ConnectBy).space();
            ts.append(&condition.to_tokens_for_dialect(dialect));
        }

        ts
    }
}

// =============================================================================
// Set Operations
// =============================================================================

/// A UNION of two queries.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "SetOperation has no effect until converted to SQL with to_sql()"]
pub struct SetOperation {
    pub left: Box<Query>,
    pub all: bool,
    pub right: Box<Query>,
}

impl SetOperation {
    /// Create a UNION operation.
    pub fn union(left: Query, right: Query) -> Self {
        Self {
            left: Box::new(left),
            all: false,
            right: Box::new(right),
        }
    }

    /// Create a UNION ALL operation.
    pub fn union_all(left: Query, right: Query) -> Self {
        Self {
            left: Box::new(left),
            all: true,
            right: Box::new(right),
        }
    }

    /// Wrap this operation in a `Query` so it can be used as a CTE body.
    pub fn into_query(self) -> Query {
        Query {
            set_op: Some(Box::new(self)),
            ..Default::default()
        }
    }

    /// Convert to tokens for a specific dialect.
    ///
    /// A branch is only parenthesized when it carries its own WITH or
    /// ORDER BY; recursive CTE bodies must not wrap the recursive term.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        append_branch(&mut ts, &self.left, dialect);

        ts.newline().push(Token::Union);
        if self.all {
            ts.space().push(Token::All);
        }
        ts.newline();

        append_branch(&mut ts, &self.right, dialect);

        ts
    }

    /// Generate SQL string for a specific dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

fn append_branch(ts: &mut TokenStream, query: &Query, dialect: Dialect) {
    if query.needs_parens_in_set_op() {
        ts.lparen();
        ts.append(&query.to_tokens_for_dialect(dialect));
        ts.rparen();
    } else {
        ts.append(&query.to_tokens_for_dialect(dialect));
    }
}

// =============================================================================
// CTE (Common Table Expression)
// =============================================================================

/// A Common Table Expression (WITH clause).
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Cte {
    pub name: String,
    pub columns: Option<Vec<String>>,
    pub query: Box<Query>,
    /// Whether this is a recursive CTE.
    pub recursive: bool,
}

impl Cte {
    pub fn new(name: &str, query: Query) -> Self {
        Self {
            name: name.into(),
            columns: None,
            query: Box::new(query),
            recursive: false,
        }
    }

    /// Create a recursive CTE.
    pub fn recursive(name: &str, query: Query) -> Self {
        Self {
            recursive: true,
            ..Self::new(name, query)
        }
    }

    pub fn with_columns<S: AsRef<str>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(columns.into_iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()));

        if let Some(cols) = &self.columns {
            ts.space().lparen();
            for (i, col) in cols.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.push(Token::Ident(col.clone()));
            }
            ts.rparen();
        }

        ts.space()
            .push(Token::As)
            .space()
            .lparen()
            .newline()
            .append(&self.query.to_tokens_for_dialect(dialect))
            .newline()
            .rparen();

        ts
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query.
///
/// Builder methods take `self` by value and return a new query, so a base
/// query can be cloned and extended without touching the original.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    pub with: Vec<Cte>,
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub hierarchy: Option<ConnectBy>,
    pub order_by: Vec<OrderByExpr>,
    /// Render ORDER BY as ORDER SIBLINGS BY (hierarchical queries only).
    pub order_siblings: bool,
    /// Set operation (UNION) with another query.
    pub set_op: Option<Box<SetOperation>>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a CTE (WITH clause).
    pub fn with_cte(mut self, cte: Cte) -> Self {
        self.with.push(cte);
        self
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Append one item to the SELECT list.
    pub fn column(mut self, expr: impl Into<SelectExpr>) -> Self {
        self.select.push(expr.into());
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add an INNER JOIN.
    pub fn inner_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join { table, on });
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = match self.where_clause.take() {
            Some(existing) => conjunction([existing, condition]),
            None => Some(condition),
        };
        self
    }

    /// Set the START WITH root predicate.
    pub fn start_with(mut self, condition: Expr) -> Self {
        self.hierarchy.get_or_insert_with(ConnectBy::default).start_with = Some(condition);
        self
    }

    /// Set the CONNECT BY condition.
    pub fn connect_by(mut self, condition: Expr) -> Self {
        self.hierarchy.get_or_insert_with(ConnectBy::default).condition = Some(condition);
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self.order_siblings = false;
        self
    }

    /// Set an ORDER SIBLINGS BY clause, ordering children within each parent
    /// while keeping the hierarchical traversal order.
    pub fn order_siblings_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self.order_siblings = true;
        self
    }

    // =========================================================================
    // Set Operations
    // =========================================================================

    /// Combine with another query using UNION.
    pub fn union(self, other: Query) -> SetOperation {
        SetOperation::union(self, other)
    }

    /// Combine with another query using UNION ALL.
    pub fn union_all(self, other: Query) -> SetOperation {
        SetOperation::union_all(self, other)
    }

    fn needs_parens_in_set_op(&self) -> bool {
        self.set_op.is_none() && (!self.with.is_empty() || !self.order_by.is_empty())
    }

    /// Convert to token stream for the default dialect.
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Convert to token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        // If this query is a container for a set operation, emit that instead
        if let Some(ref set_op) = self.set_op {
            return set_op.to_tokens_for_dialect(dialect);
        }

        let mut ts = TokenStream::new();

        // WITH clause
        if !self.with.is_empty() {
            ts.push(Token::With);

            // Emit RECURSIVE keyword if any CTE is recursive AND dialect supports it
            let has_recursive = self.with.iter().any(|cte| cte.recursive);
            if has_recursive && dialect.emit_recursive_keyword() {
                ts.space().push(Token::Recursive);
            }

            ts.space();
            for (i, cte) in self.with.iter().enumerate() {
                if i > 0 {
                    ts.comma().newline();
                }
                ts.append(&cte.to_tokens_for_dialect(dialect));
            }
            ts.newline();
        }

        // SELECT
        ts.push(Token::Select);

        // Columns
        for (i, select_expr) in self.select.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            ts.append(&select_expr.to_tokens_for_dialect(dialect));
        }

        // FROM
        if let Some(from) = &self.from {
            ts.newline().push(Token::From).space();
            ts.append(&from.to_tokens());
        }

        // JOINs
        for join in &self.joins {
            ts.newline();
            ts.append(&join.to_tokens_for_dialect(dialect));
        }

        // WHERE
        if let Some(where_clause) = &self.where_clause {
            ts.newline().push(Token::Where).space();
            ts.append(&where_clause.to_tokens_for_dialect(dialect));
        }

        // START WITH / CONNECT BY
        if let Some(hierarchy) = &self.hierarchy {
            ts.append(&hierarchy.to_tokens_for_dialect(dialect));
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            ts.newline().push(if self.order_siblings {
                Token::OrderSiblingsBy
            } else {
                Token::OrderBy
            });
            ts.space();
            for (i, order_expr) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&order_expr.to_tokens_for_dialect(dialect));
            }
        }

        ts
    }

    /// Generate SQL string for a specific dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Formats the query using the default dialect (PostgreSQL).
    ///
    /// For dialect-specific SQL, use [`Query::to_sql`] instead.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(Dialect::default()))
    }
}

// =============================================================================
// Tests
// =============================================================================
