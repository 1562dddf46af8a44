//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.

use super::dialect::Dialect;
use super::token::{Token, TokenStream};
use super::types::DataType;

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Literal values
    Literal(Literal),

    /// Positional bind parameter (1-based), rendered per dialect (`$1`, `:1`).
    Placeholder(usize),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// BETWEEN: expr BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Array constructor: ARRAY[a, b, ...]
    Array(Vec<Expr>),

    /// CAST(expr AS type)
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    /// Array membership: expr = ANY(array)
    AnyOf { expr: Box<Expr>, array: Box<Expr> },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Window function expression.
    ///
    /// Example: `LEAD(path, 1) OVER (ORDER BY path)`
    WindowFunction {
        /// The function being windowed (usually Expr::Function)
        function: Box<Expr>,
        /// PARTITION BY expressions
        partition_by: Vec<Expr>,
        /// ORDER BY within window
        order_by: Vec<WindowOrderBy>,
    },

    /// Raw SQL expression passed directly to output without escaping.
    ///
    /// # Security Warning
    ///
    /// **Never pass user input to this variant.** Raw SQL is not sanitized
    /// and can lead to SQL injection vulnerabilities. Only use with:
    /// - Trusted, static SQL fragments
    /// - Dialect-specific syntax not covered by structured expressions
    ///
    /// For user-provided values, use `Expr::Placeholder` or `Expr::Literal`.
    Raw(String),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // String
    Concat,
    Like,
    // Array
    ContainedBy,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
    /// Oracle `PRIOR`: refers to the parent row in a CONNECT BY condition.
    Prior,
}

// =============================================================================
// Window Function Types
// =============================================================================

/// ORDER BY expression within a window specification.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOrderBy {
    pub expr: Expr,
    pub dir: Option<SortDir>,
}

impl WindowOrderBy {
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
}

/// Sort direction (shared with query ORDER BY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Expression to Tokens
// =============================================================================

impl Expr {
    /// Convert this expression to a token stream for the default dialect.
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Convert this expression to a token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Bool(b) => Token::LitBool(*b),
                    Literal::Null => Token::LitNull,
                });
            }

            Expr::Placeholder(index) => {
                ts.push(Token::Placeholder(*index));
            }

            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens_for_dialect(dialect));
                ts.space();
                ts.push(binary_op_to_token(*op));
                ts.space();
                ts.append(&right.to_tokens_for_dialect(dialect));
            }

            Expr::UnaryOp { op, expr } => {
                ts.push(match op {
                    UnaryOperator::Not => Token::Not,
                    UnaryOperator::Minus => Token::Minus,
                    UnaryOperator::Prior => Token::Prior,
                });
                ts.space();
                ts.append(&expr.to_tokens_for_dialect(dialect));
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                append_list(&mut ts, args, dialect);
                ts.rparen();
            }

            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                ts.push(Token::Case);
                if let Some(op) = operand {
                    ts.space().append(&op.to_tokens_for_dialect(dialect));
                }
                for (when, then) in when_clauses {
                    ts.space().push(Token::When).space();
                    ts.append(&when.to_tokens_for_dialect(dialect));
                    ts.space().push(Token::Then).space();
                    ts.append(&then.to_tokens_for_dialect(dialect));
                }
                if let Some(else_expr) = else_clause {
                    ts.space().push(Token::Else).space();
                    ts.append(&else_expr.to_tokens_for_dialect(dialect));
                }
                ts.space().push(Token::End);
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // Empty IN list: "x IN ()" is invalid SQL
                // "x IN ()" should be FALSE, "x NOT IN ()" should be TRUE
                if values.is_empty() {
                    ts.push(Token::LitBool(*negated));
                } else {
                    ts.append(&expr.to_tokens_for_dialect(dialect));
                    if *negated {
                        ts.space().push(Token::Not);
                    }
                    ts.space().push(Token::In).space().lparen();
                    append_list(&mut ts, values, dialect);
                    ts.rparen();
                }
            }

            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                ts.append(&expr.to_tokens_for_dialect(dialect));
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::Between).space();
                ts.append(&low.to_tokens_for_dialect(dialect));
                ts.space().push(Token::And).space();
                ts.append(&high.to_tokens_for_dialect(dialect));
            }

            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens_for_dialect(dialect));
                ts.space();
                ts.push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::Array(elements) => {
                ts.push(Token::Array).push(Token::LBracket);
                append_list(&mut ts, elements, dialect);
                ts.push(Token::RBracket);
            }

            Expr::Cast { expr, data_type } => {
                ts.push(Token::Cast).lparen();
                ts.append(&expr.to_tokens_for_dialect(dialect));
                ts.space()
                    .push(Token::As)
                    .space()
                    .push(Token::TypeName(data_type.clone()));
                ts.rparen();
            }

            Expr::AnyOf { expr, array } => {
                ts.append(&expr.to_tokens_for_dialect(dialect));
                ts.space().push(Token::Eq).space().push(Token::Any).lparen();
                ts.append(&array.to_tokens_for_dialect(dialect));
                ts.rparen();
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens_for_dialect(dialect));
                ts.rparen();
            }

            Expr::WindowFunction {
                function,
                partition_by,
                order_by,
            } => {
                ts.append(&function.to_tokens_for_dialect(dialect));

                // OVER (...)
                ts.space().push(Token::Over).space().lparen();

                if !partition_by.is_empty() {
                    ts.push(Token::PartitionBy).space();
                    append_list(&mut ts, partition_by, dialect);
                }

                if !order_by.is_empty() {
                    if !partition_by.is_empty() {
                        ts.space();
                    }
                    ts.push(Token::OrderBy).space();
                    for (i, ob) in order_by.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.append(&ob.expr.to_tokens_for_dialect(dialect));
                        if let Some(dir) = &ob.dir {
                            ts.space().push(match dir {
                                SortDir::Asc => Token::Asc,
                                SortDir::Desc => Token::Desc,
                            });
                        }
                    }
                }

                ts.rparen();
            }

            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }

        ts
    }

    /// Return a copy with every unqualified column reference qualified by
    /// `table`. Already-qualified columns and raw SQL are left alone.
    pub fn qualified(&self, table: &str) -> Expr {
        let q = |e: &Expr| Box::new(e.qualified(table));
        let q_all = |es: &Vec<Expr>| es.iter().map(|e| e.qualified(table)).collect::<Vec<_>>();

        match self {
            Expr::Column {
                table: None,
                column,
            } => table_col(table, column),
            Expr::Column { .. } | Expr::Literal(_) | Expr::Placeholder(_) | Expr::Raw(_) => {
                self.clone()
            }
            Expr::BinaryOp { left, op, right } => Expr::BinaryOp {
                left: q(left),
                op: *op,
                right: q(right),
            },
            Expr::UnaryOp { op, expr } => Expr::UnaryOp {
                op: *op,
                expr: q(expr),
            },
            Expr::Function { name, args } => Expr::Function {
                name: name.clone(),
                args: q_all(args),
            },
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => Expr::Case {
                operand: operand.as_deref().map(q),
                when_clauses: when_clauses
                    .iter()
                    .map(|(w, t)| (w.qualified(table), t.qualified(table)))
                    .collect(),
                else_clause: else_clause.as_deref().map(q),
            },
            Expr::In {
                expr,
                values,
                negated,
            } => Expr::In {
                expr: q(expr),
                values: q_all(values),
                negated: *negated,
            },
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => Expr::Between {
                expr: q(expr),
                low: q(low),
                high: q(high),
                negated: *negated,
            },
            Expr::IsNull { expr, negated } => Expr::IsNull {
                expr: q(expr),
                negated: *negated,
            },
            Expr::Array(elements) => Expr::Array(q_all(elements)),
            Expr::Cast { expr, data_type } => Expr::Cast {
                expr: q(expr),
                data_type: data_type.clone(),
            },
            Expr::AnyOf { expr, array } => Expr::AnyOf {
                expr: q(expr),
                array: q(array),
            },
            Expr::Paren(inner) => Expr::Paren(q(inner)),
            Expr::WindowFunction {
                function,
                partition_by,
                order_by,
            } => Expr::WindowFunction {
                function: q(function),
                partition_by: q_all(partition_by),
                order_by: order_by
                    .iter()
                    .map(|ob| WindowOrderBy {
                        expr: ob.expr.qualified(table),
                        dir: ob.dir,
                    })
                    .collect(),
            },
        }
    }

    /// Names of all unqualified column references, in first-seen order.
    pub fn unqualified_columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_unqualified(&mut out);
        out
    }

    fn collect_unqualified<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Column {
                table: None,
                column,
            } => {
                if !out.contains(&column.as_str()) {
                    out.push(column);
                }
            }
            Expr::Column { .. } | Expr::Literal(_) | Expr::Placeholder(_) | Expr::Raw(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.collect_unqualified(out);
                right.collect_unqualified(out);
            }
            Expr::UnaryOp { expr, .. }
            | Expr::IsNull { expr, .. }
            | Expr::Cast { expr, .. }
            | Expr::Paren(expr) => expr.collect_unqualified(out),
            Expr::Function { args, .. } | Expr::Array(args) => {
                args.iter().for_each(|a| a.collect_unqualified(out))
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(op) = operand {
                    op.collect_unqualified(out);
                }
                for (w, t) in when_clauses {
                    w.collect_unqualified(out);
                    t.collect_unqualified(out);
                }
                if let Some(e) = else_clause {
                    e.collect_unqualified(out);
                }
            }
            Expr::In { expr, values, .. } => {
                expr.collect_unqualified(out);
                values.iter().for_each(|v| v.collect_unqualified(out));
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.collect_unqualified(out);
                low.collect_unqualified(out);
                high.collect_unqualified(out);
            }
            Expr::AnyOf { expr, array } => {
                expr.collect_unqualified(out);
                array.collect_unqualified(out);
            }
            Expr::WindowFunction {
                function,
                partition_by,
                order_by,
            } => {
                function.collect_unqualified(out);
                partition_by.iter().for_each(|p| p.collect_unqualified(out));
                order_by.iter().for_each(|o| o.expr.collect_unqualified(out));
            }
        }
    }

    /// Wrap in parentheses when the expression is an OR chain, so it can be
    /// safely used as an operand of AND.
    fn grouped_for_and(self) -> Expr {
        match self {
            Expr::BinaryOp {
                op: BinaryOperator::Or,
                ..
            } => Expr::Paren(Box::new(self)),
            other => other,
        }
    }
}

fn append_list(ts: &mut TokenStream, exprs: &[Expr], dialect: Dialect) {
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&e.to_tokens_for_dialect(dialect));
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Mod => Token::Mod,
        BinaryOperator::Concat => Token::Concat,
        BinaryOperator::Like => Token::Like,
        BinaryOperator::ContainedBy => Token::ContainedBy,
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// Create a NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Create a positional bind placeholder (1-based).
pub fn placeholder(index: usize) -> Expr {
    Expr::Placeholder(index)
}

/// ARRAY[elements...]
pub fn array(elements: Vec<Expr>) -> Expr {
    Expr::Array(elements)
}

/// CAST(expr AS data_type)
pub fn cast(expr: Expr, data_type: DataType) -> Expr {
    Expr::Cast {
        expr: Box::new(expr),
        data_type,
    }
}

/// PRIOR expr (CONNECT BY conditions only).
pub fn prior(expr: Expr) -> Expr {
    Expr::UnaryOp {
        op: UnaryOperator::Prior,
        expr: Box::new(expr),
    }
}

/// CASE WHEN cond THEN then ... ELSE otherwise END
pub fn case_when(when_clauses: Vec<(Expr, Expr)>, otherwise: Expr) -> Expr {
    Expr::Case {
        operand: None,
        when_clauses,
        else_clause: Some(Box::new(otherwise)),
    }
}

/// AND together all expressions, parenthesizing OR operands.
///
/// Returns `None` for an empty input.
pub fn conjunction(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    exprs
        .into_iter()
        .map(Expr::grouped_for_and)
        .reduce(|acc, e| acc.and(e))
}

/// COALESCE(args...)
pub fn coalesce(args: Vec<Expr>) -> Expr {
    func("COALESCE", args)
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

// =============================================================================
// Window Functions
// =============================================================================

/// LEAD(expr) - access next row value.
pub fn lead(expr: Expr) -> Expr {
    func("LEAD", vec![expr])
}

/// LEAD(expr, offset) - access next row value with offset.
pub fn lead_offset(expr: Expr, offset: i64) -> Expr {
    func("LEAD", vec![expr, lit_int(offset)])
}

/// ROW_NUMBER() - assigns sequential row numbers.
pub fn row_number() -> Expr {
    func("ROW_NUMBER", vec![])
}

/// Raw SQL expression (pass-through, no parsing).
///
/// # Security Warning
///
/// **Never pass user input to this function.** The SQL is not sanitized
/// and can lead to SQL injection vulnerabilities.
///
/// Used for engine pseudo-columns such as `LEVEL` and `CONNECT_BY_ISLEAF`.
pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

// =============================================================================
// Window Builder
// =============================================================================

/// Builder for creating window function expressions.
#[derive(Debug, Clone)]
#[must_use = "WindowBuilder has no effect until build() is called"]
pub struct WindowBuilder {
    function: Expr,
    partition_by: Vec<Expr>,
    order_by: Vec<WindowOrderBy>,
}

impl WindowBuilder {
    /// Create a new window builder for the given function.
    pub fn new(function: Expr) -> Self {
        Self {
            function,
            partition_by: vec![],
            order_by: vec![],
        }
    }

    /// Add PARTITION BY expressions.
    pub fn partition_by(mut self, exprs: Vec<Expr>) -> Self {
        self.partition_by = exprs;
        self
    }

    /// Add ORDER BY expressions.
    pub fn order_by(mut self, exprs: Vec<WindowOrderBy>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Build the window function expression.
    pub fn build(self) -> Expr {
        Expr::WindowFunction {
            function: Box::new(self.function),
            partition_by: self.partition_by,
            order_by: self.order_by,
        }
    }
}

/// Extension trait for adding OVER clause to expressions.
pub trait WindowExt: Sized {
    /// Start building a window function with OVER clause.
    fn over(self) -> WindowBuilder;
}

impl WindowExt for Expr {
    fn over(self) -> WindowBuilder {
        WindowBuilder::new(self)
    }
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Plus, other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Minus, other.into())
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    fn concat(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Concat, other.into())
    }

    // Array operators

    /// `self <@ other`: every element of `self` appears in `other`.
    fn contained_by(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::ContainedBy, other.into())
    }

    /// `self = ANY(array)`
    fn eq_any(self, array: impl Into<Expr>) -> Expr {
        Expr::AnyOf {
            expr: Box::new(self.into_expr()),
            array: Box::new(array.into()),
        }
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    // IN operator
    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    // BETWEEN operator
    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> crate::sql::query::SelectExpr {
        crate::sql::query::SelectExpr::new(self.into_expr()).with_alias(name)
    }

    /// Alias this expression, always double-quoting the alias.
    fn quoted_alias(self, name: &str) -> crate::sql::query::SelectExpr {
        crate::sql::query::SelectExpr::new(self.into_expr()).with_quoted_alias(name)
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

// =============================================================================
// Tests
// =============================================================================
