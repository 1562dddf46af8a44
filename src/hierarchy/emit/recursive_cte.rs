//! PostgreSQL emitter: `WITH RECURSIVE`.
//!
//! ```text
//! WITH RECURSIVE "rec" (<projection>, "level", "connect_path", "cycle") AS (
//!   <base query> + 1, ARRAY[child], false              -- anchor: roots
//!   UNION ALL
//!   <base query> + level + 1, path || child, cycle     -- children of rec
//!     INNER JOIN "rec" ON parent = "rec".child
//!     WHERE NOT "rec"."cycle"
//! )
//! SELECT <projection>, "level", "connect_path",
//!   CASE WHEN path <@ LEAD(path) OVER (ORDER BY path) THEN false ELSE true END
//! FROM "rec" ORDER BY "connect_path"
//! ```
//!
//! A row is a leaf when the next row in path order does not descend from it.
//! The cycle flag stops recursion the first time a key repeats on a path;
//! that repeated row is still returned once.
//!
//! Both branches cast `connect_path` to the same array type. PostgreSQL
//! rejects a recursive CTE whose column types differ between the anchor and
//! the recursive term, and `ARRAY_APPEND` drops length modifiers.

use super::{
    ColumnKind, HierarchyEmitter, HierarchySql, SyntheticColumn, CONNECT_PATH, CYCLE, IS_LEAF,
    LEVEL,
};
use crate::hierarchy::request::{HierarchyRequest, KeyType};
use crate::sql::dialect::Dialect;
use crate::sql::expr::{
    array, case_when, cast, coalesce, col, func, lead_offset, lit_bool, lit_int, placeholder,
    table_col, ExprExt, WindowExt, WindowOrderBy,
};
use crate::sql::query::{Cte, OrderByExpr, Query, TableRef};
use crate::sql::types::DataType;

/// Name of the recursive CTE, unless the base table already uses it.
const CTE_NAME: &str = "rec";
const CTE_NAME_ALT: &str = "rec_tree";

#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveCteEmitter;

impl HierarchyEmitter for RecursiveCteEmitter {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn emit(&self, request: &HierarchyRequest) -> HierarchySql {
        let base = request.base_query();
        let table = base.qualifier();
        let parent = request.self_reference().parent.as_str();
        let child = request.self_reference().child.as_str();
        let key_type = request.key_data_type().clone();
        let element_type = path_element_type(request);
        let path_type = DataType::Array(Box::new(element_type.clone()));

        let path_element = if element_type == key_type {
            table_col(table, child)
        } else {
            cast(table_col(table, child), element_type.clone())
        };

        let rec = if table == CTE_NAME { CTE_NAME_ALT } else { CTE_NAME };

        // Anchor: the root rows.
        let mut params = Vec::new();
        let mut anchor = base
            .to_query()
            .column(lit_int(1).alias(LEVEL))
            .column(cast(array(vec![path_element.clone()]), path_type.clone()).alias(CONNECT_PATH))
            .column(lit_bool(false).alias(CYCLE));

        if let Some(root) = request.root_value() {
            params.push(request.sentinel().to_string());
            params.push(root.to_string());
            anchor = anchor.filter(
                coalesce(vec![
                    table_col(table, parent),
                    cast(placeholder(1), key_type.clone()),
                ])
                .eq(cast(placeholder(2), key_type)),
            );
        }

        // Recursive term: children of rows already found.
        let recursive = base
            .to_query()
            .column(table_col(rec, LEVEL).add(lit_int(1)))
            .column(cast(
                func("ARRAY_APPEND", vec![table_col(rec, CONNECT_PATH), path_element]),
                path_type,
            ))
            .column(table_col(table, child).eq_any(table_col(rec, CONNECT_PATH)))
            .inner_join(
                TableRef::new(rec),
                table_col(table, parent).eq(table_col(rec, child)),
            )
            .filter(table_col(rec, CYCLE).not());

        let cte_columns = base
            .projection()
            .iter()
            .map(String::as_str)
            .chain([LEVEL, CONNECT_PATH, CYCLE]);

        let path = col(CONNECT_PATH);
        let next_path = lead_offset(path.clone(), 1)
            .over()
            .order_by(vec![WindowOrderBy::new(path.clone())])
            .build();
        let is_leaf = case_when(
            vec![(path.clone().contained_by(next_path), lit_bool(false))],
            lit_bool(true),
        );

        let query = Query::new()
            .with_cte(
                Cte::recursive(rec, anchor.union_all(recursive).into_query())
                    .with_columns(cte_columns),
            )
            .select(base.projection().iter().map(|c| col(c)).collect::<Vec<_>>())
            .column(col(LEVEL))
            .column(path.clone())
            .column(is_leaf.alias(IS_LEAF))
            .from(TableRef::new(rec))
            .order_by(vec![OrderByExpr::new(path)]);

        let sql = query.to_sql(Dialect::Postgres);
        log::trace!("recursive CTE for {}:\n{sql}", request.table_name());

        HierarchySql {
            dialect: Dialect::Postgres,
            sql,
            params,
            columns: base.projection().to_vec(),
            synthetic: vec![
                SyntheticColumn::new(LEVEL, ColumnKind::Integer),
                SyntheticColumn::new(
                    CONNECT_PATH,
                    ColumnKind::KeyArray {
                        element: element_type,
                    },
                ),
                SyntheticColumn::new(IS_LEAF, ColumnKind::Boolean),
            ],
        }
    }
}

/// Element type of `connect_path`.
///
/// Text keys are collected as `VARCHAR(n)` (or `TEXT` when unbounded) so
/// `CHAR(n)` padding never reaches the path; other keys keep their declared
/// type.
fn path_element_type(request: &HierarchyRequest) -> DataType {
    match request.key_type() {
        KeyType::Text {
            max_length: Some(n),
        } => DataType::Varchar(n),
        KeyType::Text { max_length: None } => DataType::String,
        KeyType::Integer => request.key_data_type().clone(),
    }
}
