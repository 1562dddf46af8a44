//! Oracle emitter: `START WITH` / `CONNECT BY PRIOR`.
//!
//! The engine does the traversal; the emitter only adds the pseudo-columns
//! `LEVEL` and `CONNECT_BY_ISLEAF` and builds the path with
//! `SYS_CONNECT_BY_PATH`, trimming its leading separator.
//!
//! `START WITH` picks roots before `WHERE` runs, so the base filter is
//! repeated in `START WITH` and `CONNECT BY` as well: an excluded row can
//! neither root a traversal nor link its descendants in. The generated
//! aliases are always quoted so they come back lowercase.

use super::{
    ColumnKind, HierarchyEmitter, HierarchySql, SyntheticColumn, CONNECT_PATH, IS_LEAF, LEVEL,
};
use crate::hierarchy::request::HierarchyRequest;
use crate::sql::dialect::Dialect;
use crate::sql::expr::{conjunction, func, lit_str, placeholder, prior, raw_sql, table_col, ExprExt};
use crate::sql::query::OrderByExpr;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectByEmitter;

impl HierarchyEmitter for ConnectByEmitter {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn emit(&self, request: &HierarchyRequest) -> HierarchySql {
        let base = request.base_query();
        let table = base.qualifier();
        let parent = request.self_reference().parent.as_str();
        let child = request.self_reference().child.as_str();
        let separator = request.options().path_separator.as_str();

        let path = func(
            "LTRIM",
            vec![
                func(
                    "SYS_CONNECT_BY_PATH",
                    vec![table_col(table, child), lit_str(separator)],
                ),
                lit_str(separator),
            ],
        );

        let mut params = Vec::new();
        let mut query = base
            .to_query()
            .column(raw_sql("LEVEL").quoted_alias(LEVEL))
            .column(path.quoted_alias(CONNECT_PATH))
            .column(raw_sql("CONNECT_BY_ISLEAF").quoted_alias(IS_LEAF));

        // Oracle has no sentinel coalescing: the default root is a NULL parent.
        let root = if request.starts_at_roots() {
            Some(table_col(table, parent).is_null())
        } else if let Some(value) = request.root_value() {
            params.push(value.to_string());
            Some(table_col(table, parent).eq(placeholder(1)))
        } else {
            None
        };

        let filter = base.qualified_filter();
        if let Some(condition) = conjunction(root.into_iter().chain(filter.clone())) {
            query = query.start_with(condition);
        }

        let link = prior(table_col(table, child)).eq(table_col(table, parent));
        if let Some(condition) = conjunction([link].into_iter().chain(filter)) {
            query = query.connect_by(condition);
        }

        let query = query.order_siblings_by(vec![OrderByExpr::new(table_col(table, child))]);

        let sql = query.to_sql(Dialect::Oracle);
        log::trace!("CONNECT BY query for {}:\n{sql}", request.table_name());

        HierarchySql {
            dialect: Dialect::Oracle,
            sql,
            params,
            columns: base.projection().to_vec(),
            synthetic: vec![
                SyntheticColumn::new(LEVEL, ColumnKind::Integer),
                SyntheticColumn::new(
                    CONNECT_PATH,
                    ColumnKind::Text {
                        separator: separator.to_string(),
                    },
                ),
                SyntheticColumn::new(IS_LEAF, ColumnKind::Integer),
            ],
        }
    }
}
