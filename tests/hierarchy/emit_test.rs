//! Exact SQL for both hierarchical idioms over the `dummy_hierarchy` table.

use arbor::hierarchy::ColumnKind;
use arbor::prelude::*;
use insta::assert_snapshot;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

fn dummy_hierarchy() -> TableDescriptor {
    TableDescriptor::new("dummy_hierarchy")
        .column(ColumnDescriptor::new("id", DataType::Int32))
        .column(ColumnDescriptor::new("name", DataType::Varchar(10)))
        .column(
            ColumnDescriptor::new("parent_id", DataType::Int32).references("dummy_hierarchy", "id"),
        )
        .column(ColumnDescriptor::new("active", DataType::Bool))
}

fn emit(dialect: Dialect, base: BaseQuery, options: HierarchyOptions) -> HierarchySql {
    let table = dummy_hierarchy();
    let request = HierarchyRequest::new(&table, base, options).unwrap();
    let version = match dialect {
        Dialect::Postgres => Version::new(16, 2, 0),
        Dialect::Oracle => Version::new(19, 0, 0),
    };
    compile_for(&request, dialect, version).unwrap()
}

fn projection() -> BaseQuery {
    BaseQuery::new(&dummy_hierarchy()).columns(["id", "name", "parent_id"])
}

/// Array types `connect_path` is cast to in the anchor and recursive terms.
fn path_types(sql: &str) -> (String, String) {
    let cast_target = |start: &str, end: &str| -> String {
        let from = sql.find(start).unwrap_or_else(|| panic!("missing {start:?} in\n{sql}"));
        let rest = &sql[from..];
        let to = rest.find(end).unwrap_or_else(|| panic!("missing {end:?} in\n{sql}"));
        let expr = &rest[..to];
        let at = expr.rfind(" AS ").unwrap();
        expr[at + 4..].to_string()
    };
    (
        cast_target("CAST(ARRAY[", ") AS \"connect_path\""),
        cast_target("CAST(ARRAY_APPEND(", "),\n"),
    )
}

fn assert_valid_postgres(sql: &str) {
    if let Err(e) = Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        panic!("invalid PostgreSQL: {e}\n{sql}");
    }
}

// ============================================================================
// WITH RECURSIVE
// ============================================================================

#[test]
fn postgres_default_root() {
    let out = emit(Dialect::Postgres, projection(), HierarchyOptions::default());

    assert_snapshot!(out.sql, @r#"
WITH RECURSIVE "rec" ("id", "name", "parent_id", "level", "connect_path", "cycle") AS (
SELECT
  "dummy_hierarchy"."id",
  "dummy_hierarchy"."name",
  "dummy_hierarchy"."parent_id",
  1 AS "level",
  CAST(ARRAY["dummy_hierarchy"."id"] AS INTEGER[]) AS "connect_path",
  false AS "cycle"
FROM "dummy_hierarchy"
WHERE COALESCE("dummy_hierarchy"."parent_id", CAST($1 AS INTEGER)) = CAST($2 AS INTEGER)
UNION ALL
SELECT
  "dummy_hierarchy"."id",
  "dummy_hierarchy"."name",
  "dummy_hierarchy"."parent_id",
  "rec"."level" + 1,
  CAST(ARRAY_APPEND("rec"."connect_path", "dummy_hierarchy"."id") AS INTEGER[]),
  "dummy_hierarchy"."id" = ANY("rec"."connect_path")
FROM "dummy_hierarchy"
INNER JOIN "rec" ON "dummy_hierarchy"."parent_id" = "rec"."id"
WHERE NOT "rec"."cycle"
)
SELECT
  "id",
  "name",
  "parent_id",
  "level",
  "connect_path",
  CASE WHEN "connect_path" <@ LEAD("connect_path", 1) OVER (ORDER BY "connect_path") THEN false ELSE true END AS "is_leaf"
FROM "rec"
ORDER BY "connect_path"
"#);
    assert_eq!(out.params, vec!["0", "0"]);
    assert_valid_postgres(&out.sql);
}

#[test]
fn postgres_filtered_subtree() {
    let base = projection().filter(col("active").eq(true));
    let out = emit(
        Dialect::Postgres,
        base,
        HierarchyOptions::default().starting_node(3),
    );

    assert!(out.sql.contains(
        "FROM \"dummy_hierarchy\"\n\
         WHERE \"dummy_hierarchy\".\"active\" = true AND \
         COALESCE(\"dummy_hierarchy\".\"parent_id\", CAST($1 AS INTEGER)) = CAST($2 AS INTEGER)\n\
         UNION ALL"
    ));
    assert!(out.sql.contains(
        "INNER JOIN \"rec\" ON \"dummy_hierarchy\".\"parent_id\" = \"rec\".\"id\"\n\
         WHERE \"dummy_hierarchy\".\"active\" = true AND NOT \"rec\".\"cycle\"\n)"
    ));
    assert_eq!(out.params, vec!["0", "3"]);
    assert_valid_postgres(&out.sql);
}

#[test]
fn postgres_artifact_columns() {
    let out = emit(Dialect::Postgres, projection(), HierarchyOptions::default());
    assert_eq!(
        out.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "parent_id", "level", "connect_path", "is_leaf"]
    );
    assert_eq!(out.synthetic[0].kind, ColumnKind::Integer);
    assert_eq!(
        out.synthetic[1].kind,
        ColumnKind::KeyArray {
            element: DataType::Int32
        }
    );
    assert_eq!(out.synthetic[2].kind, ColumnKind::Boolean);
}

// ============================================================================
// CONNECT BY
// ============================================================================

#[test]
fn oracle_default_root() {
    let out = emit(Dialect::Oracle, projection(), HierarchyOptions::default());

    assert_snapshot!(out.sql, @r#"
SELECT
  dummy_hierarchy.id,
  dummy_hierarchy.name,
  dummy_hierarchy.parent_id,
  LEVEL AS "level",
  LTRIM(SYS_CONNECT_BY_PATH(dummy_hierarchy.id, ','), ',') AS "connect_path",
  CONNECT_BY_ISLEAF AS "is_leaf"
FROM dummy_hierarchy
START WITH dummy_hierarchy.parent_id IS NULL
CONNECT BY PRIOR dummy_hierarchy.id = dummy_hierarchy.parent_id
ORDER SIBLINGS BY dummy_hierarchy.id
"#);
    assert!(out.params.is_empty());
}

#[test]
fn oracle_filtered_subtree() {
    let base = projection().filter(col("active").eq(true));
    let out = emit(
        Dialect::Oracle,
        base,
        HierarchyOptions::default().starting_node(3),
    );

    assert_eq!(
        out.sql,
        "SELECT\n  dummy_hierarchy.id,\n  dummy_hierarchy.name,\n  dummy_hierarchy.parent_id,\n  \
         LEVEL AS \"level\",\n  \
         LTRIM(SYS_CONNECT_BY_PATH(dummy_hierarchy.id, ','), ',') AS \"connect_path\",\n  \
         CONNECT_BY_ISLEAF AS \"is_leaf\"\n\
         FROM dummy_hierarchy\n\
         WHERE dummy_hierarchy.active = 1\n\
         START WITH dummy_hierarchy.parent_id = :1 AND dummy_hierarchy.active = 1\n\
         CONNECT BY PRIOR dummy_hierarchy.id = dummy_hierarchy.parent_id AND dummy_hierarchy.active = 1\n\
         ORDER SIBLINGS BY dummy_hierarchy.id"
    );
    assert_eq!(out.params, vec!["3"]);
}

#[test]
fn oracle_quotes_reserved_names() {
    let table = TableDescriptor::new("nodes")
        .column(ColumnDescriptor::new("id", DataType::Int32))
        .column(ColumnDescriptor::new("parent_id", DataType::Int32).references("nodes", "id"))
        .column(ColumnDescriptor::new("size", DataType::Int32))
        .column(ColumnDescriptor::new("Label", DataType::Varchar(20)));
    let request = HierarchyRequest::for_table(&table, HierarchyOptions::default()).unwrap();
    let out = compile_for(&request, Dialect::Oracle, Version::new(10, 0, 0)).unwrap();

    assert!(out.sql.contains("  nodes.\"size\",\n"));
    assert!(out.sql.contains("  nodes.Label,\n"));
}

#[test]
fn oracle_artifact_columns() {
    let out = emit(
        Dialect::Oracle,
        projection(),
        HierarchyOptions::default().path_separator("/"),
    );
    assert_eq!(
        out.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "parent_id", "level", "connect_path", "is_leaf"]
    );
    assert_eq!(
        out.synthetic[1].kind,
        ColumnKind::Text {
            separator: "/".into()
        }
    );
    assert_eq!(out.synthetic[2].kind, ColumnKind::Integer);
}

// ============================================================================
// Key types
// ============================================================================

#[test]
fn path_type_agrees_across_recursive_terms() {
    let cases = [
        (DataType::Int32, "INTEGER[]"),
        (DataType::Int64, "BIGINT[]"),
        (DataType::Decimal(12, 0), "DECIMAL(12, 0)[]"),
        (DataType::Varchar(10), "VARCHAR(10)[]"),
        (DataType::Char(3), "VARCHAR(3)[]"),
        (DataType::String, "TEXT[]"),
    ];

    for (key, expected) in cases {
        let table = TableDescriptor::new("th")
            .column(ColumnDescriptor::new("code", key.clone()))
            .column(ColumnDescriptor::new("parent_code", key.clone()).references("th", "code"));
        let request = HierarchyRequest::for_table(&table, HierarchyOptions::default()).unwrap();
        let out = compile_for(&request, Dialect::Postgres, Version::new(15, 0, 0)).unwrap();

        let (anchor, recursive) = path_types(&out.sql);
        assert_eq!(anchor, expected, "anchor path type for {key}");
        assert_eq!(recursive, expected, "recursive path type for {key}");
        assert_valid_postgres(&out.sql);
    }
}

#[test]
fn text_keys_use_text_sentinel() {
    let table = TableDescriptor::new("categories")
        .column(ColumnDescriptor::new("code", DataType::Varchar(8)))
        .column(
            ColumnDescriptor::new("parent_code", DataType::Varchar(8))
                .references("categories", "code"),
        );
    let request = HierarchyRequest::for_table(&table, HierarchyOptions::default()).unwrap();

    let pg = compile_for(&request, Dialect::Postgres, Version::new(12, 0, 0)).unwrap();
    assert_eq!(pg.params, vec!["a", "a"]);
    assert!(pg.sql.contains(
        "COALESCE(\"categories\".\"parent_code\", CAST($1 AS VARCHAR(8))) = CAST($2 AS VARCHAR(8))"
    ));
    assert!(pg.sql.contains("CAST(ARRAY[\"categories\".\"code\"] AS VARCHAR(8)[])"));
    assert!(pg.sql.contains(
        "CAST(ARRAY_APPEND(\"rec\".\"connect_path\", \"categories\".\"code\") AS VARCHAR(8)[])"
    ));
    assert_valid_postgres(&pg.sql);

    let ora = compile_for(&request, Dialect::Oracle, Version::new(12, 1, 0)).unwrap();
    assert!(ora.sql.contains("START WITH categories.parent_code IS NULL"));
}
