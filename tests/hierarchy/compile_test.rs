//! Dispatcher, capability gate and request behaviour over the 12-node fixture:
//!
//! ```text
//! 1
//! ├── 2
//! │   └── 4
//! │       └── 6
//! │           └── 8
//! │               ├── 10
//! │               └── 12
//! └── 3
//!     ├── 5
//!     ├── 7
//!     └── 9
//!         └── 11
//! ```

use arbor::hierarchy::{resolve_self_reference, KeyType, SelfReference};
use arbor::prelude::*;

fn dummy_hierarchy() -> TableDescriptor {
    TableDescriptor::new("dummy_hierarchy")
        .column(ColumnDescriptor::new("id", DataType::Int32))
        .column(ColumnDescriptor::new("name", DataType::Varchar(10)))
        .column(
            ColumnDescriptor::new("parent_id", DataType::Int32).references("dummy_hierarchy", "id"),
        )
        .column(ColumnDescriptor::new("active", DataType::Bool))
}

fn no_fk_tb() -> TableDescriptor {
    TableDescriptor::new("no_fk_tb")
        .column(ColumnDescriptor::new("id", DataType::Int32))
        .column(ColumnDescriptor::new("name", DataType::Varchar(10)))
        .column(ColumnDescriptor::new("descrip", DataType::Varchar(100)))
}

fn default_request() -> HierarchyRequest {
    HierarchyRequest::for_table(&dummy_hierarchy(), HierarchyOptions::default()).unwrap()
}

// ============================================================================
// Foreign key resolution
// ============================================================================

#[test]
fn resolves_parent_and_child_columns() {
    let fk = resolve_self_reference(&dummy_hierarchy()).unwrap();
    assert_eq!(
        fk,
        SelfReference {
            parent: "parent_id".into(),
            child: "id".into(),
        }
    );

    let request = default_request();
    assert_eq!(request.key_type(), KeyType::Integer);
    assert_eq!(request.key_data_type(), &DataType::Int32);
}

#[test]
fn table_without_self_reference_is_rejected() {
    let err = HierarchyRequest::for_table(&no_fk_tb(), HierarchyOptions::default()).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::MissingForeignKey {
            table: "no_fk_tb".into()
        }
    );
    assert_eq!(
        err.to_string(),
        "table 'no_fk_tb' has no self-referential foreign key"
    );
}

// ============================================================================
// Capability gate
// ============================================================================

#[test]
fn unsupported_dialects_are_rejected() {
    let request = default_request();
    for name in ["sqlite", "mysql", "mssql", ""] {
        let err = request.compile(name, Version::new(99, 0, 0)).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::UnsupportedDialect {
                dialect: name.into()
            }
        );
    }
}

#[test]
fn versions_below_minimum_are_rejected() {
    let request = default_request();

    let err = request.compile("postgresql", Version::new(8, 3, 23)).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::DialectVersionTooLow {
            dialect: "postgresql".into(),
            required: Version::new(8, 4, 0),
            actual: Version::new(8, 3, 23),
        }
    );

    let err = request.compile("oracle", Version::new(9, 2, 0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "oracle 9.2.0 is too old for hierarchical queries (requires 10.0.0 or later)"
    );
}

#[test]
fn minimum_versions_are_admitted() {
    let request = default_request();
    assert!(request.compile("postgresql", Version::new(8, 4, 0)).is_ok());
    assert!(request.compile("POSTGRES", Version::new(8, 4, 0)).is_ok());
    assert!(request.compile("oracle", Version::new(10, 0, 0)).is_ok());
    assert!(request.compile("Oracle", "10.2".parse().unwrap()).is_ok());
}

#[test]
fn dialect_selects_idiom() {
    let request = default_request();

    let pg = compile(&request, "postgresql", Version::new(16, 0, 0)).unwrap();
    assert_eq!(pg.dialect, Dialect::Postgres);
    assert!(pg.sql.starts_with("WITH RECURSIVE "));
    assert!(!pg.sql.contains("CONNECT BY"));

    let ora = compile(&request, "oracle", Version::new(19, 0, 0)).unwrap();
    assert_eq!(ora.dialect, Dialect::Oracle);
    assert!(ora.sql.contains("\nCONNECT BY PRIOR "));
    assert!(!ora.sql.contains("RECURSIVE"));
}

// ============================================================================
// Structural guarantees
// ============================================================================

#[test]
fn root_predicate_follows_starting_node() {
    let table = dummy_hierarchy();
    let version = Version::new(16, 0, 0);

    let default = compile_for(&default_request(), Dialect::Postgres, version).unwrap();
    assert_eq!(default.params, vec!["0", "0"]);

    let explicit = HierarchyRequest::for_table(&table, HierarchyOptions::default().starting_node(8))
        .unwrap();
    let explicit = compile_for(&explicit, Dialect::Postgres, version).unwrap();
    assert_eq!(explicit.params, vec!["0", "8"]);

    let disabled = HierarchyRequest::for_table(
        &table,
        HierarchyOptions::default().disable_starting_node(),
    )
    .unwrap();
    let disabled = compile_for(&disabled, Dialect::Postgres, version).unwrap();
    assert!(disabled.params.is_empty());
    assert!(!disabled.sql.contains("COALESCE"));
    assert!(!disabled.sql.contains("$1"));
}

#[test]
fn level_and_path_accumulate_through_recursion() {
    let out = compile_for(&default_request(), Dialect::Postgres, Version::new(16, 0, 0)).unwrap();
    assert!(out.sql.contains("  1 AS \"level\",\n"));
    assert!(out.sql.contains("  \"rec\".\"level\" + 1,\n"));
    assert!(out
        .sql
        .contains("ARRAY_APPEND(\"rec\".\"connect_path\", \"dummy_hierarchy\".\"id\")"));
    assert!(out.sql.ends_with("\nORDER BY \"connect_path\""));
}

#[test]
fn filter_is_present_in_every_branch() {
    let table = dummy_hierarchy();
    let base = BaseQuery::new(&table)
        .columns(["id"])
        .filter(col("active").eq(true));
    let request = HierarchyRequest::new(&table, base, HierarchyOptions::default()).unwrap();

    let pg = compile_for(&request, Dialect::Postgres, Version::new(16, 0, 0)).unwrap();
    assert_eq!(pg.sql.matches("\"dummy_hierarchy\".\"active\" = true").count(), 2);

    let ora = compile_for(&request, Dialect::Oracle, Version::new(19, 0, 0)).unwrap();
    assert_eq!(ora.sql.matches("dummy_hierarchy.active = 1").count(), 3);
    assert!(ora.sql.contains("\nWHERE dummy_hierarchy.active = 1\n"));
    assert!(ora
        .sql
        .contains("\nSTART WITH dummy_hierarchy.parent_id IS NULL AND dummy_hierarchy.active = 1\n"));
}

#[test]
fn filter_excludes_roots_without_a_starting_node() {
    let table = dummy_hierarchy();
    let base = BaseQuery::new(&table).filter(col("active").eq(true));
    let request = HierarchyRequest::new(
        &table,
        base,
        HierarchyOptions::default().disable_starting_node(),
    )
    .unwrap();

    let ora = compile_for(&request, Dialect::Oracle, Version::new(19, 0, 0)).unwrap();
    assert!(ora.sql.contains("\nSTART WITH dummy_hierarchy.active = 1\n"));
    assert!(ora
        .sql
        .contains("CONNECT BY PRIOR dummy_hierarchy.id = dummy_hierarchy.parent_id AND dummy_hierarchy.active = 1\n"));

    let pg = compile_for(&request, Dialect::Postgres, Version::new(16, 0, 0)).unwrap();
    assert_eq!(pg.sql.matches("\"dummy_hierarchy\".\"active\" = true").count(), 2);
}

#[test]
fn compile_is_pure_and_repeatable() {
    let request = default_request();
    let before = request.clone();

    let first = request.compile("postgresql", Version::new(12, 0, 0)).unwrap();
    let _ = request.compile("oracle", Version::new(12, 0, 0)).unwrap();
    let second = request.compile("postgresql", Version::new(12, 0, 0)).unwrap();

    assert_eq!(request, before);
    assert_eq!(first, second);
    assert_eq!(
        request.base_query().projection(),
        &["id", "name", "parent_id", "active"]
    );
}

#[test]
fn requests_compile_across_threads() {
    let request = default_request();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let request = request.clone();
            std::thread::spawn(move || {
                compile_for(&request, Dialect::Oracle, Version::new(11, 0, 0)).unwrap()
            })
        })
        .collect();

    let expected = compile_for(&request, Dialect::Oracle, Version::new(11, 0, 0)).unwrap();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// ============================================================================
// Request validation
// ============================================================================

#[test]
fn unknown_columns_are_rejected() {
    let table = dummy_hierarchy();

    let base = BaseQuery::new(&table).columns(["id", "descrip"]);
    let err = HierarchyRequest::new(&table, base, HierarchyOptions::default()).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::UnknownColumn {
            table: "dummy_hierarchy".into(),
            column: "descrip".into()
        }
    );

    let base = BaseQuery::new(&table).columns(["name"]);
    let err = HierarchyRequest::new(&table, base, HierarchyOptions::default()).unwrap_err();
    assert!(matches!(err, HierarchyError::UnknownColumn { column, .. } if column == "id"));
}

#[test]
fn hostile_identifiers_are_quoted_not_interpolated() {
    let table = TableDescriptor::new("odd\"table")
        .column(ColumnDescriptor::new("id", DataType::Int32))
        .column(
            ColumnDescriptor::new("parent id", DataType::Int32).references("odd\"table", "id"),
        );
    let request = HierarchyRequest::for_table(&table, HierarchyOptions::default()).unwrap();

    let pg = compile_for(&request, Dialect::Postgres, Version::new(16, 0, 0)).unwrap();
    assert!(pg.sql.contains("FROM \"odd\"\"table\"\n"));
    assert!(pg.sql.contains("\"odd\"\"table\".\"parent id\""));

    let ora = compile_for(&request, Dialect::Oracle, Version::new(19, 0, 0)).unwrap();
    assert!(ora.sql.contains("START WITH \"odd\"\"table\".\"parent id\" IS NULL"));
}

#[test]
fn starting_node_values_are_bound_not_inlined() {
    let table = dummy_hierarchy();
    let request = HierarchyRequest::for_table(
        &table,
        HierarchyOptions::default().starting_node("1'; DROP TABLE x; --"),
    )
    .unwrap();

    for dialect in [Dialect::Postgres, Dialect::Oracle] {
        let out = compile_for(&request, dialect, Version::new(20, 0, 0)).unwrap();
        assert!(!out.sql.contains("DROP TABLE"), "{dialect}");
        assert!(out.params.iter().any(|p| p == "1'; DROP TABLE x; --"));
    }
}
