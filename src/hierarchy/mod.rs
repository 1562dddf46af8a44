//! Hierarchical query compiler.
//!
//! Turns a flat query over an adjacency-list table (one with a foreign key
//! pointing back at itself) into a query returning every row reachable from
//! a starting node, with its depth, its path from the root and whether it is
//! a leaf.
//!
//! # Pipeline
//!
//! ```text
//! TableDescriptor ──┐
//! BaseQuery ────────┼─► HierarchyRequest::new ─► compile(dialect, version)
//! HierarchyOptions ─┘     (FK + key type)          │
//!                                                  ├─ capability gate
//!                                                  └─ HierarchyEmitter::emit ─► HierarchySql
//! ```
//!
//! # Example
//!
//! ```ignore
//! use arbor::hierarchy::{HierarchyOptions, HierarchyRequest, Version};
//!
//! let request = HierarchyRequest::for_table(&table, HierarchyOptions::default())?;
//! let out = request.compile("postgresql", Version::new(16, 2, 0))?;
//! println!("{}", out.sql);
//! ```

pub mod capability;
pub mod compile;
pub mod emit;
pub mod error;
pub mod request;

pub use capability::{check_dialect, Capability, Version, VersionParseError, CAPABILITIES};
pub use compile::{compile, compile_for};
pub use emit::{
    ColumnKind, ConnectByEmitter, HierarchyEmitter, HierarchySql, RecursiveCteEmitter,
    SyntheticColumn,
};
pub use error::{HierarchyError, HierarchyResult};
pub use request::{
    resolve_self_reference, BaseQuery, HierarchyOptions, HierarchyRequest, KeyType, SelfReference,
    StartingNode,
};
