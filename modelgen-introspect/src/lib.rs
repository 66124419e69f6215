//! Schema introspection for modelgen.
//!
//! [`Introspector`] turns the raw rows of a [`Catalog`] into validated
//! [`TableInfo`](modelgen_schema::TableInfo)s. [`MySqlCatalog`] reads a live
//! MySQL server; with the `testing` feature, `MemoryCatalog` serves fixed
//! tables without a database.

mod assemble;
mod catalog;
mod introspector;
#[cfg(any(test, feature = "testing"))]
mod memory;
mod mysql;

pub use catalog::{
    Catalog, ConstraintKind, IntrospectOptions, RawColumn, RawConstraint, RawIndex, RawTable,
};
pub use introspector::{Introspector, SchemaIntrospector};
#[cfg(any(test, feature = "testing"))]
pub use memory::{MemoryCatalog, MemoryTable};
pub use mysql::MySqlCatalog;
