//! Relational schema model for modelgen.
//!
//! Plain data built fresh by the introspector on every run: tables, columns,
//! keys, and the parsed form of each column's native type and default.

mod default;
mod native_type;
mod table;

pub use default::{DbFunction, DefaultValue};
pub use native_type::{BaseType, NativeType, TypeParseError};
pub use table::{ColumnInfo, ColumnReference, ForeignKey, TableInfo};
