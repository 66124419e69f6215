//! Low-level catalog access.
//!
//! A [`Catalog`] returns raw metadata rows exactly as the database reports
//! them. Turning those rows into [`TableInfo`](modelgen_schema::TableInfo)s is
//! the introspector's job, so every backend shares the same parsing and
//! validation.

use std::time::Duration;

use modelgen_core::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_QUERY_TIMEOUT, Result};

/// Timeouts for every network round-trip of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrospectOptions {
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// A base table of the connected schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub comment: Option<String>,
}

/// One row of the column listing, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    /// Full type declaration, e.g. `int(10) unsigned` or `enum('a','b')`.
    pub column_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    /// Flags such as `auto_increment` or `on update CURRENT_TIMESTAMP`.
    pub extra: String,
    pub comment: Option<String>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: false,
            default: None,
            extra: String::new(),
            comment: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
}

impl ConstraintKind {
    /// Parse `TABLE_CONSTRAINTS.CONSTRAINT_TYPE`. `CHECK` constraints return `None`.
    pub fn from_catalog(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "PRIMARY KEY" => Some(Self::PrimaryKey),
            "UNIQUE" => Some(Self::Unique),
            "FOREIGN KEY" => Some(Self::ForeignKey),
            _ => None,
        }
    }
}

/// One column of a key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawConstraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub column: String,
    /// 1-based position of `column` within the constraint.
    pub position: i64,
    pub referenced_table: Option<String>,
    pub referenced_column: Option<String>,
}

/// One column of an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIndex {
    pub name: String,
    pub column: String,
    pub position: i64,
    pub unique: bool,
}

/// Source of raw catalog metadata.
pub trait Catalog {
    /// Open the single connection used for the whole run.
    fn open(&mut self, url: &str, options: &IntrospectOptions) -> Result<()>;

    /// All base tables of the connected schema.
    fn tables(&mut self) -> Result<Vec<RawTable>>;

    /// Columns of `table` in ordinal order.
    fn columns(&mut self, table: &str) -> Result<Vec<RawColumn>>;

    /// Primary-key, unique and foreign-key constraint columns of `table`.
    fn constraints(&mut self, table: &str) -> Result<Vec<RawConstraint>>;

    /// Index columns of `table`.
    fn indexes(&mut self, table: &str) -> Result<Vec<RawIndex>>;

    /// Release the connection. Must be idempotent and must not fail.
    fn close(&mut self);
}
