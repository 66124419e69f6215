//! In-memory [`Catalog`] for tests.

use modelgen_core::{Error, Result, url_target};

use crate::catalog::{
    Catalog, ConstraintKind, IntrospectOptions, RawColumn, RawConstraint, RawIndex, RawTable,
};

/// One table of a [`MemoryCatalog`], built column by column.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    table: RawTable,
    columns: Vec<RawColumn>,
    constraints: Vec<RawConstraint>,
    indexes: Vec<RawIndex>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: RawTable {
                name: name.into(),
                comment: None,
            },
            columns: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.table.comment = Some(comment.into());
        self
    }

    pub fn column(mut self, column: RawColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<const N: usize>(self, columns: [&str; N]) -> Self {
        self.key("PRIMARY", ConstraintKind::PrimaryKey, &columns, None)
    }

    pub fn unique<const N: usize>(self, name: &str, columns: [&str; N]) -> Self {
        self.key(name, ConstraintKind::Unique, &columns, None)
    }

    pub fn foreign_key<const N: usize>(
        self,
        name: &str,
        columns: [&str; N],
        target_table: &str,
        target_columns: [&str; N],
    ) -> Self {
        self.key(
            name,
            ConstraintKind::ForeignKey,
            &columns,
            Some((target_table, &target_columns)),
        )
    }

    pub fn index<const N: usize>(mut self, name: &str, columns: [&str; N]) -> Self {
        for (i, column) in columns.iter().enumerate() {
            self.indexes.push(RawIndex {
                name: name.to_string(),
                column: column.to_string(),
                position: i as i64 + 1,
                unique: false,
            });
        }
        self
    }

    fn key(
        mut self,
        name: &str,
        kind: ConstraintKind,
        columns: &[&str],
        target: Option<(&str, &[&str])>,
    ) -> Self {
        for (i, column) in columns.iter().enumerate() {
            self.constraints.push(RawConstraint {
                name: name.to_string(),
                kind,
                column: column.to_string(),
                position: i as i64 + 1,
                referenced_table: target.map(|(table, _)| table.to_string()),
                referenced_column: target.map(|(_, cols)| cols[i].to_string()),
            });
        }
        self
    }
}

/// Catalog answering from a fixed set of tables, with switchable failures and
/// observable connection state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: Vec<MemoryTable>,
    open: bool,
    open_count: usize,
    close_count: usize,
    refuse: bool,
    fail_table: Option<String>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. Tables are listed in insertion order.
    pub fn table(mut self, table: MemoryTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Make every `open` fail with a connection error.
    pub fn refuse_connections(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Make metadata queries for `table` fail.
    pub fn fail_on_table(mut self, table: impl Into<String>) -> Self {
        self.fail_table = Some(table.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open_count(&self) -> usize {
        self.open_count
    }

    pub fn close_count(&self) -> usize {
        self.close_count
    }

    fn find(&self, table: &str) -> Result<&MemoryTable> {
        if self.fail_table.as_deref() == Some(table) {
            return Err(Error::catalog(
                format!("table '{}'", table),
                "simulated catalog failure",
            ));
        }
        self.tables
            .iter()
            .find(|t| t.table.name == table)
            .ok_or_else(|| Box::new(Error::MissingTables {
                tables: vec![table.to_string()],
            }))
    }
}

impl Catalog for MemoryCatalog {
    fn open(&mut self, url: &str, _options: &IntrospectOptions) -> Result<()> {
        if self.refuse {
            return Err(Error::connection(url_target(url), "connection refused"));
        }
        self.open = true;
        self.open_count += 1;
        Ok(())
    }

    fn tables(&mut self) -> Result<Vec<RawTable>> {
        Ok(self.tables.iter().map(|t| t.table.clone()).collect())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<RawColumn>> {
        Ok(self.find(table)?.columns.clone())
    }

    fn constraints(&mut self, table: &str) -> Result<Vec<RawConstraint>> {
        Ok(self.find(table)?.constraints.clone())
    }

    fn indexes(&mut self, table: &str) -> Result<Vec<RawIndex>> {
        Ok(self.find(table)?.indexes.clone())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.close_count += 1;
        }
    }
}
