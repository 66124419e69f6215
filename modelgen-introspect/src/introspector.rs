use std::collections::BTreeSet;

use modelgen_core::{Error, Result, url_target};
use modelgen_schema::TableInfo;

use crate::assemble::assemble_table;
use crate::catalog::{Catalog, IntrospectOptions};
use crate::mysql::MySqlCatalog;

/// Reads the schema model out of a live database.
///
/// One instance serves one run: it connects once, answers table queries and
/// releases its connection on [`disconnect`](SchemaIntrospector::disconnect).
pub trait SchemaIntrospector {
    /// Open the connection. Calling it twice on one instance is an error.
    fn connect(&mut self, connection_string: &str) -> Result<()>;

    /// All base tables, or only those in `filter`, ordered by name.
    ///
    /// Every name in `filter` must exist; the error lists all missing ones.
    fn get_tables(&mut self, filter: Option<&BTreeSet<String>>) -> Result<Vec<TableInfo>>;

    /// Release the connection. Idempotent, never fails.
    fn disconnect(&mut self);
}

impl<I: SchemaIntrospector + ?Sized> SchemaIntrospector for &mut I {
    fn connect(&mut self, connection_string: &str) -> Result<()> {
        (**self).connect(connection_string)
    }

    fn get_tables(&mut self, filter: Option<&BTreeSet<String>>) -> Result<Vec<TableInfo>> {
        (**self).get_tables(filter)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}

impl<I: SchemaIntrospector + ?Sized> SchemaIntrospector for Box<I> {
    fn connect(&mut self, connection_string: &str) -> Result<()> {
        (**self).connect(connection_string)
    }

    fn get_tables(&mut self, filter: Option<&BTreeSet<String>>) -> Result<Vec<TableInfo>> {
        (**self).get_tables(filter)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}

/// [`SchemaIntrospector`] over any [`Catalog`] backend.
#[derive(Debug)]
pub struct Introspector<C> {
    catalog: C,
    options: IntrospectOptions,
    /// Credential-free target of the open connection.
    connected_to: Option<String>,
}

impl Introspector<MySqlCatalog> {
    /// Introspector reading a MySQL catalog.
    pub fn mysql(options: IntrospectOptions) -> Self {
        Self::new(MySqlCatalog::new(), options)
    }
}

impl<C: Catalog> Introspector<C> {
    pub fn new(catalog: C, options: IntrospectOptions) -> Self {
        Self {
            catalog,
            options,
            connected_to: None,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn is_connected(&self) -> bool {
        self.connected_to.is_some()
    }

    fn read_table(&mut self, table: &crate::catalog::RawTable) -> Result<TableInfo> {
        log::debug!("reading catalog metadata for table '{}'", table.name);
        let columns = self.catalog.columns(&table.name)?;
        let constraints = self.catalog.constraints(&table.name)?;
        let indexes = self.catalog.indexes(&table.name)?;
        assemble_table(table, columns, constraints, indexes)
    }
}

impl<C: Catalog> SchemaIntrospector for Introspector<C> {
    fn connect(&mut self, connection_string: &str) -> Result<()> {
        if let Some(target) = &self.connected_to {
            return Err(Box::new(Error::AlreadyConnected {
                target: target.clone(),
            }));
        }

        let target = url_target(connection_string).to_string();
        log::debug!("connecting to {}", target);
        self.catalog.open(connection_string, &self.options)?;
        self.connected_to = Some(target);
        Ok(())
    }

    fn get_tables(&mut self, filter: Option<&BTreeSet<String>>) -> Result<Vec<TableInfo>> {
        if self.connected_to.is_none() {
            return Err(Box::new(Error::NotConnected));
        }

        let mut tables = self.catalog.tables()?;
        if let Some(filter) = filter {
            let existing: BTreeSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
            let missing: Vec<String> = filter
                .iter()
                .filter(|name| !existing.contains(name.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Box::new(Error::MissingTables { tables: missing }));
            }
            tables.retain(|t| filter.contains(&t.name));
        }
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!("found {} table(s)", tables.len());

        tables.iter().map(|table| self.read_table(table)).collect()
    }

    fn disconnect(&mut self) {
        if let Some(target) = self.connected_to.take() {
            log::debug!("disconnecting from {}", target);
            self.catalog.close();
        }
    }
}
