//! End-to-end generation: introspect, map, emit, write.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use modelgen_core::{Error, File, Result, ensure_dir};
use modelgen_introspect::SchemaIntrospector;
use modelgen_schema::TableInfo;

use crate::{Dialect, DialectRegistry, ModelEmitter};

/// One written model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub table: String,
    /// Number of columns the table was introspected with.
    pub columns: usize,
    pub path: PathBuf,
}

/// The files written by one run, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationManifest {
    entries: Vec<ManifestEntry>,
}

impl GenerationManifest {
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ManifestEntry> for GenerationManifest {
    fn from_iter<T: IntoIterator<Item = ManifestEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GenerationManifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Disconnects the introspector when dropped, on every exit path.
struct Connection<'a, I: SchemaIntrospector> {
    introspector: &'a mut I,
}

impl<'a, I: SchemaIntrospector> Connection<'a, I> {
    fn open(introspector: &'a mut I, connection_string: &str) -> Result<Self> {
        let mut conn = Self { introspector };
        conn.introspector.connect(connection_string)?;
        Ok(conn)
    }
}

impl<I: SchemaIntrospector> Drop for Connection<'_, I> {
    fn drop(&mut self) {
        self.introspector.disconnect();
    }
}

/// The single entry point for a generation run.
///
/// # Example
///
/// ```ignore
/// let registry = DialectRegistry::new().with(&TORTOISE);
/// let mut coordinator = GenerationCoordinator::new(registry, Introspector::mysql(options));
/// let manifest = coordinator.generate(url, "tortoise", None, Path::new("models"))?;
/// ```
#[derive(Debug)]
pub struct GenerationCoordinator<I> {
    registry: DialectRegistry,
    introspector: I,
}

impl<I: SchemaIntrospector> GenerationCoordinator<I> {
    pub fn new(registry: DialectRegistry, introspector: I) -> Self {
        Self {
            registry,
            introspector,
        }
    }

    pub fn introspector(&self) -> &I {
        &self.introspector
    }

    /// Generate one model file per table into `output_dir`.
    ///
    /// Nothing is written unless every table renders; the connection is
    /// released before this returns, whatever the outcome.
    pub fn generate(
        &mut self,
        connection_string: &str,
        dialect_name: &str,
        filter: Option<&BTreeSet<String>>,
        output_dir: &Path,
    ) -> Result<GenerationManifest> {
        let dialect = self.registry.get(dialect_name)?;

        let (tables, context) = {
            let mut conn = Connection::open(&mut self.introspector, connection_string)?;
            let tables = conn.introspector.get_tables(filter)?;
            let context = referenced_outside(conn.introspector, &tables);
            (tables, context)
        };
        if tables.is_empty() {
            log::info!("no tables to generate");
            return Ok(GenerationManifest::default());
        }

        check_names(dialect, &tables)?;

        let emitter = ModelEmitter::new(dialect, &tables).with_context(&context);
        let files = tables
            .iter()
            .map(|table| {
                let path = output_dir.join(dialect.naming().file_name(&table.name));
                Ok((table, File::new(path, emitter.render(table)?)))
            })
            .collect::<Result<Vec<_>>>()?;

        ensure_dir(output_dir)?;
        let mut manifest = GenerationManifest::default();
        for (table, file) in files {
            file.write()?;
            log::info!(
                "wrote {} model for '{}' to {}",
                dialect.name(),
                table.name,
                file.path().display()
            );
            manifest.entries.push(ManifestEntry {
                table: table.name.clone(),
                columns: table.columns.len(),
                path: file.path().to_path_buf(),
            });
        }
        Ok(manifest)
    }
}

/// Read the tables the run references but does not generate.
///
/// These only sharpen relation naming, so a failure is logged rather than
/// aborting the run.
fn referenced_outside<I: SchemaIntrospector>(
    introspector: &mut I,
    tables: &[TableInfo],
) -> Vec<TableInfo> {
    let in_run: BTreeSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    let targets: BTreeSet<String> = tables
        .iter()
        .flat_map(|t| t.foreign_keys.iter())
        .map(|fk| fk.target_table.as_str())
        .filter(|target| !in_run.contains(target))
        .map(str::to_string)
        .collect();
    if targets.is_empty() {
        return Vec::new();
    }

    log::debug!("reading {} referenced table(s) outside the run", targets.len());
    match introspector.get_tables(Some(&targets)) {
        Ok(context) => context,
        Err(e) => {
            log::warn!("could not read referenced tables: {}", e);
            Vec::new()
        }
    }
}

/// Fail when two tables would share a file (case-insensitively) or a class.
fn check_names(dialect: &dyn Dialect, tables: &[TableInfo]) -> Result<()> {
    let naming = dialect.naming();
    let mut files: HashMap<String, &str> = HashMap::new();
    let mut classes: HashMap<String, &str> = HashMap::new();

    for table in tables {
        let checks = [
            ("file name", naming.file_name(&table.name).to_lowercase(), &mut files),
            ("class name", naming.class_name(&table.name), &mut classes),
        ];
        for (what, name, seen) in checks {
            if let Some(first) = seen.insert(name.clone(), &table.name) {
                return Err(Box::new(Error::NameCollision {
                    what,
                    name,
                    first: first.to_string(),
                    second: table.name.clone(),
                }));
            }
        }
    }
    Ok(())
}
