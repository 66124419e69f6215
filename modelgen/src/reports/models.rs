//! Models command report data structures.

use std::path::PathBuf;

use modelgen_codegen::GenerationManifest;

use super::output::{Output, Report};

/// Where the dialect of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectSource {
    Flag,
    Config,
    /// Found in `requirements.txt`.
    Detected,
    /// Nothing to go on.
    Default,
}

/// What a run is about to do, printed before connecting.
#[derive(Debug)]
pub struct PlanReport {
    /// Database target with the password masked.
    pub database: String,
    pub dialect: String,
    pub source: DialectSource,
    /// Table allow-list; empty means every table.
    pub tables: Vec<String>,
    pub output: PathBuf,
}

impl Report for PlanReport {
    fn render(&self, out: &mut dyn Output) {
        match self.source {
            DialectSource::Detected => {
                out.preformatted(&format!("Detected ORM: {}", self.dialect));
                out.newline();
            }
            DialectSource::Default => {
                out.warning(&format!("could not detect ORM, using default: {}", self.dialect));
            }
            DialectSource::Flag | DialectSource::Config => {}
        }

        out.title("Generating models from database");
        out.key_value("Database", &self.database);
        out.key_value("ORM", &self.dialect);
        let tables = if self.tables.is_empty() {
            "all".to_string()
        } else {
            self.tables.join(", ")
        };
        out.key_value("Tables", &tables);
        out.key_value("Output", &self.output.display().to_string());
    }
}

/// The tables a finished run found and the files it wrote.
#[derive(Debug)]
pub struct GeneratedReport {
    pub manifest: GenerationManifest,
}

impl Report for GeneratedReport {
    fn render(&self, out: &mut dyn Output) {
        out.newline();
        if self.manifest.is_empty() {
            out.preformatted("No tables found.");
            return;
        }

        out.section(&format!("Found {} table(s)", self.manifest.len()));
        for entry in &self.manifest {
            out.list_item(&format!("{} ({} columns)", entry.table, entry.columns));
        }

        out.newline();
        out.section(&format!("Models generated ({})", self.manifest.len()));
        for entry in &self.manifest {
            out.added_item(&format!("{} ({})", entry.path.display(), entry.table));
        }
    }
}
