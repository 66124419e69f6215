use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for modelgen operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Type-erased driver error carried as the source of connection and catalog failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of every [`Error`] variant.
///
/// Callers that only need to decide how to report a failure can match on the
/// kind instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreachable database, rejected credentials, timeouts.
    Connection,
    /// Missing tables, unreadable or inconsistent catalog data, name collisions.
    Schema,
    /// A native column type with no field mapping.
    UnsupportedType,
    /// Unknown dialect token or a broken configuration file.
    Config,
    /// The output location could not be written.
    FileWrite,
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to connect to {target}: {source}")]
    #[diagnostic(
        code(modelgen::connection),
        help("check that the server is reachable and the credentials in the URL are correct")
    )]
    Connection {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("{operation} timed out after {seconds}s")]
    #[diagnostic(code(modelgen::timeout))]
    Timeout { operation: String, seconds: u64 },

    #[error("introspector is not connected")]
    #[diagnostic(code(modelgen::not_connected))]
    NotConnected,

    #[error("introspector is already connected to {target}")]
    #[diagnostic(
        code(modelgen::already_connected),
        help("create a new introspector for each run")
    )]
    AlreadyConnected { target: String },

    #[error("table(s) not found in database: {}", tables.join(", "))]
    #[diagnostic(
        code(modelgen::missing_table),
        help("check the spelling of --tables; names are case-sensitive")
    )]
    MissingTables { tables: Vec<String> },

    #[error("failed to read catalog metadata for {context}: {source}")]
    #[diagnostic(code(modelgen::catalog))]
    Catalog {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid catalog data for table '{table}': {reason}")]
    #[diagnostic(code(modelgen::invalid_schema))]
    InvalidSchema { table: String, reason: String },

    #[error("{what} '{name}' is produced by both '{first}' and '{second}'")]
    #[diagnostic(
        code(modelgen::name_collision),
        help("generate the colliding tables in separate runs with --tables")
    )]
    NameCollision {
        what: &'static str,
        name: String,
        first: String,
        second: String,
    },

    #[error("unsupported column type '{native_type}' for {table}.{column}")]
    #[diagnostic(
        code(modelgen::unsupported_type),
        help("exclude the table with --tables or change the column type")
    )]
    UnsupportedType {
        table: String,
        column: String,
        native_type: String,
    },

    #[error("unknown dialect '{name}'")]
    #[diagnostic(code(modelgen::unknown_dialect), help("known dialects: {known}"))]
    UnknownDialect { name: String, known: String },

    #[error("failed to read '{path}'")]
    #[diagnostic(code(modelgen::config_io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}'")]
    #[diagnostic(code(modelgen::config_parse))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write '{path}'")]
    #[diagnostic(
        code(modelgen::file_write),
        help("make sure the output directory is writable")
    )]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection { .. }
            | Error::Timeout { .. }
            | Error::NotConnected
            | Error::AlreadyConnected { .. } => ErrorKind::Connection,
            Error::MissingTables { .. }
            | Error::Catalog { .. }
            | Error::InvalidSchema { .. }
            | Error::NameCollision { .. } => ErrorKind::Schema,
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::UnknownDialect { .. } | Error::ConfigIo { .. } | Error::ConfigParse { .. } => {
                ErrorKind::Config
            }
            Error::FileWrite { .. } => ErrorKind::FileWrite,
        }
    }

    /// Create a connection error
    pub fn connection(target: impl Into<String>, source: impl Into<BoxError>) -> Box<Self> {
        Box::new(Error::Connection {
            target: target.into(),
            source: source.into(),
        })
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, seconds: u64) -> Box<Self> {
        Box::new(Error::Timeout {
            operation: operation.into(),
            seconds,
        })
    }

    /// Create a catalog query error
    pub fn catalog(context: impl Into<String>, source: impl Into<BoxError>) -> Box<Self> {
        Box::new(Error::Catalog {
            context: context.into(),
            source: source.into(),
        })
    }

    /// Create an invalid schema error
    pub fn invalid_schema(table: impl Into<String>, reason: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidSchema {
            table: table.into(),
            reason: reason.into(),
        })
    }

    /// Create an unsupported type error
    pub fn unsupported_type(
        table: impl Into<String>,
        column: impl Into<String>,
        native_type: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::UnsupportedType {
            table: table.into(),
            column: column.into(),
            native_type: native_type.into(),
        })
    }

    /// Create an unknown dialect error
    pub fn unknown_dialect<'a>(
        name: impl Into<String>,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Box<Self> {
        Box::new(Error::UnknownDialect {
            name: name.into(),
            known: known.into_iter().collect::<Vec<_>>().join(", "),
        })
    }

    /// Create a file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::FileWrite {
            path: path.into(),
            source,
        })
    }
}
