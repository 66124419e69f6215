//! MySQL catalog access through `information_schema`.
//!
//! Text columns are cast to `CHAR` and numeric ones to `SIGNED` so the driver
//! decodes them the same way on MySQL 5.7, 8.x and MariaDB, where the raw
//! `information_schema` column types differ.
//!
//! MariaDB 10.2.7 and later quote literal defaults and leave expressions
//! unquoted without a `DEFAULT_GENERATED` flag; [`mariadb_extra`] adds the
//! flag back so both servers classify defaults the same way.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use modelgen_core::{Error, Result, url_target};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, MySql, Row};
use tokio::runtime::{Builder, Runtime};

use crate::catalog::{
    Catalog, ConstraintKind, IntrospectOptions, RawColumn, RawConstraint, RawIndex, RawTable,
};

const TABLES_SQL: &str = r#"
    SELECT
        CAST(TABLE_NAME AS CHAR) AS table_name,
        CAST(TABLE_COMMENT AS CHAR) AS table_comment
    FROM information_schema.TABLES
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE'
    ORDER BY TABLE_NAME
"#;

const COLUMNS_SQL: &str = r#"
    SELECT
        CAST(COLUMN_NAME AS CHAR) AS column_name,
        CAST(COLUMN_TYPE AS CHAR) AS column_type,
        CAST(IS_NULLABLE AS CHAR) AS is_nullable,
        CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
        CAST(EXTRA AS CHAR) AS extra,
        CAST(COLUMN_COMMENT AS CHAR) AS column_comment
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

const CONSTRAINTS_SQL: &str = r#"
    SELECT
        CAST(k.CONSTRAINT_NAME AS CHAR) AS constraint_name,
        CAST(c.CONSTRAINT_TYPE AS CHAR) AS constraint_type,
        CAST(k.COLUMN_NAME AS CHAR) AS column_name,
        CAST(k.ORDINAL_POSITION AS SIGNED) AS position,
        CAST(k.REFERENCED_TABLE_NAME AS CHAR) AS referenced_table,
        CAST(k.REFERENCED_COLUMN_NAME AS CHAR) AS referenced_column
    FROM information_schema.KEY_COLUMN_USAGE k
    JOIN information_schema.TABLE_CONSTRAINTS c
        ON c.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
        AND c.TABLE_NAME = k.TABLE_NAME
        AND c.CONSTRAINT_NAME = k.CONSTRAINT_NAME
        AND (c.CONSTRAINT_TYPE = 'FOREIGN KEY') = (k.REFERENCED_TABLE_NAME IS NOT NULL)
    WHERE k.TABLE_SCHEMA = DATABASE() AND k.TABLE_NAME = ?
    ORDER BY k.CONSTRAINT_NAME, k.ORDINAL_POSITION
"#;

const INDEXES_SQL: &str = r#"
    SELECT
        CAST(INDEX_NAME AS CHAR) AS index_name,
        CAST(COLUMN_NAME AS CHAR) AS column_name,
        CAST(SEQ_IN_INDEX AS SIGNED) AS position,
        CAST(NON_UNIQUE AS SIGNED) AS non_unique
    FROM information_schema.STATISTICS
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        AND INDEX_NAME <> 'PRIMARY' AND COLUMN_NAME IS NOT NULL
    ORDER BY INDEX_NAME, SEQ_IN_INDEX
"#;

/// [`Catalog`] reading a MySQL (or MariaDB) server over a single connection.
///
/// sqlx is asynchronous; every call, closing included, is driven to
/// completion on a private current-thread runtime and bounded by the
/// configured timeout.
#[derive(Default)]
pub struct MySqlCatalog {
    runtime: Option<Runtime>,
    conn: Option<MySqlConnection>,
    target: String,
    query_timeout: Duration,
    /// MariaDB with quoted literal defaults.
    quoted_defaults: bool,
}

impl fmt::Debug for MySqlCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlCatalog")
            .field("connected", &self.conn.is_some())
            .field("target", &self.target)
            .field("query_timeout", &self.query_timeout)
            .field("quoted_defaults", &self.quoted_defaults)
            .finish()
    }
}

impl MySqlCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn fetch(
        &mut self,
        context: &str,
        sql: &'static str,
        table: Option<&str>,
    ) -> Result<Vec<MySqlRow>> {
        let limit = self.query_timeout;
        let (Some(runtime), Some(conn)) = (&self.runtime, &mut self.conn) else {
            return Err(Box::new(Error::NotConnected));
        };

        log::debug!("querying {}", context);
        let mut query = sqlx::query::<MySql>(sql);
        if let Some(table) = table {
            query = query.bind(table);
        }
        match block_on_timeout(runtime, limit, query.fetch_all(conn)) {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(e)) => Err(Error::catalog(context, e)),
            None => Err(Error::timeout(format!("query for {}", context), limit.as_secs())),
        }
    }
}

fn block_on_timeout<F: Future>(runtime: &Runtime, limit: Duration, future: F) -> Option<F::Output> {
    runtime
        .block_on(async { tokio::time::timeout(limit, future).await })
        .ok()
}

/// Wait at most `limit` for a connection to close; the socket is dropped
/// either way. Returns whether the server acknowledged the close.
fn close_within<F>(runtime: &Runtime, limit: Duration, target: &str, close: F) -> bool
where
    F: Future<Output = sqlx::Result<()>>,
{
    match block_on_timeout(runtime, limit, close) {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            log::warn!("failed to close connection to {}: {}", target, e);
            false
        }
        None => {
            log::warn!(
                "closing connection to {} timed out after {}s",
                target,
                limit.as_secs()
            );
            false
        }
    }
}

/// Whether a `VERSION()` string belongs to a MariaDB server that quotes
/// literal column defaults (10.2.7 and later).
fn quotes_defaults(version: &str) -> bool {
    if !version.to_ascii_lowercase().contains("mariadb") {
        return false;
    }
    // replication handshake prefix
    let version = version.strip_prefix("5.5.5-").unwrap_or(version);
    let mut parts = version
        .split(|c: char| !c.is_ascii_digit())
        .take(3)
        .map(|part| part.parse::<u32>().unwrap_or(0));
    let release = (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    );
    release >= (10, 2, 7)
}

/// Add the `DEFAULT_GENERATED` flag MySQL 8 would report for an unquoted
/// MariaDB default that is neither `NULL`, a number nor a bit/hex literal.
fn mariadb_extra(default: Option<&str>, extra: String) -> String {
    let Some(default) = default.map(str::trim) else {
        return extra;
    };
    let lower = default.to_ascii_lowercase();
    let literal = default.is_empty()
        || default.starts_with('\'')
        || lower == "null"
        || lower.starts_with("b'")
        || lower.starts_with("x'")
        || default.parse::<f64>().is_ok();
    if literal || extra.to_ascii_lowercase().contains("default_generated") {
        return extra;
    }
    if extra.is_empty() {
        "DEFAULT_GENERATED".to_string()
    } else {
        format!("DEFAULT_GENERATED {}", extra)
    }
}

fn get<'r, T>(row: &'r MySqlRow, column: &str, context: &str) -> Result<T>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(column).map_err(|e| Error::catalog(context, e))
}

impl Catalog for MySqlCatalog {
    fn open(&mut self, url: &str, options: &IntrospectOptions) -> Result<()> {
        let target = url_target(url).to_string();
        let connect_options =
            MySqlConnectOptions::from_str(url).map_err(|e| Error::connection(&target, e))?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::connection(&target, e))?;

        let mut conn =
            match block_on_timeout(&runtime, options.connect_timeout, connect_options.connect()) {
                Some(Ok(conn)) => conn,
                Some(Err(e)) => return Err(Error::connection(&target, e)),
                None => {
                    return Err(Error::timeout(
                        format!("connecting to {}", target),
                        options.connect_timeout.as_secs(),
                    ));
                }
            };

        let server = block_on_timeout(
            &runtime,
            options.query_timeout,
            sqlx::query_as::<MySql, (Option<String>, String)>(
                "SELECT CAST(DATABASE() AS CHAR), CAST(VERSION() AS CHAR)",
            )
            .fetch_one(&mut conn),
        );
        let mut version = String::new();
        let failure = match server {
            Some(Ok((Some(name), server_version))) => {
                log::debug!("connected to schema '{}' on {}", name, server_version);
                version = server_version;
                None
            }
            Some(Ok((None, _))) => Some(Error::connection(
                &target,
                "no database selected; add the schema name to the URL path",
            )),
            Some(Err(e)) => Some(Error::connection(&target, e)),
            None => Some(Error::timeout(
                format!("connecting to {}", target),
                options.query_timeout.as_secs(),
            )),
        };
        if let Some(err) = failure {
            close_within(&runtime, options.query_timeout, &target, conn.close());
            return Err(err);
        }

        self.runtime = Some(runtime);
        self.conn = Some(conn);
        self.target = target;
        self.query_timeout = options.query_timeout;
        self.quoted_defaults = quotes_defaults(&version);
        Ok(())
    }

    fn tables(&mut self) -> Result<Vec<RawTable>> {
        let context = "table list";
        self.fetch(context, TABLES_SQL, None)?
            .iter()
            .map(|row| {
                Ok(RawTable {
                    name: get(row, "table_name", context)?,
                    comment: get(row, "table_comment", context)?,
                })
            })
            .collect()
    }

    fn columns(&mut self, table: &str) -> Result<Vec<RawColumn>> {
        let context = format!("columns of table '{}'", table);
        let quoted_defaults = self.quoted_defaults;
        self.fetch(&context, COLUMNS_SQL, Some(table))?
            .iter()
            .map(|row| {
                let nullable: String = get(row, "is_nullable", &context)?;
                let default: Option<String> = get(row, "column_default", &context)?;
                let mut extra = get::<Option<String>>(row, "extra", &context)?.unwrap_or_default();
                if quoted_defaults {
                    extra = mariadb_extra(default.as_deref(), extra);
                }
                Ok(RawColumn {
                    name: get(row, "column_name", &context)?,
                    column_type: get(row, "column_type", &context)?,
                    nullable: nullable.eq_ignore_ascii_case("YES"),
                    default,
                    extra,
                    comment: get(row, "column_comment", &context)?,
                })
            })
            .collect()
    }

    fn constraints(&mut self, table: &str) -> Result<Vec<RawConstraint>> {
        let context = format!("constraints of table '{}'", table);
        let mut constraints = Vec::new();
        for row in self.fetch(&context, CONSTRAINTS_SQL, Some(table))? {
            let kind: String = get(&row, "constraint_type", &context)?;
            // CHECK constraints carry no key columns
            let Some(kind) = ConstraintKind::from_catalog(&kind) else {
                continue;
            };
            constraints.push(RawConstraint {
                name: get(&row, "constraint_name", &context)?,
                kind,
                column: get(&row, "column_name", &context)?,
                position: get(&row, "position", &context)?,
                referenced_table: get(&row, "referenced_table", &context)?,
                referenced_column: get(&row, "referenced_column", &context)?,
            });
        }
        Ok(constraints)
    }

    fn indexes(&mut self, table: &str) -> Result<Vec<RawIndex>> {
        let context = format!("indexes of table '{}'", table);
        self.fetch(&context, INDEXES_SQL, Some(table))?
            .iter()
            .map(|row| {
                let non_unique: i64 = get(row, "non_unique", &context)?;
                Ok(RawIndex {
                    name: get(row, "index_name", &context)?,
                    column: get(row, "column_name", &context)?,
                    position: get(row, "position", &context)?,
                    unique: non_unique == 0,
                })
            })
            .collect()
    }

    fn close(&mut self) {
        if let (Some(runtime), Some(conn)) = (&self.runtime, self.conn.take()) {
            if close_within(runtime, self.query_timeout, &self.target, conn.close()) {
                log::debug!("closed connection to {}", self.target);
            }
        }
        self.runtime = None;
    }
}
