//! Core utilities and types for the modelgen ORM model generator.
//!
//! This crate provides the error taxonomy, configuration file, buffered file
//! writing and naming helpers shared by every other modelgen crate.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;
mod utils;

pub use config::{CONFIG_FILE, Config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_QUERY_TIMEOUT};
pub use error::{BoxError, Error, ErrorKind, Result};
pub use file::{File, ensure_dir};
// String utilities
pub use utils::{is_identifier, redact_url, sanitize_identifier, to_pascal_case, url_target};
