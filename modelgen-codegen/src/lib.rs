//! Shared Python model generation for modelgen.
//!
//! This crate turns introspected tables into ORM model files. Dialect crates
//! (e.g., `modelgen-codegen-tortoise`) only supply a [`Dialect`]: its type
//! table, naming convention and renderer.
//!
//! # Module Organization
//!
//! - [`builder`] - Indentation-aware text building ([`CodeBuilder`])
//! - [`mapper`] - Column to field mapping ([`TypeMapper`])
//! - [`emitter`] - Per-table planning and rendering ([`ModelEmitter`])
//! - [`coordinator`] - Whole runs, from connection to manifest
//! - [`python`] - Python keyword and literal helpers

pub mod builder;
pub mod coordinator;
pub mod emitter;
pub mod mapper;
pub mod python;

mod dialect;
mod graph;
mod imports;
mod naming;
mod registry;

#[cfg(test)]
mod test_support;

pub use builder::CodeBuilder;
pub use coordinator::{GenerationCoordinator, GenerationManifest, ManifestEntry};
pub use dialect::{Capabilities, Dialect};
pub use emitter::{ModelEmitter, ModelPlan, RelationPlan};
pub use graph::ReferenceGraph;
pub use imports::{ImportCollector, ImportGroup};
pub use mapper::{DefaultSpec, FieldDeclaration, FieldKind, FieldType, IntWidth, TypeMapper};
pub use naming::NamingConvention;
pub use registry::DialectRegistry;
