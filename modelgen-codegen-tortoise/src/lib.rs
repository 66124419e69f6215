//! Tortoise ORM model generator for modelgen.
//!
//! Models follow Tortoise's active-record style: foreign-key columns are
//! replaced by `ForeignKeyField`s that reference their target as a
//! `"models.<Class>"` string, so target imports are only needed for type
//! checkers.
//!
//! # Usage
//!
//! ```ignore
//! use modelgen_codegen::{DialectRegistry, GenerationCoordinator};
//! use modelgen_codegen_tortoise::TORTOISE;
//!
//! let registry = DialectRegistry::new().with(&TORTOISE);
//! let mut coordinator = GenerationCoordinator::new(registry, introspector);
//! let manifest = coordinator.generate(url, "tortoise", None, Path::new("app/models"))?;
//! ```

mod dialect;
mod naming;
mod renderer;
mod type_mapper;

pub use dialect::{TORTOISE, Tortoise};
pub use naming::TORTOISE_NAMING;
