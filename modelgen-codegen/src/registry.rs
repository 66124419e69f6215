//! Dialect lookup by token.

use std::collections::BTreeMap;

use modelgen_core::{Error, Result};

use crate::Dialect;

/// Maps dialect tokens (e.g., "tortoise") to dialect implementations.
///
/// The set is closed per registry: selecting a token that was never
/// registered fails before any database work happens.
#[derive(Default, Clone)]
pub struct DialectRegistry {
    dialects: BTreeMap<&'static str, &'static dyn Dialect>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, dialect: &'static dyn Dialect) -> Self {
        self.register(dialect);
        self
    }

    /// Register a dialect under its own name, replacing any previous one.
    pub fn register(&mut self, dialect: &'static dyn Dialect) {
        if self.dialects.insert(dialect.name(), dialect).is_some() {
            log::debug!("dialect '{}' replaced", dialect.name());
        }
    }

    /// Look up a dialect by token.
    pub fn get(&self, name: &str) -> Result<&'static dyn Dialect> {
        self.dialects
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_dialect(name, self.names()))
    }

    /// Registered tokens, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dialects.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use modelgen_core::ErrorKind;

    use super::*;
    use crate::test_support::PLAIN;

    #[test]
    fn test_lookup() {
        let registry = DialectRegistry::new().with(&PLAIN);

        assert_eq!(registry.get("plain").unwrap().name(), "plain");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["plain"]);
    }

    #[test]
    fn test_unknown_dialect_lists_known_names() {
        let registry = DialectRegistry::new().with(&PLAIN);
        let err = registry.get("peewee").err().unwrap();

        assert_eq!(err.kind(), ErrorKind::Config);
        match *err {
            Error::UnknownDialect { ref known, .. } => assert_eq!(known, "plain"),
            _ => panic!("expected UnknownDialect"),
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = DialectRegistry::new().with(&PLAIN);
        assert!(registry.get("Plain").is_err());
        assert!(DialectRegistry::new().is_empty());
    }
}
