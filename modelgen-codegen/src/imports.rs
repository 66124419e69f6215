//! Python import collection.

use std::collections::{BTreeMap, BTreeSet};

use crate::CodeBuilder;

/// Import sections in PEP 8 order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportGroup {
    /// Standard library (`datetime`, `decimal`, `typing`).
    Stdlib,
    /// The ORM and other installed packages.
    ThirdParty,
    /// Relative imports from the models package.
    Local,
}

impl ImportGroup {
    /// Classify a module by name.
    pub fn of(module: &str) -> Self {
        if module.starts_with('.') {
            Self::Local
        } else if matches!(
            module.split('.').next(),
            Some("datetime" | "decimal" | "enum" | "typing" | "uuid")
        ) {
            Self::Stdlib
        } else {
            Self::ThirdParty
        }
    }
}

/// Tracks `from module import symbol` imports and deduplicates them.
///
/// Output is fully sorted (group, then module, then symbol), so the order in
/// which fields register their imports never changes the rendered file.
///
/// # Example
///
/// ```
/// use modelgen_codegen::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("sqlalchemy", "String");
/// imports.add("typing", "Optional");
/// imports.add("sqlalchemy", "Integer");
///
/// assert_eq!(
///     imports.render(),
///     "from typing import Optional\n\nfrom sqlalchemy import Integer, String\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Module path -> set of symbols
    imports: BTreeMap<(ImportGroup, String), BTreeSet<String>>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a module.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.imports
            .entry((ImportGroup::of(module), module.to_string()))
            .or_default()
            .insert(symbol.to_string());
    }

    /// Add every `(module, symbol)` pair.
    pub fn extend<'a>(
        &mut self,
        imports: impl IntoIterator<Item = &'a (&'static str, &'static str)>,
    ) {
        for (module, symbol) in imports {
            self.add(module, symbol);
        }
    }

    /// Check if a module is already imported.
    pub fn has_module(&self, module: &str) -> bool {
        self.imports
            .contains_key(&(ImportGroup::of(module), module.to_string()))
    }

    /// Check if a specific symbol is imported from a module.
    pub fn has_symbol(&self, module: &str, symbol: &str) -> bool {
        self.imports
            .get(&(ImportGroup::of(module), module.to_string()))
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    /// Iterate over all imports in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.imports.iter().map(|((_, module), v)| (module.as_str(), v))
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Get the number of modules.
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    /// Write the import lines at the builder's current indentation, with a
    /// blank line between groups.
    pub fn write(&self, mut builder: CodeBuilder) -> CodeBuilder {
        let mut previous = None;
        for ((group, module), symbols) in &self.imports {
            if previous.is_some_and(|p| p != *group) {
                builder = builder.blank();
            }
            previous = Some(*group);
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            builder = builder.line(&format!("from {} import {}", module, symbols.join(", ")));
        }
        builder
    }

    /// Render the import lines as a standalone block.
    pub fn render(&self) -> String {
        self.write(CodeBuilder::python()).build()
    }
}
