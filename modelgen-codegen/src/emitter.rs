//! Per-table model planning and emission.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use modelgen_core::Result;
use modelgen_schema::{ForeignKey, TableInfo};

use crate::graph::ReferenceGraph;
use crate::python::{is_module_name, string_literal};
use crate::{CodeBuilder, Dialect, FieldDeclaration, ImportCollector, TypeMapper};

/// A foreign key resolved to a relation attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPlan {
    pub attribute: String,
    pub foreign_key: ForeignKey,
    pub target_class: String,
    /// Reference the target by string instead of by name.
    pub forward_ref: bool,
    /// Reverse accessor on the target model.
    pub related_name: String,
    /// Any of the key columns is nullable.
    pub nullable: bool,
    /// The single key column is also unique on its own (or the sole primary key).
    pub one_to_one: bool,
    /// Target column, when it is not the target's primary key.
    pub to_field: Option<String>,
    pub self_reference: bool,
    /// Another foreign key joins the same two tables (in either direction),
    /// so the join columns must be spelled out.
    pub ambiguous: bool,
}

impl RelationPlan {
    /// The key column of a single-column foreign key.
    pub fn column(&self) -> Option<&str> {
        match self.foreign_key.columns.as_slice() {
            [column] => Some(column),
            _ => None,
        }
    }
}

/// Everything a dialect needs to render one table.
#[derive(Debug, Clone)]
pub struct ModelPlan<'a> {
    pub table: &'a TableInfo,
    pub class_name: String,
    /// Fields in column ordinal order.
    pub fields: Vec<FieldDeclaration>,
    pub relations: Vec<RelationPlan>,
    /// Dialect preamble, field imports and runtime relation imports.
    pub imports: ImportCollector,
    /// Imports only needed by type checkers.
    pub type_checking_imports: ImportCollector,
}

impl ModelPlan<'_> {
    pub fn field(&self, column: &str) -> Option<&FieldDeclaration> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// The single-column relation whose key is `column`, if any.
    pub fn relation_for(&self, column: &str) -> Option<&RelationPlan> {
        self.relations.iter().find(|r| r.column() == Some(column))
    }

    /// Attribute names of `columns`, falling back to the column name.
    pub fn attributes_of<'s>(&'s self, columns: &'s [String]) -> Vec<&'s str> {
        columns
            .iter()
            .map(|c| self.field(c).map_or(c.as_str(), |f| f.attribute.as_str()))
            .collect()
    }

    /// Assemble the final file: header comment, imports, the `TYPE_CHECKING`
    /// block and the class body.
    pub fn file(&self, imports: &ImportCollector, body: &str) -> String {
        let mut builder = CodeBuilder::python()
            .comment(&format!(
                "Generated by modelgen from table {}.",
                string_literal(&self.table.name)
            ))
            .blank();
        builder = imports.write(builder);
        if !self.type_checking_imports.is_empty() {
            builder = builder
                .blank()
                .line("if TYPE_CHECKING:")
                .indent();
            builder = self.type_checking_imports.write(builder).dedent();
        }
        builder.blank().blank().raw(body).build()
    }
}

/// Renders tables of one run into model source files.
///
/// Construction looks at the whole run once: class names of every table and
/// the foreign-key cycles that force forward references. Tables referenced
/// from the run but not generated in it can be added with
/// [`ModelEmitter::with_context`].
pub struct ModelEmitter<'a> {
    dialect: &'a dyn Dialect,
    class_names: BTreeMap<&'a str, String>,
    primary_keys: BTreeMap<&'a str, &'a [String]>,
    references: BTreeMap<&'a str, BTreeSet<&'a str>>,
    graph: ReferenceGraph,
}

impl<'a> ModelEmitter<'a> {
    pub fn new(dialect: &'a dyn Dialect, tables: &'a [TableInfo]) -> Self {
        let naming = dialect.naming();
        Self {
            dialect,
            class_names: tables
                .iter()
                .map(|t| (t.name.as_str(), naming.class_name(&t.name)))
                .collect(),
            primary_keys: tables
                .iter()
                .map(|t| (t.name.as_str(), t.primary_key.as_slice()))
                .collect(),
            references: tables
                .iter()
                .map(|t| (t.name.as_str(), t.foreign_key_targets()))
                .collect(),
            graph: ReferenceGraph::new(tables),
        }
    }

    /// Tables outside the run whose keys and foreign keys decide primary-key
    /// targets and reverse accessor clashes.
    pub fn with_context(mut self, context: &'a [TableInfo]) -> Self {
        for table in context {
            let name = table.name.as_str();
            self.primary_keys
                .entry(name)
                .or_insert(table.primary_key.as_slice());
            self.references
                .entry(name)
                .or_insert_with(|| table.foreign_key_targets());
        }
        self
    }

    /// Class name for any table, inside the run or not.
    pub fn class_name(&self, table: &str) -> String {
        self.class_names
            .get(table)
            .cloned()
            .unwrap_or_else(|| self.dialect.naming().class_name(table))
    }

    /// Plan a table without rendering it.
    pub fn plan<'t>(&self, table: &'t TableInfo) -> Result<ModelPlan<'t>> {
        let naming = self.dialect.naming();
        let caps = self.dialect.capabilities();

        let mut used = HashSet::new();
        let mut fields = Vec::with_capacity(table.columns.len());
        let mut imports = ImportCollector::new();
        imports.extend(self.dialect.preamble());
        for column in &table.columns {
            let mut field = TypeMapper::map_column(table, column, self.dialect)?;
            while !used.insert(field.attribute.clone()) {
                field.attribute.push('_');
            }
            imports.extend(&field.imports);
            fields.push(field);
        }

        let mut type_checking_imports = ImportCollector::new();
        let mut relations = Vec::with_capacity(table.foreign_keys.len());
        for fk in &table.foreign_keys {
            if fk.is_composite() && !caps.composite_relations {
                continue;
            }
            let mut attribute = match fk.columns.as_slice() {
                [column] => match column.strip_suffix("_id").filter(|s| !s.is_empty()) {
                    Some(stem) => naming.attribute_name(stem),
                    None => naming.attribute_name(&format!("{}_rel", column)),
                },
                _ => naming.attribute_name(&fk.target_table),
            };
            while !used.insert(attribute.clone()) {
                attribute.push_str("_rel");
            }

            let self_reference = fk.target_table == table.name;
            let parallel = table
                .foreign_keys
                .iter()
                .filter(|other| other.target_table == fk.target_table)
                .count()
                > 1;
            let reverse = !self_reference
                && self
                    .references
                    .get(fk.target_table.as_str())
                    .is_some_and(|targets| targets.contains(table.name.as_str()));
            let ambiguous = parallel || reverse;
            let related_name = if ambiguous {
                naming.attribute_name(&format!("{}_{}", table.name, attribute))
            } else {
                naming.attribute_name(&table.name)
            };
            let importable = is_module_name(&fk.target_table);
            let forward_ref = caps.string_references
                || self_reference
                || !importable
                || self.graph.is_mutual(&table.name, &fk.target_table);

            let key_columns: Vec<_> = fk.columns.iter().filter_map(|c| table.column(c)).collect();
            let nullable = key_columns.iter().any(|c| c.nullable);
            let one_to_one = match key_columns.as_slice() {
                [column] if !fk.is_composite() => {
                    column.is_unique
                        || (column.is_primary_key && !table.has_composite_primary_key())
                }
                _ => false,
            };
            let to_field = match fk.target_columns.as_slice() {
                [target_column] => {
                    let is_target_pk = match self.primary_keys.get(fk.target_table.as_str()) {
                        Some(pk) => pk.len() == 1 && &pk[0] == target_column,
                        None => target_column == "id",
                    };
                    (!is_target_pk).then(|| target_column.clone())
                }
                _ => None,
            };

            let target_class = self.class_name(&fk.target_table);
            if !self_reference && importable {
                let module = format!(".{}", fk.target_table);
                if forward_ref {
                    type_checking_imports.add(&module, &target_class);
                } else {
                    imports.add(&module, &target_class);
                }
            }

            relations.push(RelationPlan {
                attribute,
                foreign_key: fk.clone(),
                target_class,
                forward_ref,
                related_name,
                nullable,
                one_to_one,
                to_field,
                self_reference,
                ambiguous,
            });
        }
        if !type_checking_imports.is_empty() {
            imports.add("typing", "TYPE_CHECKING");
        }

        Ok(ModelPlan {
            table,
            class_name: self.class_name(&table.name),
            fields,
            relations,
            imports,
            type_checking_imports,
        })
    }

    /// Render a table into the text of its model file.
    pub fn render(&self, table: &TableInfo) -> Result<String> {
        let plan = self.plan(table)?;
        log::debug!(
            "rendering table '{}' as {} model {}",
            table.name,
            self.dialect.name(),
            plan.class_name
        );
        Ok(self.dialect.render(&plan))
    }
}
