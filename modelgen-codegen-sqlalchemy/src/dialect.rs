use modelgen_codegen::{Capabilities, Dialect, FieldKind, FieldType, ModelPlan, NamingConvention};

use crate::{SQLALCHEMY_NAMING, renderer, type_mapper};

const PREAMBLE: &[(&str, &str)] = &[
    ("sqlalchemy.orm", "Mapped"),
    ("sqlalchemy.orm", "mapped_column"),
    (".base", "Base"),
];

/// The `sqlalchemy` dialect (2.x declarative mapping).
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlAlchemy;

pub static SQLALCHEMY: SqlAlchemy = SqlAlchemy;

impl Dialect for SqlAlchemy {
    fn name(&self) -> &'static str {
        "sqlalchemy"
    }

    fn naming(&self) -> &NamingConvention {
        &SQLALCHEMY_NAMING
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            native_enums: true,
            auto_now: true,
            date_functions: true,
            composite_relations: true,
            string_references: false,
        }
    }

    fn preamble(&self) -> &'static [(&'static str, &'static str)] {
        PREAMBLE
    }

    fn field_type(&self, kind: &FieldKind) -> FieldType {
        type_mapper::field_type(kind)
    }

    fn render(&self, model: &ModelPlan<'_>) -> String {
        renderer::render(model)
    }
}
