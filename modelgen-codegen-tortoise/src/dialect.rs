use modelgen_codegen::{Capabilities, Dialect, FieldKind, FieldType, ModelPlan, NamingConvention};

use crate::{TORTOISE_NAMING, renderer, type_mapper};

const PREAMBLE: &[(&str, &str)] = &[("tortoise", "fields"), ("tortoise.models", "Model")];

/// The `tortoise` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tortoise;

/// Shared instance for registries.
pub static TORTOISE: Tortoise = Tortoise;

impl Dialect for Tortoise {
    fn name(&self) -> &'static str {
        "tortoise"
    }

    fn naming(&self) -> &NamingConvention {
        &TORTOISE_NAMING
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            native_enums: false,
            auto_now: true,
            date_functions: false,
            composite_relations: false,
            string_references: true,
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
