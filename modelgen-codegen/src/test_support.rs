//! A minimal dialect for exercising the shared pipeline.

use modelgen_core::{sanitize_identifier, to_pascal_case};

use crate::python::string_literal;
use crate::{Capabilities, CodeBuilder, Dialect, FieldKind, FieldType, ModelPlan, NamingConvention};

const PLAIN_NAMING: NamingConvention = NamingConvention {
    table_to_class: to_pascal_case,
    column_to_attribute: sanitize_identifier,
    reserved_classes: &["Model"],
    reserved_attributes: &[],
    class_prefix: "Table",
};

pub(crate) static PLAIN: PlainDialect = PlainDialect {
    caps: Capabilities {
        native_enums: true,
        auto_now: true,
        date_functions: true,
        composite_relations: true,
        string_references: false,
    },
};

/// Renders one line per field and relation.
pub(crate) struct PlainDialect {
    caps: Capabilities,
}

impl PlainDialect {
    /// No native enums or date functions, string references only.
    pub(crate) const fn degrading() -> Self {
        Self {
            caps: Capabilities {
                native_enums: false,
                auto_now: true,
                date_functions: false,
                composite_relations: false,
                string_references: true,
            },
        }
    }
}

impl Dialect for PlainDialect {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn naming(&self) -> &NamingConvention {
        &PLAIN_NAMING
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn preamble(&self) -> &'static [(&'static str, &'static str)] {
        &[("plain", "Model")]
    }

    fn field_type(&self, kind: &FieldKind) -> FieldType {
        match kind {
            FieldKind::Integer { .. } => FieldType::new("Integer", "int"),
            FieldKind::Decimal { precision, scale } => FieldType::new("Decimal", "Decimal")
                .arg(precision.to_string())
                .arg(scale.to_string())
                .import("decimal", "Decimal"),
            FieldKind::Float { .. } => FieldType::new("Float", "float"),
            FieldKind::String { max_length } => {
                FieldType::new("String", "str").arg(max_length.to_string())
            }
            FieldKind::Text => FieldType::new("Text", "str"),
            FieldKind::Date => FieldType::new("Date", "date").import("datetime", "date"),
            FieldKind::DateTime => {
                FieldType::new("DateTime", "datetime").import("datetime", "datetime")
            }
            FieldKind::Time => FieldType::new("Time", "time").import("datetime", "time"),
            FieldKind::Boolean => FieldType::new("Boolean", "bool"),
            FieldKind::Binary => FieldType::new("Binary", "bytes"),
            FieldKind::Json => FieldType::new("Json", "dict"),
            FieldKind::Enum { values } => values
                .iter()
                .fold(FieldType::new("Enum", "str"), |ty, v| ty.arg(string_literal(v))),
        }
    }

    fn render(&self, model: &ModelPlan<'_>) -> String {
        let body = CodeBuilder::python()
            .block(&format!("class {}(Model):", model.class_name), |b| {
                b.each(&model.fields, |b, field| {
                    let mut args = field.field_type.args.clone();
                    if field.nullable {
                        args.push("null".to_string());
                    }
                    b.line(&format!(
                        "{} = {}({})",
                        field.attribute,
                        field.field_type.name,
                        args.join(", ")
                    ))
                })
                .each(&model.relations, |b, relation| {
                    b.line(&format!("{} -> {}", relation.attribute, relation.target_class))
                })
            })
            .build();
        model.file(&model.imports, &body)
    }
}
