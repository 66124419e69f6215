//! Tortoise naming conventions.

use modelgen_codegen::NamingConvention;
use modelgen_core::{sanitize_identifier, to_pascal_case};

/// Tortoise naming conventions.
pub const TORTOISE_NAMING: NamingConvention = NamingConvention {
    table_to_class: to_pascal_case,
    column_to_attribute: sanitize_identifier,
    reserved_classes: &["Decimal", "Model"],
    // `fields` would shadow the module inside the class body; the rest are
    // members of `tortoise.models.Model`.
    reserved_attributes: &[
        "Meta", "all", "annotate", "clone", "create", "delete", "describe", "exclude", "fields",
        "filter", "first", "get", "pk", "save",
    ],
    class_prefix: "Table",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tortoise_class_names() {
        assert_eq!(TORTOISE_NAMING.class_name("order_item"), "OrderItem");
        assert_eq!(TORTOISE_NAMING.class_name("model"), "TableModel");
        assert_eq!(TORTOISE_NAMING.class_name("class"), "Class");
    }

    #[test]
    fn test_tortoise_reserved_attributes() {
        assert_eq!(TORTOISE_NAMING.attribute_name("pk"), "pk_");
        assert_eq!(TORTOISE_NAMING.attribute_name("fields"), "fields_");
        assert_eq!(TORTOISE_NAMING.attribute_name("filter"), "filter_");
        assert_eq!(TORTOISE_NAMING.attribute_name("from"), "from_");
        assert_eq!(TORTOISE_NAMING.attribute_name("name"), "name");
    }
}
