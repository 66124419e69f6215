//! Naming conventions for generated models.

use crate::python::is_keyword;

/// Dialect-specific naming conventions.
///
/// Defines how table and column names become Python class and attribute
/// names, and which names the ORM reserves.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Transform a table name into a class name (e.g., "order_item" -> "OrderItem")
    pub table_to_class: fn(&str) -> String,
    /// Transform a column name into an attribute name
    pub column_to_attribute: fn(&str) -> String,
    /// Symbols the file preamble may import; a class of the same name would shadow them
    pub reserved_classes: &'static [&'static str],
    /// Attribute names the ORM base class already owns
    pub reserved_attributes: &'static [&'static str],
    /// Prefix for class names that are keywords, reserved or start with a digit
    pub class_prefix: &'static str,
}

impl NamingConvention {
    /// Class name for a table.
    pub fn class_name(&self, table: &str) -> String {
        let name = (self.table_to_class)(table);
        let needs_prefix = name.is_empty()
            || name.starts_with(|c: char| c.is_ascii_digit())
            || is_keyword(&name)
            || self.reserved_classes.contains(&name.as_str());
        if needs_prefix {
            format!("{}{}", self.class_prefix, name)
        } else {
            name
        }
    }

    /// Check if an attribute name cannot be used as-is.
    pub fn is_reserved(&self, name: &str) -> bool {
        is_keyword(name) || self.reserved_attributes.contains(&name)
    }

    /// Attribute name for a column: sanitized, with a trailing underscore for
    /// keywords and reserved names (e.g., "class" -> "class_").
    pub fn attribute_name(&self, column: &str) -> String {
        let mut name = (self.column_to_attribute)(column);
        while self.is_reserved(&name) {
            name.push('_');
        }
        name
    }

    /// File name for a table's module (the table name, unchanged).
    pub fn file_name(&self, table: &str) -> String {
        format!("{}.py", table)
    }
}

#[cfg(test)]
mod tests {
    use modelgen_core::{sanitize_identifier, to_pascal_case};

    use super::*;

    const NAMING: NamingConvention = NamingConvention {
        table_to_class: to_pascal_case,
        column_to_attribute: sanitize_identifier,
        reserved_classes: &["Model", "fields"],
        reserved_attributes: &["pk"],
        class_prefix: "Table",
    };

    #[test]
    fn test_class_name() {
        assert_eq!(NAMING.class_name("order_item"), "OrderItem");
        assert_eq!(NAMING.class_name("userProfile"), "UserProfile");
        assert_eq!(NAMING.class_name("2fa_codes"), "Table2faCodes");
        assert_eq!(NAMING.class_name("model"), "TableModel");
        assert_eq!(NAMING.class_name("none"), "TableNone");
        assert_eq!(NAMING.class_name("___"), "Table");
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(NAMING.attribute_name("email"), "email");
        assert_eq!(NAMING.attribute_name("class"), "class_");
        assert_eq!(NAMING.attribute_name("pk"), "pk_");
        assert_eq!(NAMING.attribute_name("first name"), "first_name");
        assert_eq!(NAMING.attribute_name("2nd"), "_2nd");
    }

    #[test]
    fn test_file_name_keeps_case() {
        assert_eq!(NAMING.file_name("OrderItem"), "OrderItem.py");
    }
}
