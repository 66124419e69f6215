//! SQLAlchemy naming conventions.

use modelgen_codegen::NamingConvention;
use modelgen_core::{sanitize_identifier, to_pascal_case};

/// SQLAlchemy naming conventions.
///
/// Generated modules import types by name, so a class or attribute with the
/// same name would shadow them inside the module or class body.
pub const SQLALCHEMY_NAMING: NamingConvention = NamingConvention {
    table_to_class: to_pascal_case,
    column_to_attribute: sanitize_identifier,
    reserved_classes: &[
        "Any", "Base", "BigInteger", "Boolean", "Date", "DateTime", "Decimal", "Double", "Enum",
        "Float", "ForeignKey", "ForeignKeyConstraint", "Integer", "JSON", "LargeBinary", "Mapped",
        "Numeric", "Optional", "SmallInteger", "String", "Text", "Time", "UniqueConstraint",
    ],
    reserved_attributes: &[
        "Any", "Decimal", "ForeignKey", "Mapped", "Optional", "date", "datetime", "func",
        "mapped_column", "metadata", "registry", "relationship", "time",
    ],
    class_prefix: "Table",
};
