//! The SQLAlchemy type table.

use modelgen_codegen::python::string_literal;
use modelgen_codegen::{FieldKind, FieldType, IntWidth};

/// Column type and Python annotation type for a field kind.
pub(crate) fn field_type(kind: &FieldKind) -> FieldType {
    let sql = |name: &'static str, python_type: &'static str| {
        FieldType::new(name, python_type).import("sqlalchemy", name)
    };
    match kind {
        FieldKind::Integer { width } => match width {
            IntWidth::Small => sql("SmallInteger", "int"),
            IntWidth::Regular => sql("Integer", "int"),
            IntWidth::Big => sql("BigInteger", "int"),
        },
        FieldKind::Decimal { precision, scale } => sql("Numeric", "Decimal")
            .arg(precision.to_string())
            .arg(scale.to_string())
            .import("decimal", "Decimal"),
        FieldKind::Float { double: false } => sql("Float", "float"),
        FieldKind::Float { double: true } => sql("Double", "float"),
        FieldKind::String { max_length } => sql("String", "str").arg(max_length.to_string()),
        FieldKind::Text => sql("Text", "str"),
        FieldKind::Date => sql("Date", "date").import("datetime", "date"),
        FieldKind::DateTime => sql("DateTime", "datetime").import("datetime", "datetime"),
        FieldKind::Time => sql("Time", "time").import("datetime", "time"),
        FieldKind::Boolean => sql("Boolean", "bool"),
        FieldKind::Binary => sql("LargeBinary", "bytes"),
        FieldKind::Json => sql("JSON", "Any").import("typing", "Any"),
        FieldKind::Enum { values } => values
            .iter()
            .fold(sql("Enum", "str"), |ty, value| ty.arg(string_literal(value))),
    }
}

/// The column type expression, e.g. `String(255)` or `Integer`.
pub(crate) fn type_expr(ty: &FieldType) -> String {
    if ty.args.is_empty() {
        ty.name.to_string()
    } else {
        format!("{}({})", ty.name, ty.args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(kind: FieldKind) -> String {
        type_expr(&field_type(&kind))
    }

    #[test]
    fn test_type_expressions() {
        assert_eq!(expr(FieldKind::Integer { width: IntWidth::Big }), "BigInteger");
        assert_eq!(
            expr(FieldKind::Decimal {
                precision: 8,
                scale: 3
            }),
            "Numeric(8, 3)"
        );
        assert_eq!(expr(FieldKind::String { max_length: 40 }), "String(40)");
        assert_eq!(expr(FieldKind::Float { double: true }), "Double");
        assert_eq!(
            expr(FieldKind::Enum {
                values: vec!["new".into(), "it's".into()]
            }),
            "Enum(\"new\", \"it's\")"
        );
    }

    #[test]
    fn test_python_types_are_imported() {
        let ty = field_type(&FieldKind::DateTime);
        assert_eq!(ty.python_type, "datetime");
        assert!(ty.imports.contains(&("datetime", "datetime")));
        assert!(ty.imports.contains(&("sqlalchemy", "DateTime")));

        let json = field_type(&FieldKind::Json);
        assert!(json.imports.contains(&("typing", "Any")));
    }
}
