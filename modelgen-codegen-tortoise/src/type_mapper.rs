//! The Tortoise type table.

use modelgen_codegen::{FieldKind, FieldType, IntWidth};

/// Field class for a field kind.
///
/// Field lines carry no annotations, so Python types need no imports here.
pub(crate) fn field_type(kind: &FieldKind) -> FieldType {
    match kind {
        FieldKind::Integer { width } => match width {
            IntWidth::Small => FieldType::new("SmallIntField", "int"),
            IntWidth::Regular => FieldType::new("IntField", "int"),
            IntWidth::Big => FieldType::new("BigIntField", "int"),
        },
        FieldKind::Decimal { precision, scale } => FieldType::new("DecimalField", "Decimal")
            .arg(format!("max_digits={}", precision))
            .arg(format!("decimal_places={}", scale)),
        FieldKind::Float { .. } => FieldType::new("FloatField", "float"),
        FieldKind::String { max_length } => {
            FieldType::new("CharField", "str").arg(format!("max_length={}", max_length))
        }
        FieldKind::Text => FieldType::new("TextField", "str"),
        FieldKind::Date => FieldType::new("DateField", "date"),
        FieldKind::DateTime => FieldType::new("DatetimeField", "datetime"),
        FieldKind::Time => FieldType::new("TimeField", "time"),
        FieldKind::Boolean => FieldType::new("BooleanField", "bool"),
        FieldKind::Binary => FieldType::new("BinaryField", "bytes"),
        FieldKind::Json => FieldType::new("JSONField", "Any"),
        // Enums are degraded before they reach the type table.
        FieldKind::Enum { values } => {
            let longest = values.iter().map(|v| v.chars().count()).max().unwrap_or(1);
            FieldType::new("CharField", "str").arg(format!("max_length={}", longest.max(1)))
        }
    }
}
