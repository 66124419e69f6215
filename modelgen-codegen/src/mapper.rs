//! Column to field mapping.
//!
//! Mapping happens in two steps. [`TypeMapper::classify`] reduces a native
//! type to a dialect-neutral [`FieldKind`]; the dialect's type table then
//! names the concrete field type. Defaults, keys and comments are resolved
//! alongside so a [`FieldDeclaration`] carries everything a dialect renders.

use modelgen_core::{Error, Result};
use modelgen_schema::{BaseType, ColumnInfo, DbFunction, DefaultValue, TableInfo};

use crate::python::{number_literal, string_literal};
use crate::{Capabilities, Dialect};

/// Integer storage width after unsigned promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    Small,
    Regular,
    Big,
}

/// Dialect-neutral classification of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Integer { width: IntWidth },
    Decimal { precision: u32, scale: u32 },
    Float { double: bool },
    String { max_length: u32 },
    Text,
    Date,
    DateTime,
    Time,
    Boolean,
    Binary,
    Json,
    Enum { values: Vec<String> },
}

/// A concrete field type picked from a dialect's type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    /// Type or field class name (e.g., "CharField", "String").
    pub name: &'static str,
    /// Type arguments (e.g., "max_length=255", "255").
    pub args: Vec<String>,
    /// Python type of the attribute value (e.g., "int", "datetime").
    pub python_type: &'static str,
    /// Imports the type and its Python type need.
    pub imports: Vec<(&'static str, &'static str)>,
}

impl FieldType {
    pub fn new(name: &'static str, python_type: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
            python_type,
            imports: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn import(mut self, module: &'static str, symbol: &'static str) -> Self {
        self.imports.push((module, symbol));
        self
    }
}

/// A resolved field default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultSpec {
    /// A Python expression, e.g. `0`, `"active"`, `Decimal("1.50")`.
    Value(String),
    /// A server-side current-time function.
    Now(DbFunction),
}

/// Everything a dialect needs to declare one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// Python attribute name.
    pub attribute: String,
    /// Source column name.
    pub column: String,
    pub kind: FieldKind,
    pub field_type: FieldType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    /// Single-column unique key (never set on primary-key columns).
    pub unique: bool,
    /// Single-column non-unique index.
    pub indexed: bool,
    pub default: Option<DefaultSpec>,
    /// `ON UPDATE CURRENT_TIMESTAMP`, mapped to the dialect's auto-now.
    pub on_update_now: bool,
    pub comment: Option<String>,
    /// Advisory comments rendered above the field.
    pub notes: Vec<String>,
    /// Imports the declaration needs, type table imports included.
    pub imports: Vec<(&'static str, &'static str)>,
}

impl FieldDeclaration {
    /// Whether the attribute name differs from the column name.
    pub fn is_renamed(&self) -> bool {
        self.attribute != self.column
    }
}

/// Stateless column mapper.
pub struct TypeMapper;

impl TypeMapper {
    /// Classify a column's native type.
    ///
    /// Unsigned integers are promoted to the next wider width so every stored
    /// value fits. Types without a mapping fail with an unsupported type error.
    pub fn classify(table: &str, column: &ColumnInfo) -> Result<FieldKind> {
        let ty = &column.native_type;
        if ty.is_boolean() {
            return Ok(FieldKind::Boolean);
        }

        let integer = |width| Ok(FieldKind::Integer { width });
        match &ty.base {
            BaseType::TinyInt | BaseType::Year => integer(IntWidth::Small),
            BaseType::SmallInt if ty.unsigned => integer(IntWidth::Regular),
            BaseType::SmallInt => integer(IntWidth::Small),
            BaseType::MediumInt => integer(IntWidth::Regular),
            BaseType::Int if ty.unsigned => integer(IntWidth::Big),
            BaseType::Int => integer(IntWidth::Regular),
            BaseType::BigInt => integer(IntWidth::Big),
            BaseType::Decimal => Ok(FieldKind::Decimal {
                precision: ty.precision.unwrap_or(10),
                scale: ty.scale.unwrap_or(0),
            }),
            BaseType::Float => Ok(FieldKind::Float { double: false }),
            BaseType::Double => Ok(FieldKind::Float { double: true }),
            BaseType::Char => Ok(FieldKind::String {
                max_length: ty.length.unwrap_or(1),
            }),
            BaseType::VarChar => Ok(FieldKind::String {
                max_length: ty.length.unwrap_or(255),
            }),
            BaseType::TinyText | BaseType::Text | BaseType::MediumText | BaseType::LongText => {
                Ok(FieldKind::Text)
            }
            BaseType::Binary
            | BaseType::VarBinary
            | BaseType::TinyBlob
            | BaseType::Blob
            | BaseType::MediumBlob
            | BaseType::LongBlob => Ok(FieldKind::Binary),
            BaseType::Date => Ok(FieldKind::Date),
            BaseType::DateTime | BaseType::Timestamp => Ok(FieldKind::DateTime),
            BaseType::Time => Ok(FieldKind::Time),
            BaseType::Boolean => Ok(FieldKind::Boolean),
            BaseType::Json => Ok(FieldKind::Json),
            BaseType::Enum => Ok(FieldKind::Enum {
                values: ty.values.clone(),
            }),
            BaseType::Other(_) => Err(Error::unsupported_type(table, &column.name, ty.raw())),
        }
    }

    /// Map one column of `table` to a field declaration for `dialect`.
    pub fn map_column(
        table: &TableInfo,
        column: &ColumnInfo,
        dialect: &dyn Dialect,
    ) -> Result<FieldDeclaration> {
        let caps = dialect.capabilities();
        let mut notes = Vec::new();

        let mut kind = Self::classify(&table.name, column)?;
        let enum_values = match &kind {
            FieldKind::Enum { values } => Some(values.clone()),
            _ => None,
        };
        if let Some(values) = enum_values.as_ref().filter(|_| !caps.native_enums) {
            let longest = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
            kind = FieldKind::String {
                max_length: longest.max(1) as u32,
            };
            notes.push(format!("allowed: {}", values.join(", ")));
        }

        let field_type = dialect.field_type(&kind);
        let mut imports = field_type.imports.clone();

        let default = if column.is_autoincrement {
            None
        } else {
            match resolve_default(&kind, enum_values.as_deref(), column, caps) {
                Ok(default) => default,
                Err(raw) => {
                    log::warn!(
                        "dropping default {} of {}.{}: no {} equivalent",
                        raw,
                        table.name,
                        column.name,
                        dialect.name()
                    );
                    notes.push(format!("database default {} is not mapped", raw));
                    None
                }
            }
        };
        if let Some(DefaultSpec::Value(value)) = &default {
            if value.starts_with("Decimal(") {
                imports.push(("decimal", "Decimal"));
            }
        }

        let on_update_now =
            column.on_update_timestamp && caps.auto_now && kind == FieldKind::DateTime;
        if column.on_update_timestamp && !on_update_now {
            notes.push("ON UPDATE CURRENT_TIMESTAMP is not mapped".to_string());
        }

        let primary_key = column.is_primary_key;
        let unique = column.is_unique && !primary_key;
        Ok(FieldDeclaration {
            attribute: dialect.naming().attribute_name(&column.name),
            column: column.name.clone(),
            kind,
            field_type,
            nullable: column.nullable,
            primary_key,
            autoincrement: column.is_autoincrement,
            unique,
            indexed: column.is_indexed && !unique && !primary_key,
            default,
            on_update_now,
            comment: column.comment.clone(),
            notes,
            imports,
        })
    }
}

/// Resolve a column default for a field kind.
///
/// `Err` carries the SQL text of a default that has no Python equivalent.
fn resolve_default(
    kind: &FieldKind,
    enum_values: Option<&[String]>,
    column: &ColumnInfo,
    caps: Capabilities,
) -> std::result::Result<Option<DefaultSpec>, String> {
    let Some(default) = &column.default_value else {
        return Ok(None);
    };

    match default {
        DefaultValue::Literal(raw) => {
            let value = match kind {
                FieldKind::Integer { .. } => number_literal(raw, false),
                FieldKind::Float { .. } => number_literal(raw, true),
                FieldKind::Decimal { .. } => {
                    number_literal(raw, true).map(|n| format!("Decimal({})", string_literal(&n)))
                }
                FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                    "0" | "b'0'" | "false" => Some("False".to_string()),
                    "1" | "b'1'" | "true" => Some("True".to_string()),
                    _ => None,
                },
                FieldKind::String { .. } | FieldKind::Text | FieldKind::Enum { .. } => {
                    match enum_values {
                        Some(values) if !values.contains(raw) => None,
                        _ => Some(string_literal(raw)),
                    }
                }
                FieldKind::Date
                | FieldKind::DateTime
                | FieldKind::Time
                | FieldKind::Binary
                | FieldKind::Json => None,
            };
            value
                .map(|v| Some(DefaultSpec::Value(v)))
                .ok_or_else(|| format!("'{}'", raw))
        }
        DefaultValue::Function(function) => {
            let supported = caps.auto_now
                && match (function, kind) {
                    (DbFunction::CurrentTimestamp, FieldKind::DateTime) => true,
                    (DbFunction::CurrentDate, FieldKind::Date)
                    | (DbFunction::CurrentTime, FieldKind::Time) => caps.date_functions,
                    _ => false,
                };
            if supported {
                Ok(Some(DefaultSpec::Now(*function)))
            } else {
                Err(function_sql(*function).to_string())
            }
        }
        DefaultValue::Expression(expr) => Err(expr.clone()),
    }
}

fn function_sql(function: DbFunction) -> &'static str {
    match function {
        DbFunction::CurrentTimestamp => "CURRENT_TIMESTAMP",
        DbFunction::CurrentDate => "CURRENT_DATE",
        DbFunction::CurrentTime => "CURRENT_TIME",
    }
}

#[cfg(test)]
mod tests {
    use modelgen_core::ErrorKind;
    use modelgen_schema::NativeType;

    use super::*;
    use crate::test_support::{PLAIN, PlainDialect};

    fn col(name: &str, ty: &str) -> ColumnInfo {
        ColumnInfo::new(name, NativeType::parse(ty).unwrap())
    }

    fn kind_of(ty: &str) -> FieldKind {
        TypeMapper::classify("t", &col("c", ty)).unwrap()
    }

    fn map(column: ColumnInfo) -> FieldDeclaration {
        let table = TableInfo::new("t", vec![column.clone()]);
        TypeMapper::map_column(&table, &column, &PLAIN).unwrap()
    }

    fn map_with(column: ColumnInfo, dialect: &PlainDialect) -> FieldDeclaration {
        let table = TableInfo::new("t", vec![column.clone()]);
        TypeMapper::map_column(&table, &column, dialect).unwrap()
    }

    #[test]
    fn test_integer_widths() {
        use IntWidth::*;
        let cases = [
            ("tinyint(4)", Small),
            ("tinyint(3) unsigned", Small),
            ("smallint", Small),
            ("smallint unsigned", Regular),
            ("mediumint", Regular),
            ("mediumint unsigned", Regular),
            ("int(11)", Regular),
            ("int unsigned", Big),
            ("bigint", Big),
            ("bigint(20) unsigned", Big),
            ("year", Small),
        ];
        for (ty, width) in cases {
            assert_eq!(kind_of(ty), FieldKind::Integer { width }, "{ty}");
        }
    }

    #[test]
    fn test_only_width_one_tinyint_is_boolean() {
        assert_eq!(kind_of("tinyint(1)"), FieldKind::Boolean);
        assert_eq!(kind_of("boolean"), FieldKind::Boolean);
        assert_ne!(kind_of("tinyint(2)"), FieldKind::Boolean);
    }

    #[test]
    fn test_other_families() {
        assert_eq!(
            kind_of("decimal(10,2)"),
            FieldKind::Decimal {
                precision: 10,
                scale: 2
            }
        );
        assert_eq!(kind_of("double"), FieldKind::Float { double: true });
        assert_eq!(kind_of("float"), FieldKind::Float { double: false });
        assert_eq!(kind_of("varchar(64)"), FieldKind::String { max_length: 64 });
        assert_eq!(kind_of("char(2)"), FieldKind::String { max_length: 2 });
        assert_eq!(kind_of("mediumtext"), FieldKind::Text);
        assert_eq!(kind_of("longblob"), FieldKind::Binary);
        assert_eq!(kind_of("varbinary(16)"), FieldKind::Binary);
        assert_eq!(kind_of("timestamp(3)"), FieldKind::DateTime);
        assert_eq!(kind_of("time"), FieldKind::Time);
        assert_eq!(kind_of("json"), FieldKind::Json);
        assert_eq!(
            kind_of("enum('a','b')"),
            FieldKind::Enum {
                values: vec!["a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn test_unsupported_types() {
        for ty in ["geometry", "point", "set('a','b')", "bit(1)"] {
            let err = TypeMapper::classify("places", &col("shape", ty)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedType);
            assert!(err.to_string().contains("places.shape"), "{ty}");
            assert!(err.to_string().contains(ty), "{ty}");
        }
    }

    #[test]
    fn test_enum_degrades_without_native_enums() {
        let field = map_with(
            col("status", "enum('new','paid','void')"),
            &PlainDialect::degrading(),
        );

        assert_eq!(field.kind, FieldKind::String { max_length: 4 });
        assert_eq!(field.notes, vec!["allowed: new, paid, void"]);

        let native = map(col("status", "enum('new','paid')"));
        assert!(matches!(native.kind, FieldKind::Enum { .. }));
        assert!(native.notes.is_empty());
    }

    #[test]
    fn test_literal_defaults() {
        let value = |column: ColumnInfo| map(column).default;

        assert_eq!(
            value(col("n", "int").default_value(DefaultValue::Literal("0".into()))),
            Some(DefaultSpec::Value("0".into()))
        );
        assert_eq!(
            value(col("flag", "tinyint(1)").default_value(DefaultValue::Literal("1".into()))),
            Some(DefaultSpec::Value("True".into()))
        );
        assert_eq!(
            value(col("name", "varchar(8)").default_value(DefaultValue::Literal("it's".into()))),
            Some(DefaultSpec::Value("\"it's\"".into()))
        );
        let price = map(
            col("price", "decimal(8,2)").default_value(DefaultValue::Literal("1.50".into())),
        );
        assert_eq!(price.default, Some(DefaultSpec::Value("Decimal(\"1.50\")".into())));
        assert!(price.imports.contains(&("decimal", "Decimal")));
    }

    #[test]
    fn test_unrepresentable_defaults_become_notes() {
        let zero_date = map(
            col("born", "date").default_value(DefaultValue::Literal("0000-00-00".into())),
        );
        assert_eq!(zero_date.default, None);
        assert_eq!(zero_date.notes, vec!["database default '0000-00-00' is not mapped"]);

        let uuid = map(
            col("token", "varchar(36)").default_value(DefaultValue::Expression("uuid()".into())),
        );
        assert_eq!(uuid.default, None);
        assert_eq!(uuid.notes, vec!["database default uuid() is not mapped"]);

        let bad_enum = map(
            col("s", "enum('a','b')").default_value(DefaultValue::Literal("c".into())),
        );
        assert_eq!(bad_enum.default, None);
    }

    #[test]
    fn test_current_time_defaults() {
        let created = map(
            col("created_at", "datetime")
                .default_value(DefaultValue::Function(DbFunction::CurrentTimestamp)),
        );
        assert_eq!(created.default, Some(DefaultSpec::Now(DbFunction::CurrentTimestamp)));
        assert!(!created.on_update_now);

        let updated = map(
            col("updated_at", "timestamp")
                .default_value(DefaultValue::Function(DbFunction::CurrentTimestamp))
                .on_update_timestamp(),
        );
        assert!(updated.on_update_now);

        let day = map_with(
            col("day", "date").default_value(DefaultValue::Function(DbFunction::CurrentDate)),
            &PlainDialect::degrading(),
        );
        assert_eq!(day.default, None);
        assert_eq!(day.notes, vec!["database default CURRENT_DATE is not mapped"]);
    }

    #[test]
    fn test_keys_and_names() {
        let id = map(col("id", "int").primary_key().autoincrement().unique()
            .default_value(DefaultValue::Literal("0".into())));
        assert!(id.primary_key && id.autoincrement);
        assert!(!id.unique);
        assert_eq!(id.default, None);

        let indexed = map(col("email", "varchar(255)").unique().indexed());
        assert!(indexed.unique && !indexed.indexed);

        let keyword = map(col("class", "int"));
        assert_eq!(keyword.attribute, "class_");
        assert!(keyword.is_renamed());
    }
}
