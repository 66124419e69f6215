//! The dialect abstraction every ORM target implements.

use crate::{FieldKind, FieldType, ModelPlan, NamingConvention};

/// Feature flags of a dialect that change how columns are mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Enum columns map to a native enum type. Without it they degrade to a
    /// bounded string with the allowed values in a comment.
    pub native_enums: bool,
    /// `CURRENT_TIMESTAMP` defaults and `ON UPDATE CURRENT_TIMESTAMP` map to
    /// an auto-now declaration on datetime fields.
    pub auto_now: bool,
    /// `CURRENT_DATE` / `CURRENT_TIME` defaults can be declared on date and
    /// time fields.
    pub date_functions: bool,
    /// Multi-column foreign keys become relations. Without it they stay
    /// plain columns and the dialect explains them in a comment.
    pub composite_relations: bool,
    /// Relation targets are always referenced by string, so target imports
    /// are only needed for type checkers.
    pub string_references: bool,
}

/// An ORM modeling convention.
///
/// Implementations are stateless and live in `static`s; a
/// [`DialectRegistry`](crate::DialectRegistry) maps their tokens to them.
pub trait Dialect: Sync {
    /// Token used to select the dialect (e.g., "tortoise").
    fn name(&self) -> &'static str;

    fn naming(&self) -> &NamingConvention;

    fn capabilities(&self) -> Capabilities;

    /// Imports every generated file starts with.
    fn preamble(&self) -> &'static [(&'static str, &'static str)];

    /// The type table: the field type declared for a field kind.
    fn field_type(&self, kind: &FieldKind) -> FieldType;

    /// Render a planned model into the complete file text.
    fn render(&self, model: &ModelPlan<'_>) -> String;
}
