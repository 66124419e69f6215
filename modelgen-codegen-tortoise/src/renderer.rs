//! Tortoise model rendering.

use modelgen_codegen::python::string_literal;
use modelgen_codegen::{
    CodeBuilder, DefaultSpec, FieldDeclaration, FieldKind, ModelPlan, RelationPlan,
};

pub(crate) fn render(model: &ModelPlan<'_>) -> String {
    let body = CodeBuilder::python()
        .block(&format!("class {}(Model):", model.class_name), |b| {
            b.each(table_notes(model), |b, note| b.comment(&note))
                .each(&model.fields, |b, field| {
                    let b = b.each(&field.notes, |b, note| b.comment(note));
                    match model.relation_for(&field.column) {
                        Some(relation) => b.line(&relation_line(model, field, relation)),
                        None => b.line(&field_line(model, field)),
                    }
                })
                .blank()
                .block("class Meta:", |b| meta(b, model))
        })
        .build();
    model.file(&model.imports, &body)
}

/// Table-level caveats Tortoise cannot express.
fn table_notes(model: &ModelPlan<'_>) -> Vec<String> {
    let table = model.table;
    let mut notes = Vec::new();
    match table.primary_key.as_slice() {
        [] => notes.push("no primary key: Tortoise adds an implicit \"id\" field".to_string()),
        [_] => {}
        columns => notes.push(format!(
            "composite primary key ({}) is kept as unique_together; Tortoise adds an implicit \"id\" field",
            columns.join(", ")
        )),
    }
    for fk in table.foreign_keys.iter().filter(|fk| fk.is_composite()) {
        notes.push(format!(
            "composite foreign key ({}) -> {} ({}) is kept as plain columns",
            fk.columns.join(", "),
            fk.target_table,
            fk.target_columns.join(", ")
        ));
    }
    notes
}

fn is_single_pk(model: &ModelPlan<'_>, field: &FieldDeclaration) -> bool {
    field.primary_key && !model.table.has_composite_primary_key()
}

fn field_line(model: &ModelPlan<'_>, field: &FieldDeclaration) -> String {
    let mut args = field.field_type.args.clone();
    if is_single_pk(model, field) {
        args.push("pk=True".to_string());
        if matches!(field.kind, FieldKind::Integer { .. }) && !field.autoincrement {
            args.push("generated=False".to_string());
        }
    }
    if field.is_renamed() {
        args.push(format!("source_field={}", string_literal(&field.column)));
    }
    if field.nullable {
        args.push("null=True".to_string());
    }
    if field.unique {
        args.push("unique=True".to_string());
    }
    if field.indexed {
        args.push("db_index=True".to_string());
    }
    match &field.default {
        Some(DefaultSpec::Value(value)) => args.push(format!("default={}", value)),
        // auto_now covers the insert as well
        Some(DefaultSpec::Now(_)) if !field.on_update_now => {
            args.push("auto_now_add=True".to_string())
        }
        _ => {}
    }
    if field.on_update_now {
        args.push("auto_now=True".to_string());
    }
    if let Some(comment) = &field.comment {
        args.push(format!("description={}", string_literal(comment)));
    }
    format!(
        "{} = fields.{}({})",
        field.attribute,
        field.field_type.name,
        args.join(", ")
    )
}

fn relation_line(
    model: &ModelPlan<'_>,
    field: &FieldDeclaration,
    relation: &RelationPlan,
) -> String {
    let (class, annotation) = match (relation.one_to_one, relation.nullable) {
        (false, false) => ("ForeignKeyField", "ForeignKeyRelation"),
        (false, true) => ("ForeignKeyField", "ForeignKeyNullableRelation"),
        (true, false) => ("OneToOneField", "OneToOneRelation"),
        (true, true) => ("OneToOneField", "OneToOneNullableRelation"),
    };

    let mut args = vec![
        string_literal(&format!("models.{}", relation.target_class)),
        format!("related_name={}", string_literal(&relation.related_name)),
    ];
    if let Some(to_field) = &relation.to_field {
        args.push(format!("to_field={}", string_literal(to_field)));
    }
    if format!("{}_id", relation.attribute) != field.column {
        args.push(format!("source_field={}", string_literal(&field.column)));
    }
    if is_single_pk(model, field) {
        args.push("pk=True".to_string());
    }
    if relation.nullable {
        args.push("null=True".to_string());
    }
    if let Some(comment) = &field.comment {
        args.push(format!("description={}", string_literal(comment)));
    }

    format!(
        "{}: fields.{}[{}] = fields.{}({})",
        relation.attribute,
        annotation,
        string_literal(&relation.target_class),
        class,
        args.join(", ")
    )
}

fn meta(builder: CodeBuilder, model: &ModelPlan<'_>) -> CodeBuilder {
    let table = model.table;

    let mut unique_sets: Vec<Vec<String>> = Vec::new();
    if table.has_composite_primary_key() {
        unique_sets.push(table.primary_key.clone());
    }
    unique_sets.extend(table.unique_constraints.iter().cloned());
    let unique_together = unique_sets
        .iter()
        .map(|columns| {
            let names: Vec<_> = columns
                .iter()
                .map(|column| string_literal(&field_name(model, column)))
                .collect();
            format!("({})", names.join(", "))
        })
        .collect::<Vec<_>>();

    builder
        .line(&format!("table = {}", string_literal(&table.name)))
        .each(&table.comment, |b, comment| {
            b.line(&format!("table_description = {}", string_literal(comment)))
        })
        .when(!unique_together.is_empty(), |b| {
            b.line(&format!("unique_together = ({},)", unique_together.join(", ")))
        })
}

/// The model field that owns `column`.
fn field_name(model: &ModelPlan<'_>, column: &str) -> String {
    match (model.relation_for(column), model.field(column)) {
        (Some(relation), _) => relation.attribute.clone(),
        (None, Some(field)) => field.attribute.clone(),
        (None, None) => column.to_string(),
    }
}
