//! Declarative model rendering.

use modelgen_codegen::python::string_literal;
use modelgen_codegen::{
    CodeBuilder, DefaultSpec, FieldDeclaration, FieldKind, ImportCollector, ModelPlan,
    RelationPlan,
};
use modelgen_schema::DbFunction;

use crate::type_mapper::type_expr;

const NO_PRIMARY_KEY: &str =
    "no primary key: SQLAlchemy cannot map this table until one is declared";

pub(crate) fn render(model: &ModelPlan<'_>) -> String {
    let table = model.table;
    let mut imports = model.imports.clone();

    let table_args = table_args(model, &mut imports);
    let columns: Vec<_> = model
        .fields
        .iter()
        .map(|field| (field, column_line(model, field, &mut imports)))
        .collect();
    let relations: Vec<_> = model
        .relations
        .iter()
        .map(|relation| relation_line(model, relation, &mut imports))
        .collect();

    let body = CodeBuilder::python()
        .block(&format!("class {}(Base):", model.class_name), |b| {
            b.when(table.primary_key.is_empty(), |b| b.comment(NO_PRIMARY_KEY))
                .line(&format!("__tablename__ = {}", string_literal(&table.name)))
                .when(!table_args.is_empty(), |b| {
                    b.line("__table_args__ = (")
                        .indent()
                        .each(&table_args, |b, arg| b.line(&format!("{},", arg)))
                        .dedent()
                        .line(")")
                })
                .blank()
                .each(&columns, |b, (field, line)| {
                    b.each(&field.notes, |b, note| b.comment(note)).line(line)
                })
                .when(!relations.is_empty(), |b| {
                    b.blank().each(&relations, |b, line| b.line(line))
                })
        })
        .build();
    model.file(&imports, &body)
}

/// Constraints that do not fit on a single column, and the table comment.
fn table_args(model: &ModelPlan<'_>, imports: &mut ImportCollector) -> Vec<String> {
    let table = model.table;
    let mut args = Vec::new();

    for fk in table.foreign_keys.iter().filter(|fk| fk.is_composite()) {
        imports.add("sqlalchemy", "ForeignKeyConstraint");
        let targets: Vec<_> = fk
            .target_columns
            .iter()
            .map(|column| format!("{}.{}", fk.target_table, column))
            .collect();
        args.push(format!(
            "ForeignKeyConstraint({}, {})",
            string_list(&fk.columns),
            string_list(&targets)
        ));
    }
    for columns in &table.unique_constraints {
        imports.add("sqlalchemy", "UniqueConstraint");
        let names: Vec<_> = columns.iter().map(|c| string_literal(c)).collect();
        args.push(format!("UniqueConstraint({})", names.join(", ")));
    }
    if let Some(comment) = &table.comment {
        args.push(format!("{{\"comment\": {}}}", string_literal(comment)));
    }
    args
}

fn column_line(
    model: &ModelPlan<'_>,
    field: &FieldDeclaration,
    imports: &mut ImportCollector,
) -> String {
    let mut args = Vec::new();
    if field.is_renamed() {
        args.push(string_literal(&field.column));
    }
    args.push(type_expr(&field.field_type));

    let reference = model.relation_for(&field.column).and_then(|relation| {
        let fk = &relation.foreign_key;
        match fk.target_columns.as_slice() {
            [target] => Some(format!("{}.{}", fk.target_table, target)),
            _ => None,
        }
    });
    if let Some(reference) = reference {
        imports.add("sqlalchemy", "ForeignKey");
        args.push(format!("ForeignKey({})", string_literal(&reference)));
    }

    if field.primary_key {
        args.push("primary_key=True".to_string());
        let single = !model.table.has_composite_primary_key();
        if field.autoincrement {
            args.push("autoincrement=True".to_string());
        } else if single && matches!(field.kind, FieldKind::Integer { .. }) {
            args.push("autoincrement=False".to_string());
        }
    }
    if field.unique {
        args.push("unique=True".to_string());
    }
    if field.indexed {
        args.push("index=True".to_string());
    }
    match &field.default {
        Some(DefaultSpec::Value(value)) => args.push(format!("default={}", value)),
        Some(DefaultSpec::Now(function)) => {
            imports.add("sqlalchemy", "func");
            args.push(format!("server_default={}", func(*function)));
        }
        None => {}
    }
    if field.on_update_now {
        imports.add("sqlalchemy", "func");
        args.push("onupdate=func.now()".to_string());
    }
    if let Some(comment) = &field.comment {
        args.push(format!("comment={}", string_literal(comment)));
    }

    format!(
        "{}: Mapped[{}] = mapped_column({})",
        field.attribute,
        optional(field.field_type.python_type.to_string(), field.nullable, imports),
        args.join(", ")
    )
}

fn relation_line(
    model: &ModelPlan<'_>,
    relation: &RelationPlan,
    imports: &mut ImportCollector,
) -> String {
    imports.add("sqlalchemy.orm", "relationship");
    let target = if relation.forward_ref {
        string_literal(&relation.target_class)
    } else {
        relation.target_class.clone()
    };

    let mut args = Vec::new();
    if relation.ambiguous {
        let columns = model.attributes_of(&relation.foreign_key.columns);
        args.push(format!("foreign_keys=[{}]", columns.join(", ")));
    }
    if relation.self_reference {
        let columns = model.attributes_of(&relation.foreign_key.target_columns);
        args.push(format!("remote_side=[{}]", columns.join(", ")));
    }

    format!(
        "{}: Mapped[{}] = relationship({})",
        relation.attribute,
        optional(target, relation.nullable, imports),
        args.join(", ")
    )
}

fn optional(annotation: String, nullable: bool, imports: &mut ImportCollector) -> String {
    if nullable {
        imports.add("typing", "Optional");
        format!("Optional[{}]", annotation)
    } else {
        annotation
    }
}

fn func(function: DbFunction) -> &'static str {
    match function {
        DbFunction::CurrentTimestamp => "func.now()",
        DbFunction::CurrentDate => "func.current_date()",
        DbFunction::CurrentTime => "func.current_time()",
    }
}

fn string_list(values: &[String]) -> String {
    let values: Vec<_> = values.iter().map(|v| string_literal(v)).collect();
    format!("[{}]", values.join(", "))
}
