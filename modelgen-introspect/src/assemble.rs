//! Turning raw catalog rows into the schema model.

use indexmap::IndexMap;
use modelgen_core::{Error, Result};
use modelgen_schema::{ColumnInfo, DefaultValue, ForeignKey, NativeType, TableInfo};

use crate::catalog::{ConstraintKind, RawColumn, RawConstraint, RawIndex, RawTable};

/// Build and validate one table from its catalog rows.
pub(crate) fn assemble_table(
    table: &RawTable,
    columns: Vec<RawColumn>,
    constraints: Vec<RawConstraint>,
    indexes: Vec<RawIndex>,
) -> Result<TableInfo> {
    let columns = columns
        .into_iter()
        .map(|raw| column_info(&table.name, raw))
        .collect::<Result<Vec<_>>>()?;

    let mut info = TableInfo::new(&table.name, columns);
    if let Some(comment) = table.comment.as_deref().filter(|c| !c.is_empty()) {
        info = info.with_comment(comment);
    }

    // a foreign key and a unique key may share a name; a key column row
    // only belongs to the foreign key when it references something
    let constraints = constraints.into_iter().filter(|c| {
        let matches = (c.kind == ConstraintKind::ForeignKey) == c.referenced_table.is_some();
        if !matches {
            log::debug!(
                "{}: skipping cross-matched {:?} row for '{}'",
                table.name,
                c.kind,
                c.name
            );
        }
        matches
    });
    let constraint_key = |c: &RawConstraint| (format!("{:?}/{}", c.kind, c.name), c.position);
    for group in group_by_name(constraints, constraint_key) {
        let kind = group[0].kind;
        let columns: Vec<String> = group.iter().map(|c| c.column.clone()).collect();
        info = match kind {
            ConstraintKind::PrimaryKey => info.with_primary_key(columns),
            ConstraintKind::Unique => info.with_unique(columns),
            ConstraintKind::ForeignKey => {
                let target_table = group[0].referenced_table.clone().ok_or_else(|| {
                    Error::invalid_schema(
                        &table.name,
                        format!("foreign key '{}' has no referenced table", group[0].name),
                    )
                })?;
                let target_columns = group
                    .iter()
                    .map(|c| c.referenced_column.clone().unwrap_or_default())
                    .collect();
                info.with_foreign_key(ForeignKey {
                    name: group[0].name.clone(),
                    columns,
                    target_table,
                    target_columns,
                })
            }
        };
    }

    for group in group_by_name(indexes, |i| (i.name.clone(), i.position)) {
        let columns: Vec<String> = group.iter().map(|i| i.column.clone()).collect();
        if group[0].unique {
            info = info.with_unique(columns);
        } else if let [column] = columns.as_slice() {
            if let Some(col) = info.columns.iter_mut().find(|c| &c.name == column) {
                col.is_indexed = true;
            }
        }
    }

    info.validate()?;
    Ok(info)
}

fn column_info(table: &str, raw: RawColumn) -> Result<ColumnInfo> {
    // a type the parser cannot read has no mapping either
    let native_type = NativeType::parse(&raw.column_type)
        .map_err(|_| Error::unsupported_type(table, &raw.name, &raw.column_type))?;
    let extra = raw.extra.to_ascii_lowercase();

    let temporal = native_type.base.is_temporal();
    let mut column = ColumnInfo::new(raw.name, native_type);
    column.nullable = raw.nullable;
    column.is_autoincrement = extra.contains("auto_increment");
    column.on_update_timestamp = extra.contains("on update");
    column.default_value = DefaultValue::classify(raw.default.as_deref(), &extra, temporal);
    column.comment = raw.comment.filter(|c| !c.is_empty());
    Ok(column)
}

/// Group rows sharing a name, keeping first-seen group order and sorting each
/// group by its position.
fn group_by_name<T>(
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> (String, i64),
) -> Vec<Vec<T>> {
    let mut groups: IndexMap<String, Vec<(i64, T)>> = IndexMap::new();
    for row in rows {
        let (name, position) = key(&row);
        groups.entry(name).or_default().push((position, row));
    }
    groups
        .into_values()
        .map(|mut group| {
            group.sort_by_key(|(position, _)| *position);
            group.into_iter().map(|(_, row)| row).collect()
        })
        .collect()
}
