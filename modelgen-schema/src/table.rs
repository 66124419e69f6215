use std::collections::{BTreeSet, HashSet};

use modelgen_core::{Error, Result};

use crate::{DefaultValue, NativeType};

/// Target of a single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
}

/// A foreign-key constraint. Columns are in constraint ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub target_table: String,
    pub target_columns: Vec<String>,
}

impl ForeignKey {
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}

/// One column, as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub native_type: NativeType,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub is_autoincrement: bool,
    pub default_value: Option<DefaultValue>,
    /// `ON UPDATE CURRENT_TIMESTAMP`
    pub on_update_timestamp: bool,
    pub is_unique: bool,
    pub is_indexed: bool,
    pub foreign_key: Option<ColumnReference>,
    pub comment: Option<String>,
}

impl ColumnInfo {
    /// A nullable-free, constraint-free column of the given type.
    pub fn new(name: impl Into<String>, native_type: NativeType) -> Self {
        Self {
            name: name.into(),
            native_type,
            nullable: false,
            is_primary_key: false,
            is_autoincrement: false,
            default_value: None,
            on_update_timestamp: false,
            is_unique: false,
            is_indexed: false,
            foreign_key: None,
            comment: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.is_autoincrement = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.is_indexed = true;
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default_value = Some(default);
        self
    }

    pub fn on_update_timestamp(mut self) -> Self {
        self.on_update_timestamp = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ColumnReference {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Literals of an enum column, in declaration order.
    pub fn enum_values(&self) -> Option<&[String]> {
        match self.native_type.base {
            crate::BaseType::Enum => Some(&self.native_type.values),
            _ => None,
        }
    }
}

/// One table, with columns in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    /// Primary-key column names in key order (more than one for composite keys).
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Multi-column unique constraints; single-column ones live on the column.
    pub unique_constraints: Vec<Vec<String>>,
    pub comment: Option<String>,
}

impl TableInfo {
    /// Build a table and derive its primary key and single-column foreign keys
    /// from the column flags.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        let name = name.into();
        let primary_key = columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect();
        let foreign_keys = columns
            .iter()
            .filter_map(|c| {
                c.foreign_key.as_ref().map(|target| ForeignKey {
                    name: format!("fk_{}_{}", name, c.name),
                    columns: vec![c.name.clone()],
                    target_table: target.table.clone(),
                    target_columns: vec![target.column.clone()],
                })
            })
            .collect();

        Self {
            name,
            columns,
            primary_key,
            foreign_keys,
            unique_constraints: Vec::new(),
            comment: None,
        }
    }

    /// Replace the derived primary key with an explicitly ordered one.
    pub fn with_primary_key(mut self, columns: Vec<String>) -> Self {
        for column in &mut self.columns {
            column.is_primary_key = columns.contains(&column.name);
        }
        self.primary_key = columns;
        self
    }

    /// Add a foreign-key constraint. Single-column keys are mirrored onto the column.
    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        if let ([column], [target]) = (fk.columns.as_slice(), fk.target_columns.as_slice()) {
            if let Some(col) = self.columns.iter_mut().find(|c| &c.name == column) {
                col.foreign_key = Some(ColumnReference {
                    table: fk.target_table.clone(),
                    column: target.clone(),
                });
            }
            self.foreign_keys.retain(|existing| existing.columns != fk.columns);
        }
        self.foreign_keys.push(fk);
        self
    }

    pub fn with_unique(mut self, columns: Vec<String>) -> Self {
        if let [column] = columns.as_slice() {
            if let Some(col) = self.columns.iter_mut().find(|c| &c.name == column) {
                col.is_unique = true;
            }
        } else if !self.unique_constraints.contains(&columns) {
            self.unique_constraints.push(columns);
        }
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_composite_primary_key(&self) -> bool {
        self.primary_key.len() > 1
    }

    /// Distinct foreign-key target tables, sorted by name.
    pub fn foreign_key_targets(&self) -> BTreeSet<&str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.target_table.as_str())
            .collect()
    }

    /// Check the invariants the code generators rely on.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::invalid_schema(&self.name, "table has no columns"));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::invalid_schema(
                    &self.name,
                    format!("duplicate column '{}'", column.name),
                ));
            }
            if column.is_primary_key && column.nullable {
                return Err(Error::invalid_schema(
                    &self.name,
                    format!("primary-key column '{}' is nullable", column.name),
                ));
            }
            if column.is_autoincrement
                && !(column.is_primary_key && column.native_type.base.is_integer())
            {
                return Err(Error::invalid_schema(
                    &self.name,
                    format!(
                        "auto-increment column '{}' must be an integer primary key",
                        column.name
                    ),
                ));
            }
        }

        let referenced = self
            .primary_key
            .iter()
            .chain(self.foreign_keys.iter().flat_map(|fk| fk.columns.iter()))
            .chain(self.unique_constraints.iter().flatten());
        for name in referenced {
            if !seen.contains(name.as_str()) {
                return Err(Error::invalid_schema(
                    &self.name,
                    format!("constraint refers to unknown column '{}'", name),
                ));
            }
        }

        for fk in &self.foreign_keys {
            if fk.columns.len() != fk.target_columns.len() {
                return Err(Error::invalid_schema(
                    &self.name,
                    format!("foreign key '{}' has mismatched column lists", fk.name),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use modelgen_core::ErrorKind;

    use super::*;

    fn col(name: &str, ty: &str) -> ColumnInfo {
        ColumnInfo::new(name, NativeType::parse(ty).unwrap())
    }

    fn order_table() -> TableInfo {
        TableInfo::new(
            "order",
            vec![
                col("id", "int").primary_key().autoincrement(),
                col("user_id", "int").references("user", "id"),
                col("seller_id", "int").nullable().references("user", "id"),
                col("coupon_id", "int").nullable().references("coupon", "id"),
            ],
        )
    }

    #[test]
    fn test_new_derives_keys() {
        let table = order_table();

        assert_eq!(table.primary_key, vec!["id"]);
        assert_eq!(table.foreign_keys.len(), 3);
        assert_eq!(table.foreign_keys[0].columns, vec!["user_id"]);
        assert_eq!(table.foreign_keys[0].target_table, "user");
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_foreign_key_targets_are_distinct_and_sorted() {
        let table = order_table();
        let targets: Vec<_> = table.foreign_key_targets().into_iter().collect();
        assert_eq!(targets, vec!["coupon", "user"]);
    }

    #[test]
    fn test_with_foreign_key_mirrors_single_column() {
        let table = TableInfo::new(
            "post",
            vec![col("id", "int").primary_key(), col("author", "int")],
        )
        .with_foreign_key(ForeignKey {
            name: "post_author_fk".into(),
            columns: vec!["author".into()],
            target_table: "user".into(),
            target_columns: vec!["id".into()],
        });

        assert_eq!(
            table.column("author").unwrap().foreign_key,
            Some(ColumnReference {
                table: "user".into(),
                column: "id".into()
            })
        );
        assert_eq!(table.foreign_keys.len(), 1);
        assert_eq!(table.foreign_keys[0].name, "post_author_fk");
    }

    #[test]
    fn test_composite_keys() {
        let table = TableInfo::new(
            "line",
            vec![
                col("order_id", "int"),
                col("line_no", "int"),
                col("sku", "varchar(20)"),
                col("warehouse", "varchar(8)"),
            ],
        )
        .with_primary_key(vec!["order_id".into(), "line_no".into()])
        .with_foreign_key(ForeignKey {
            name: "line_stock_fk".into(),
            columns: vec!["sku".into(), "warehouse".into()],
            target_table: "stock".into(),
            target_columns: vec!["sku".into(), "warehouse".into()],
        })
        .with_unique(vec!["sku".into(), "warehouse".into()]);

        assert!(table.has_composite_primary_key());
        assert!(table.column("line_no").unwrap().is_primary_key);
        assert!(table.column("sku").unwrap().foreign_key.is_none());
        assert_eq!(table.unique_constraints.len(), 1);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_enum_values() {
        let column = col("status", "enum('a','b','c')");
        assert_eq!(column.enum_values(), Some(&["a".to_string(), "b".into(), "c".into()][..]));
        assert_eq!(col("name", "varchar(3)").enum_values(), None);
    }

    #[test]
    fn test_validate_rejects_broken_tables() {
        let empty = TableInfo::new("empty", vec![]);
        assert_eq!(empty.validate().unwrap_err().kind(), ErrorKind::Schema);

        let nullable_pk = TableInfo::new("t", vec![col("id", "int").primary_key().nullable()]);
        assert!(nullable_pk.validate().is_err());

        let serial_text = TableInfo::new(
            "t",
            vec![col("id", "varchar(4)").primary_key().autoincrement()],
        );
        assert!(serial_text.validate().is_err());

        let dangling = TableInfo::new("t", vec![col("id", "int")])
            .with_primary_key(vec!["missing".into()]);
        assert!(dangling.validate().is_err());
    }
}
