//! Classification of `COLUMN_DEFAULT` values.

/// Server-side functions that stand for "the current time".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFunction {
    CurrentTimestamp,
    CurrentDate,
    CurrentTime,
}

/// A column default as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// A constant, with surrounding quotes removed.
    Literal(String),
    /// A recognized "current time" function.
    Function(DbFunction),
    /// Any other default expression, kept verbatim.
    Expression(String),
}

impl DefaultValue {
    /// Classify a raw `COLUMN_DEFAULT` together with the column's `EXTRA` flags.
    ///
    /// A "current time" name is only a function when the catalog marks the
    /// default as generated or the column is temporal (`temporal`); MySQL 8
    /// reports a string literal `'now'` as bare `now`.
    ///
    /// Returns `None` when the column has no default (or defaults to `NULL`).
    pub fn classify(raw: Option<&str>, extra: &str, temporal: bool) -> Option<Self> {
        let raw = raw?;
        let trimmed = raw.trim();
        let generated = extra.to_ascii_lowercase().contains("default_generated");

        if !generated && trimmed.eq_ignore_ascii_case("null") {
            return None;
        }
        if generated || temporal {
            if let Some(function) = current_time_function(trimmed) {
                return Some(DefaultValue::Function(function));
            }
        }
        if generated {
            return Some(DefaultValue::Expression(trimmed.to_string()));
        }
        if let Some(inner) = trimmed
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
        {
            return Some(DefaultValue::Literal(inner.replace("''", "'")));
        }
        Some(DefaultValue::Literal(raw.to_string()))
    }
}

fn current_time_function(expr: &str) -> Option<DbFunction> {
    let mut expr = expr.trim();
    while let Some(inner) = expr.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        expr = inner.trim();
    }
    let upper = expr.to_ascii_uppercase();

    // strip an optional `(fsp)` / `()` call suffix
    let name = match upper.find('(') {
        Some(open) if upper.ends_with(')') => {
            let args = &upper[open + 1..upper.len() - 1];
            if !args.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
                return None;
            }
            &upper[..open]
        }
        Some(_) => return None,
        None => upper.as_str(),
    };

    match name.trim() {
        "CURRENT_TIMESTAMP" | "NOW" | "LOCALTIMESTAMP" | "LOCALTIME" => {
            Some(DbFunction::CurrentTimestamp)
        }
        "CURRENT_DATE" | "CURDATE" => Some(DbFunction::CurrentDate),
        "CURRENT_TIME" | "CURTIME" => Some(DbFunction::CurrentTime),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(raw: &str, extra: &str) -> Option<DefaultValue> {
        DefaultValue::classify(Some(raw), extra, false)
    }

    #[test]
    fn test_no_default() {
        assert_eq!(DefaultValue::classify(None, "", true), None);
        assert_eq!(classify("NULL", ""), None);
    }

    #[test]
    fn test_literals() {
        assert_eq!(classify("0", ""), Some(DefaultValue::Literal("0".into())));
        assert_eq!(
            classify("active", ""),
            Some(DefaultValue::Literal("active".into()))
        );
        // MariaDB quotes string defaults
        assert_eq!(
            classify("'it''s'", ""),
            Some(DefaultValue::Literal("it's".into()))
        );
        assert_eq!(classify("", ""), Some(DefaultValue::Literal("".into())));
    }

    #[test]
    fn test_current_time_functions() {
        for raw in [
            "CURRENT_TIMESTAMP",
            "current_timestamp()",
            "CURRENT_TIMESTAMP(3)",
            "now()",
            "(now())",
            "LOCALTIMESTAMP",
        ] {
            assert_eq!(
                classify(raw, "DEFAULT_GENERATED"),
                Some(DefaultValue::Function(DbFunction::CurrentTimestamp)),
                "{raw}"
            );
        }
        assert_eq!(
            classify("curdate()", "DEFAULT_GENERATED"),
            Some(DefaultValue::Function(DbFunction::CurrentDate))
        );
        // MySQL 5.7 has no DEFAULT_GENERATED flag
        assert_eq!(
            DefaultValue::classify(Some("CURRENT_TIME"), "", true),
            Some(DefaultValue::Function(DbFunction::CurrentTime))
        );
    }

    #[test]
    fn test_function_names_on_text_columns_are_literals() {
        for raw in ["now", "localtime", "curdate", "CURRENT_TIMESTAMP"] {
            assert_eq!(
                classify(raw, ""),
                Some(DefaultValue::Literal(raw.into())),
                "{raw}"
            );
        }
        assert_eq!(
            DefaultValue::classify(Some("2020-01-01"), "", true),
            Some(DefaultValue::Literal("2020-01-01".into()))
        );
    }

    #[test]
    fn test_other_expressions() {
        assert_eq!(
            classify("uuid()", "DEFAULT_GENERATED"),
            Some(DefaultValue::Expression("uuid()".into()))
        );
        assert_eq!(
            classify("(now() + interval 1 day)", "DEFAULT_GENERATED"),
            Some(DefaultValue::Expression("(now() + interval 1 day)".into()))
        );
    }
}
