//! Parsing of MySQL `COLUMN_TYPE` strings.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Normalized base type of a column.
///
/// `Other` keeps every name the parser does not recognize (spatial types,
/// `set`, `bit`, ...). The type mapper rejects it instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Decimal,
    Float,
    Double,
    Char,
    VarChar,
    TinyText,
    Text,
    MediumText,
    LongText,
    Binary,
    VarBinary,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    Boolean,
    Enum,
    Json,
    Other(String),
}

impl BaseType {
    fn from_name(name: &str) -> Self {
        match name {
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "mediumint" => Self::MediumInt,
            "int" | "integer" => Self::Int,
            "bigint" => Self::BigInt,
            "decimal" | "numeric" | "dec" | "fixed" => Self::Decimal,
            "float" => Self::Float,
            "double" | "real" => Self::Double,
            "char" => Self::Char,
            "varchar" => Self::VarChar,
            "tinytext" => Self::TinyText,
            "text" => Self::Text,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "binary" => Self::Binary,
            "varbinary" => Self::VarBinary,
            "tinyblob" => Self::TinyBlob,
            "blob" => Self::Blob,
            "mediumblob" => Self::MediumBlob,
            "longblob" => Self::LongBlob,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "time" => Self::Time,
            "year" => Self::Year,
            "bool" | "boolean" => Self::Boolean,
            "enum" => Self::Enum,
            "json" => Self::Json,
            other => Self::Other(other.to_string()),
        }
    }

    /// Integer family, any width.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::MediumInt | Self::Int | Self::BigInt
        )
    }

    /// Temporal types that can carry a "current time" default.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTime | Self::Timestamp | Self::Time
        )
    }
}

/// A parsed column type, e.g. `decimal(10,2) unsigned` or `enum('a','b')`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    pub base: BaseType,
    /// Display width or character length (`int(11)`, `varchar(255)`).
    pub length: Option<u32>,
    /// Numeric precision, or fractional-seconds precision for temporal types.
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub unsigned: bool,
    /// Literals of an `enum(...)` (or `set(...)`) declaration, in declaration order.
    pub values: Vec<String>,
    raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type")]
    Empty,
    #[error("unbalanced parentheses in '{0}'")]
    Unbalanced(String),
    #[error("invalid type argument '{arg}' in '{raw}'")]
    InvalidArgument { raw: String, arg: String },
    #[error("unterminated literal in '{0}'")]
    UnterminatedLiteral(String),
}

impl NativeType {
    /// Parse a `COLUMN_TYPE` string.
    pub fn parse(raw: &str) -> Result<Self, TypeParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeParseError::Empty);
        }

        let name_end = trimmed
            .find(|c: char| c == '(' || c.is_whitespace())
            .unwrap_or(trimmed.len());
        let name = trimmed[..name_end].to_ascii_lowercase();
        let mut rest = trimmed[name_end..].trim_start();

        let mut ty = NativeType {
            base: BaseType::from_name(&name),
            length: None,
            precision: None,
            scale: None,
            unsigned: false,
            values: Vec::new(),
            raw: trimmed.to_string(),
        };

        if rest.starts_with('(') {
            let close =
                closing_paren(rest).ok_or_else(|| TypeParseError::Unbalanced(ty.raw.clone()))?;
            let args = &rest[1..close];
            rest = rest[close + 1..].trim_start();

            if matches!(ty.base, BaseType::Enum) || name == "set" {
                ty.values = parse_literals(args).ok_or_else(|| {
                    TypeParseError::UnterminatedLiteral(ty.raw.clone())
                })?;
            } else {
                ty.apply_numeric_args(args)?;
            }
        } else if rest.contains(['(', ')']) {
            return Err(TypeParseError::Unbalanced(ty.raw.clone()));
        }

        // `zerofill` and the `precision` of `double precision` carry no mapping information
        ty.unsigned = rest
            .split_whitespace()
            .any(|modifier| modifier.eq_ignore_ascii_case("unsigned"));

        Ok(ty)
    }

    fn apply_numeric_args(&mut self, args: &str) -> Result<(), TypeParseError> {
        let numbers = args
            .split(',')
            .map(|arg| {
                arg.trim()
                    .parse::<u32>()
                    .map_err(|_| TypeParseError::InvalidArgument {
                        raw: self.raw.clone(),
                        arg: arg.trim().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match (&self.base, numbers.as_slice()) {
            (BaseType::Decimal | BaseType::Float | BaseType::Double, [p]) => {
                self.precision = Some(*p);
            }
            (BaseType::Decimal | BaseType::Float | BaseType::Double, [p, s]) => {
                self.precision = Some(*p);
                self.scale = Some(*s);
            }
            (BaseType::DateTime | BaseType::Timestamp | BaseType::Time, [fsp]) => {
                self.precision = Some(*fsp);
            }
            (_, [n]) => self.length = Some(*n),
            _ => {
                return Err(TypeParseError::InvalidArgument {
                    raw: self.raw.clone(),
                    arg: args.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The type string as reported by the catalog.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `boolean`, or the width-1 `tinyint` MySQL uses to store it.
    pub fn is_boolean(&self) -> bool {
        match self.base {
            BaseType::Boolean => true,
            BaseType::TinyInt => self.length == Some(1),
            _ => false,
        }
    }
}

impl FromStr for NativeType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Byte offset of the `)` matching the `(` at offset 0, skipping quoted literals.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut chars = s.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if in_quotes => {
                chars.next();
            }
            '\'' if in_quotes => {
                if matches!(chars.peek(), Some((_, '\''))) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '\'' => in_quotes = true,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse `'a','b''c','d\'e'` into its literals, preserving order.
fn parse_literals(args: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = args.chars().peekable();

    while let Some(c) = chars.next() {
        if !in_quotes {
            // commas and whitespace between literals
            if c == '\'' {
                in_quotes = true;
            }
            continue;
        }
        match c {
            '\\' => current.push(chars.next()?),
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                current.push('\'');
            }
            '\'' => {
                values.push(std::mem::take(&mut current));
                in_quotes = false;
            }
            _ => current.push(c),
        }
    }

    if in_quotes { None } else { Some(values) }
}
