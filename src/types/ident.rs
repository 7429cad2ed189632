use std::fmt;

use crate::error::{Result, StoreError};

/// PostgreSQL truncates identifiers longer than NAMEDATALEN - 1 bytes.
const MAX_IDENT_LEN: usize = 63;

/// A table or column name that passed the identifier allow-list.
///
/// Each part must match `[A-Za-z_][A-Za-z0-9_$]*`. Names fold to lower case,
/// as PostgreSQL does for unquoted identifiers, and are then double-quoted so
/// reserved words are allowed. `Users` and `users` name the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    sql: String,
}

impl Ident {
    /// Validates a column name (a single identifier part).
    pub fn column(name: &str) -> Result<Self> {
        check_part(name, name)?;
        Ok(Self {
            sql: quote(name),
        })
    }

    /// Validates a table name, optionally schema-qualified (`schema.table`).
    pub fn table(name: &str) -> Result<Self> {
        let sql = match name.split_once('.') {
            Some((schema, table)) => {
                check_part(schema, name)?;
                check_part(table, name)?;
                format!("{}.{}", quote(schema), quote(table))
            }
            None => {
                check_part(name, name)?;
                quote(name)
            }
        };
        Ok(Self { sql })
    }

    /// Returns the quoted form to splice into statement text.
    pub fn as_sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

fn check_part(part: &str, whole: &str) -> Result<()> {
    let mut chars = part.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid_start && valid_rest && part.len() <= MAX_IDENT_LEN {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(whole.to_string()))
    }
}

fn quote(part: &str) -> String {
    format!("\"{}\"", part.to_ascii_lowercase())
}
