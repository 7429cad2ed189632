use crate::error::Result;
use crate::types::{Ident, SqlValue};

/// Represents a WHERE clause condition.
///
/// `Raw` fragments are trusted SQL and are appended verbatim. Everything else
/// renders with validated identifiers and bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    /// Trusted SQL text, not parsed or validated
    Raw(String),
    /// column = value
    Eq(String, SqlValue),
    /// clause AND clause
    And(Box<WhereClause>, Box<WhereClause>),
    /// clause OR clause
    Or(Box<WhereClause>, Box<WhereClause>),
}

impl WhereClause {
    /// Creates a condition from trusted SQL text.
    pub fn raw(sql: impl Into<String>) -> Self {
        WhereClause::Raw(sql.into())
    }

    /// Creates an equality condition: column = value
    pub fn eq(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        WhereClause::Eq(column.into(), value.into())
    }

    /// Combines this clause with another using AND
    pub fn and(self, other: WhereClause) -> Self {
        WhereClause::And(Box::new(self), Box::new(other))
    }

    /// Combines this clause with another using OR
    pub fn or(self, other: WhereClause) -> Self {
        WhereClause::Or(Box::new(self), Box::new(other))
    }

    /// Builds the SQL fragment, appending bound values to `params`.
    /// Placeholders continue the numbering of whatever `params` already holds.
    pub fn build_sql(&self, params: &mut Vec<SqlValue>) -> Result<String> {
        match self {
            WhereClause::Raw(sql) => Ok(sql.clone()),
            WhereClause::Eq(column, SqlValue::Null) => {
                Ok(format!("{} IS NULL", Ident::column(column)?))
            }
            WhereClause::Eq(column, value) => {
                let column = Ident::column(column)?;
                params.push(value.clone());
                Ok(format!("{} = ${}", column, params.len()))
            }
            WhereClause::And(left, right) => {
                let left_sql = left.build_sql(params)?;
                let right_sql = right.build_sql(params)?;
                Ok(format!("({}) AND ({})", left_sql, right_sql))
            }
            WhereClause::Or(left, right) => {
                let left_sql = left.build_sql(params)?;
                let right_sql = right.build_sql(params)?;
                Ok(format!("({}) OR ({})", left_sql, right_sql))
            }
        }
    }
}

impl From<&str> for WhereClause {
    fn from(sql: &str) -> Self {
        WhereClause::raw(sql)
    }
}

impl From<String> for WhereClause {
    fn from(sql: String) -> Self {
        WhereClause::Raw(sql)
    }
}
