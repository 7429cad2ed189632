use super::{push_where, Statement};
use crate::clauses::WhereClause;
use crate::error::Result;
use crate::types::Ident;

/// Builds `SELECT * FROM ... [WHERE ...]`.
#[derive(Debug)]
pub struct SelectBuilder {
    table: Ident,
    filter: Option<WhereClause>,
}

impl SelectBuilder {
    pub fn new(table: &str, filter: Option<WhereClause>) -> Result<Self> {
        Ok(Self {
            table: Ident::table(table)?,
            filter,
        })
    }

    /// Build the SQL statement and its parameters.
    pub fn build_sql(&self) -> Result<Statement> {
        let mut sql = String::with_capacity(64);
        let mut params = Vec::new();

        sql.push_str("SELECT * FROM ");
        sql.push_str(self.table.as_sql());
        if let Some(ref filter) = self.filter {
            push_where(&mut sql, filter, &mut params)?;
        }

        Ok(Statement { sql, params })
    }
}
