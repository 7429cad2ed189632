use super::{push_where, Statement};
use crate::clauses::WhereClause;
use crate::error::Result;
use crate::types::Ident;

/// Builds `DELETE FROM ... [WHERE ...] RETURNING *`.
/// Without a filter every row of the table is deleted.
#[derive(Debug)]
pub struct DeleteBuilder {
    table: Ident,
    filter: Option<WhereClause>,
}

impl DeleteBuilder {
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

        sql.push_str("DELETE FROM ");
        sql.push_str(self.table.as_sql());
        if let Some(ref filter) = self.filter {
            push_where(&mut sql, filter, &mut params)?;
        }
        sql.push_str(" RETURNING *");

        Ok(Statement { sql, params })
    }
}
