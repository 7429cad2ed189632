//! Statement assembly for each operation the store performs.
//!
//! Identifiers are validated and quoted, values are always bound as `$n`
//! parameters. Only [`WhereClause::Raw`](crate::WhereClause::Raw) fragments
//! reach the statement text unchanged.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;

use crate::clauses::WhereClause;
use crate::error::Result;
use crate::types::SqlValue;

/// Maximum number of bind parameters the PostgreSQL protocol allows in one statement.
pub const MAX_BIND_PARAMETERS: usize = 65535;

/// SQL text plus the values bound to its `$n` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

fn push_where(sql: &mut String, filter: &WhereClause, params: &mut Vec<SqlValue>) -> Result<()> {
    sql.push_str(" WHERE ");
    let where_sql = filter.build_sql(params)?;
    sql.push_str(&where_sql);
    Ok(())
}
