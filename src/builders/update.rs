use super::{push_where, Statement};
use crate::clauses::WhereClause;
use crate::error::{Result, StoreError};
use crate::types::{FieldSet, Ident, SqlValue};

/// Builds `UPDATE ... SET ... WHERE ... RETURNING *`.
/// SET values take the first placeholders, WHERE values follow.
#[derive(Debug)]
pub struct UpdateBuilder {
    table: Ident,
    assignments: Vec<(Ident, SqlValue)>,
    filter: WhereClause,
}

impl UpdateBuilder {
    pub fn new(table: &str, filter: WhereClause, fields: &FieldSet) -> Result<Self> {
        let table = Ident::table(table)?;
        if fields.is_empty() {
            return Err(StoreError::EmptyFieldSet);
        }
        let assignments = fields
            .iter()
            .map(|(column, value)| -> Result<(Ident, SqlValue)> {
                Ok((Ident::column(column)?, value.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            table,
            assignments,
            filter,
        })
    }

    /// Build the SQL statement and its parameters.
    pub fn build_sql(&self) -> Result<Statement> {
        let mut sql = String::with_capacity(128);
        let mut params = Vec::with_capacity(self.assignments.len());

        sql.push_str("UPDATE ");
        sql.push_str(self.table.as_sql());

        sql.push_str(" SET ");
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            params.push(value.clone());
            sql.push_str(column.as_sql());
            sql.push_str(" = $");
            sql.push_str(&params.len().to_string());
        }

        push_where(&mut sql, &self.filter, &mut params)?;
        sql.push_str(" RETURNING *");

        Ok(Statement { sql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_update_with_raw_where() {
        let fields = FieldSet::new().with("first_name", "Jane");
        let statement = UpdateBuilder::new("users", "id=1".into(), &fields)
            .unwrap()
            .build_sql()
            .unwrap();

        assert_eq!(
            statement.sql,
            "UPDATE \"users\" SET \"first_name\" = $1 WHERE id=1 RETURNING *"
        );
        assert_eq!(statement.params, vec![SqlValue::from("Jane")]);
    }

    #[test]
    fn test_where_params_follow_set_params() {
        let fields = FieldSet::new().with("first_name", "Jane").with("active", false);
        let statement = UpdateBuilder::new("users", WhereClause::eq("id", 7i64), &fields)
            .unwrap()
            .build_sql()
            .unwrap();

        assert_eq!(
            statement.sql,
            "UPDATE \"users\" SET \"first_name\" = $1, \"active\" = $2 WHERE \"id\" = $3 RETURNING *"
        );
        assert_eq!(
            statement.params,
            vec![
                SqlValue::from("Jane"),
                SqlValue::Bool(false),
                SqlValue::Int64(7)
            ]
        );
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert_eq!(
            UpdateBuilder::new("users", "id=1".into(), &FieldSet::new()).unwrap_err(),
            StoreError::EmptyFieldSet
        );
    }
}
