use super::{Statement, MAX_BIND_PARAMETERS};
use crate::error::{Result, StoreError};
use crate::types::{FieldSet, Ident, SqlValue};

/// Builds `INSERT ... RETURNING *` for one row or a batch of rows.
#[derive(Debug)]
pub struct InsertBuilder {
    table: Ident,
    columns: Vec<Ident>,
    rows: Vec<Vec<SqlValue>>,
    skip_conflicts: bool,
}

impl InsertBuilder {
    /// Insert of a single row. An empty field set inserts `DEFAULT VALUES`.
    pub fn single(table: &str, fields: &FieldSet) -> Result<Self> {
        let table = Ident::table(table)?;
        let columns = fields
            .columns()
            .map(Ident::column)
            .collect::<Result<Vec<_>>>()?;
        let values = fields.iter().map(|(_, value)| value.clone()).collect();
        Ok(Self {
            table,
            columns,
            rows: vec![values],
            skip_conflicts: false,
        })
    }

    /// Insert of several rows in one statement.
    ///
    /// The first row's keys decide the column list and order. Every other row
    /// must carry exactly the same keys, in any order.
    pub fn batch(table: &str, rows: &[FieldSet]) -> Result<Self> {
        let table = Ident::table(table)?;
        let first = rows.first().ok_or(StoreError::EmptyFieldSet)?;
        if first.is_empty() {
            return Err(StoreError::EmptyFieldSet);
        }

        let names: Vec<&str> = first.columns().collect();
        let columns = names
            .iter()
            .map(|name| Ident::column(name))
            .collect::<Result<Vec<_>>>()?;

        let count = rows.len() * names.len();
        if count > MAX_BIND_PARAMETERS {
            return Err(StoreError::TooManyParameters {
                count,
                limit: MAX_BIND_PARAMETERS,
            });
        }

        let mut values = Vec::with_capacity(rows.len());
        for (index, fields) in rows.iter().enumerate() {
            if fields.len() != names.len() {
                return Err(StoreError::MismatchedColumns { index });
            }
            let row = names
                .iter()
                .map(|name| {
                    fields
                        .get(name)
                        .cloned()
                        .ok_or(StoreError::MismatchedColumns { index })
                })
                .collect::<Result<Vec<_>>>()?;
            values.push(row);
        }

        Ok(Self {
            table,
            columns,
            rows: values,
            skip_conflicts: false,
        })
    }

    /// Add `ON CONFLICT DO NOTHING`; conflicting rows are skipped and not returned.
    pub fn skip_conflicts(mut self) -> Self {
        self.skip_conflicts = true;
        self
    }

    /// Build the SQL statement and its parameters.
    pub fn build_sql(&self) -> Statement {
        let mut sql = String::with_capacity(64 + self.rows.len() * self.columns.len() * 6);
        let mut params = Vec::with_capacity(self.rows.len() * self.columns.len());

        sql.push_str("INSERT INTO ");
        sql.push_str(self.table.as_sql());

        if self.columns.is_empty() {
            sql.push_str(" DEFAULT VALUES");
        } else {
            sql.push_str(" (");
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(col.as_sql());
            }
            sql.push_str(") VALUES ");

            for (r, row) in self.rows.iter().enumerate() {
                if r > 0 {
                    sql.push_str(", ");
                }
                sql.push('(');
                for (i, value) in row.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    params.push(value.clone());
                    sql.push('$');
                    sql.push_str(&params.len().to_string());
                }
                sql.push(')');
            }
        }

        if self.skip_conflicts {
            sql.push_str(" ON CONFLICT DO NOTHING");
        }
        sql.push_str(" RETURNING *");

        Statement { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> FieldSet {
        FieldSet::new().with("first_name", first).with("last_name", last)
    }

    #[test]
    fn test_build_single_insert() {
        let statement = InsertBuilder::single("users", &user("John", "Doe"))
            .unwrap()
            .build_sql();

        assert_eq!(
            statement.sql,
            "INSERT INTO \"users\" (\"first_name\", \"last_name\") VALUES ($1, $2) RETURNING *"
        );
        assert_eq!(
            statement.params,
            vec![SqlValue::from("John"), SqlValue::from("Doe")]
        );
    }

    #[test]
    fn test_build_default_values_insert() {
        let statement = InsertBuilder::single("audit.events", &FieldSet::new())
            .unwrap()
            .build_sql();

        assert_eq!(
            statement.sql,
            "INSERT INTO \"audit\".\"events\" DEFAULT VALUES RETURNING *"
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_build_batch_insert_binds_every_value() {
        let rows = vec![user("John0", "Doe0"), user("John1", "Doe1")];
        let statement = InsertBuilder::batch("users", &rows)
            .unwrap()
            .skip_conflicts()
            .build_sql();

        assert_eq!(
            statement.sql,
            "INSERT INTO \"users\" (\"first_name\", \"last_name\") VALUES ($1, $2), ($3, $4) \
             ON CONFLICT DO NOTHING RETURNING *"
        );
        assert_eq!(
            statement.params,
            vec![
                SqlValue::from("John0"),
                SqlValue::from("Doe0"),
                SqlValue::from("John1"),
                SqlValue::from("Doe1"),
            ]
        );
    }

    #[test]
    fn test_batch_reorders_values_to_first_row_columns() {
        let rows = vec![
            user("John", "Doe"),
            FieldSet::new().with("last_name", "Roe").with("first_name", "Jane"),
        ];
        let statement = InsertBuilder::batch("users", &rows).unwrap().build_sql();

        assert_eq!(statement.params[2], SqlValue::from("Jane"));
        assert_eq!(statement.params[3], SqlValue::from("Roe"));
    }

    #[test]
    fn test_batch_rejects_mismatched_rows() {
        let rows = vec![
            user("John", "Doe"),
            user("Jane", "Roe"),
            FieldSet::new().with("first_name", "Solo"),
        ];
        assert_eq!(
            InsertBuilder::batch("users", &rows).unwrap_err(),
            StoreError::MismatchedColumns { index: 2 }
        );

        let rows = vec![
            user("John", "Doe"),
            FieldSet::new().with("first_name", "Jane").with("email", "j@x.io"),
        ];
        assert_eq!(
            InsertBuilder::batch("users", &rows).unwrap_err(),
            StoreError::MismatchedColumns { index: 1 }
        );
    }

    #[test]
    fn test_batch_rejects_empty_first_row() {
        let rows = vec![FieldSet::new()];
        assert_eq!(
            InsertBuilder::batch("users", &rows).unwrap_err(),
            StoreError::EmptyFieldSet
        );
    }

    #[test]
    fn test_batch_parameter_limit() {
        let wide: FieldSet = (0..100).map(|i| (format!("c{}", i), i)).collect();
        let rows = vec![wide; 700];
        assert_eq!(
            InsertBuilder::batch("wide", &rows).unwrap_err(),
            StoreError::TooManyParameters {
                count: 70_000,
                limit: MAX_BIND_PARAMETERS
            }
        );
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(InsertBuilder::single("users; DROP TABLE users", &user("a", "b")).is_err());
        let bad = FieldSet::new().with("name) VALUES ('x'); --", "y");
        assert!(InsertBuilder::single("users", &bad).is_err());
    }
}
