use crate::error::{Result, StoreError};
use crate::types::SqlValue;

/// Driver-agnostic raw result from a database query.
/// Values are already decoded into [`SqlValue`] by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// A single row result from a query.
/// Columns keep the order the database returned them in.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<(String, SqlValue)>,
}

impl Row {
    /// Creates a new Row from column names and values.
    pub(crate) fn new(columns: &[String], values: Vec<SqlValue>) -> Self {
        let values = columns.iter().cloned().zip(values).collect();
        Self { values }
    }

    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| StoreError::ColumnNotFound(column.to_string()))
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl IntoIterator for Row {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Result of a query execution, containing zero or more rows.
#[derive(Debug)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl QueryResult {
    /// Creates a QueryResult from a RawQueryResult.
    pub fn from_raw(raw: RawQueryResult) -> Self {
        let rows = raw
            .rows
            .into_iter()
            .map(|values| Row::new(&raw.columns, values))
            .collect();
        Self {
            columns: raw.columns,
            rows,
        }
    }

    /// Extracts at most one row from the result.
    /// Returns an error if the result contains more than one row.
    pub fn at_most_one(self) -> Result<Option<Row>> {
        if self.rows.len() > 1 {
            return Err(StoreError::UnexpectedRowCount {
                expected: 1,
                actual: self.rows.len(),
            });
        }
        Ok(self.rows.into_iter().next())
    }

    /// Returns all rows from the result.
    pub fn rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns a reference to the rows without consuming the result.
    pub fn rows_ref(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the column names from this result.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of rows in this result.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this result contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_rows(ids: &[i32]) -> RawQueryResult {
        RawQueryResult {
            columns: vec!["id".to_string()],
            rows: ids.iter().map(|id| vec![SqlValue::Int32(*id)]).collect(),
        }
    }

    #[test]
    fn test_row_get() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let values = vec![SqlValue::Int32(1), SqlValue::Text("John".to_string())];
        let row = Row::new(&columns, values);

        assert_eq!(row.get("id").unwrap(), &SqlValue::Int32(1));
        assert_eq!(row.get("name").unwrap().as_str(), Some("John"));
        assert_eq!(
            row.get("missing").unwrap_err(),
            StoreError::ColumnNotFound("missing".to_string())
        );
        assert_eq!(row.columns(), vec!["id", "name"]);
    }

    #[test]
    fn test_query_result_at_most_one() {
        let result = QueryResult::from_raw(id_rows(&[1]));
        let row = result.at_most_one().unwrap().unwrap();
        assert_eq!(row.get("id").unwrap(), &SqlValue::Int32(1));
    }

    #[test]
    fn test_query_result_at_most_one_on_empty() {
        let result = QueryResult::from_raw(id_rows(&[]));
        assert!(result.at_most_one().unwrap().is_none());
    }

    #[test]
    fn test_query_result_at_most_one_error_on_multiple() {
        let result = QueryResult::from_raw(id_rows(&[1, 2]));
        let err = result.at_most_one().unwrap_err();
        match err {
            StoreError::UnexpectedRowCount { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            _ => panic!("Expected UnexpectedRowCount error"),
        }
    }
}
