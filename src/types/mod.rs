mod field_set;
mod ident;
mod row;
mod sql_value;

pub use field_set::FieldSet;
pub use ident::Ident;
pub use row::{QueryResult, RawQueryResult, Row};
pub use sql_value::SqlValue;
