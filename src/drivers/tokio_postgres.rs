use std::error::Error;

use async_trait::async_trait;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use tokio_postgres::{Client, NoTls};
use tracing::error;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::traits::{Connection, Connector};
use crate::types::{RawQueryResult, SqlValue};

type BoxError = Box<dyn Error + Sync + Send>;

/// PostgreSQL connector using tokio-postgres without TLS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPostgresConnector;

impl TokioPostgresConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TokioPostgresConnector {
    async fn connect(&self, connection_string: &str) -> Result<Box<dyn Connection>> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        // The connection task ends once the client is dropped
        let handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Box::new(TokioPostgresConnection { client, handle }))
    }
}

/// One open tokio-postgres connection plus the task driving it.
pub struct TokioPostgresConnection {
    client: Client,
    handle: JoinHandle<()>,
}

#[async_trait]
impl Connection for TokioPostgresConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<RawQueryResult> {
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .client
            .query(sql, &param_refs)
            .await
            .map_err(map_query_error)?;

        // Extract column names
        let columns: Vec<String> = match rows.first() {
            Some(row) => row
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            None => Vec::new(),
        };

        let result_rows = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(RawQueryResult::new(columns, result_rows))
    }

    async fn batch_execute(&mut self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql).await.map_err(map_query_error)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let TokioPostgresConnection { client, handle } = *self;
        drop(client);
        handle
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))
    }
}

/// Classify a tokio-postgres error. SQLSTATE class 23 is integrity constraint violation.
fn map_query_error(e: tokio_postgres::Error) -> StoreError {
    if e.is_closed() {
        return StoreError::ConnectionFailed(e.to_string());
    }
    match e.code() {
        Some(state) if state.code().starts_with("23") => {
            StoreError::ConstraintViolation(e.to_string())
        }
        _ => StoreError::QueryFailed(e.to_string()),
    }
}

fn decode_row(row: &tokio_postgres::Row) -> Result<Vec<SqlValue>> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(index, column)| decode_value(row, index, column))
        .collect()
}

/// Convert the value at `index` according to its PostgreSQL type.
fn decode_value(
    row: &tokio_postgres::Row,
    index: usize,
    column: &tokio_postgres::Column,
) -> Result<SqlValue> {
    let value = match *column.type_() {
        Type::BOOL => row.try_get::<_, Option<bool>>(index).map(SqlValue::from),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(index)
            .map(|v| SqlValue::from(v.map(i32::from))),
        Type::INT4 => row.try_get::<_, Option<i32>>(index).map(SqlValue::from),
        Type::INT8 => row.try_get::<_, Option<i64>>(index).map(SqlValue::from),
        Type::OID => row
            .try_get::<_, Option<u32>>(index)
            .map(|v| SqlValue::from(v.map(i64::from))),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(index)
            .map(|v| SqlValue::from(v.map(f64::from))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(index).map(SqlValue::from),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(index).map(SqlValue::from)
        }
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(index)
            .map(SqlValue::from),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(index)
            .map(SqlValue::from),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(index)
            .map(SqlValue::from),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(index)
            .map(SqlValue::from),
        Type::UUID => row.try_get::<_, Option<Uuid>>(index).map(SqlValue::from),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(index)
            .map(SqlValue::from),
        ref other => {
            return Err(StoreError::UnsupportedType {
                column: column.name().to_string(),
                type_name: other.name().to_string(),
            })
        }
    };
    value.map_err(|e| StoreError::QueryFailed(e.to_string()))
}

/// Encodes against the parameter type PostgreSQL inferred for the placeholder.
/// Integer and float widths are converted to fit; other mismatches are errors.
impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) => encode(b, ty, out),
            SqlValue::Int32(i) => encode_int(i64::from(*i), ty, out),
            SqlValue::Int64(i) => encode_int(*i, ty, out),
            SqlValue::Float64(f) => match *ty {
                Type::FLOAT4 => encode(&(*f as f32), ty, out),
                Type::NUMERIC => encode(&Decimal::try_from(*f)?, ty, out),
                _ => encode(f, ty, out),
            },
            SqlValue::Text(s) => encode(s, ty, out),
            SqlValue::Date(d) => encode(d, ty, out),
            SqlValue::Timestamp(t) => encode(t, ty, out),
            SqlValue::TimestampTz(t) => encode(t, ty, out),
            SqlValue::Numeric(d) => encode(d, ty, out),
            SqlValue::Uuid(u) => encode(u, ty, out),
            SqlValue::Json(v) => encode(v, ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn encode_int(value: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => encode(&i16::try_from(value)?, ty, out),
        Type::INT4 => encode(&i32::try_from(value)?, ty, out),
        Type::FLOAT4 => encode(&(value as f32), ty, out),
        Type::FLOAT8 => encode(&(value as f64), ty, out),
        Type::NUMERIC => encode(&Decimal::from(value), ty, out),
        _ => encode(&value, ty, out),
    }
}

fn encode<T: ToSql>(value: &T, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    if !T::accepts(ty) {
        return Err(format!(
            "cannot encode {} as PostgreSQL type {}",
            std::any::type_name::<T>(),
            ty
        )
        .into());
    }
    value.to_sql(ty, out)
}
