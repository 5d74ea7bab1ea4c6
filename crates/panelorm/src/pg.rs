//! tokio-postgres backed [`Executor`].

use crate::error::{OrmError, OrmResult};
use crate::executor::Executor;
use crate::row::Row;
use crate::value::Value;
use tokio_postgres::Row as PgRow;
use tokio_postgres::types::{ToSql, Type};

/// [`Executor`] over a live `tokio_postgres::Client`.
///
/// Parameters are bound as `ToSql` trait objects; result columns decode back
/// into the [`Value`] scalar domain by column type. Postgres has no
/// last-insert-id channel, so the builder's create finisher appends
/// `RETURNING <id column>` and [`Executor::insert`] reads the returned row.
pub struct PgExecutor {
    client: tokio_postgres::Client,
}

impl PgExecutor {
    pub fn new(client: tokio_postgres::Client) -> Self {
        Self { client }
    }

    /// Access the wrapped client.
    pub fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }
}

static NULL_PARAM: Option<String> = None;

fn bind_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|value| match value {
            Value::Null => &NULL_PARAM as &(dyn ToSql + Sync),
            Value::Bool(v) => v,
            Value::Int(v) => v,
            Value::Float(v) => v,
            Value::Text(v) => v,
        })
        .collect()
}

fn exec_err(err: tokio_postgres::Error) -> OrmError {
    OrmError::execution(err.to_string())
}

fn decode_column(row: &PgRow, idx: usize) -> OrmResult<Value> {
    let column = &row.columns()[idx];
    let name = column.name();
    let ty = column.type_();
    let decode = |e: tokio_postgres::Error| OrmError::decode(name, e.to_string());

    let value = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx).map_err(decode)?.map(Value::Bool)
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map_err(decode)?
            .map(|v| Value::Int(v as i64))
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map_err(decode)?
            .map(|v| Value::Int(v as i64))
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx).map_err(decode)?.map(Value::Int)
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)
            .map_err(decode)?
            .map(|v| Value::Float(v as f64))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx).map_err(decode)?.map(Value::Float)
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        row.try_get::<_, Option<String>>(idx)
            .map_err(decode)?
            .map(Value::Text)
    } else {
        return Err(OrmError::decode(
            name,
            format!("unsupported column type '{ty}'"),
        ));
    };
    Ok(value.unwrap_or(Value::Null))
}

fn decode_row(row: &PgRow) -> OrmResult<Row> {
    let mut out = Row::new();
    for idx in 0..row.columns().len() {
        let name = row.columns()[idx].name().to_string();
        out.insert(name, decode_column(row, idx)?);
    }
    Ok(out)
}

impl Executor for PgExecutor {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        async move {
            let binds = bind_params(params);
            let rows = self.client.query(sql, &binds).await.map_err(exec_err)?;
            rows.iter().map(decode_row).collect()
        }
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        async move {
            let binds = bind_params(params);
            self.client.execute(sql, &binds).await.map_err(exec_err)
        }
    }

    fn insert(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<i64>> + Send {
        async move {
            let binds = bind_params(params);
            let row = self.client.query_one(sql, &binds).await.map_err(exec_err)?;
            decode_column(&row, 0)?
                .as_int()
                .ok_or_else(|| OrmError::decode(row.columns()[0].name(), "generated id is not an integer"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_one_ref_per_param() {
        let params = vec![
            Value::Int(1),
            Value::Text("Ana".to_string()),
            Value::Null,
            Value::Bool(true),
            Value::Float(2.5),
        ];
        assert_eq!(bind_params(&params).len(), params.len());
    }
}
