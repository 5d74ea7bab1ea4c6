//! The injected execution seam between the builder and the database.
//!
//! Execution is a trait rather than free functions so controllers get a real
//! driver and tests get a scripted double. Each builder `get()` maps to
//! exactly one call on this trait.

use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// Executes finished statements with bound parameters.
///
/// Implementations are expected to be synchronous-per-call: one invocation,
/// one round trip, errors returned rather than swallowed.
pub trait Executor: Send + Sync {
    /// Run a SELECT and return its rows, keyed by the column aliases.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Run an UPDATE or DELETE and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Run an INSERT and return the generated id.
    fn insert(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<i64>> + Send;
}

/// Which trait method a recorded statement went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Execute,
    Insert,
}

/// One statement as seen by [`MockExecutor`].
#[derive(Debug, Clone)]
pub struct RecordedStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Scripted in-memory [`Executor`] for tests.
///
/// Responses are queues consumed in order; when a queue runs dry the mock
/// falls back to a neutral answer (no rows, one affected row, a fresh id from
/// an internal counter). Every call is appended to a statement log so tests
/// can assert on SQL text, parameter values, and statement counts.
#[derive(Debug, Default)]
pub struct MockExecutor {
    log: Mutex<Vec<RecordedStatement>>,
    rows: Mutex<VecDeque<OrmResult<Vec<Row>>>>,
    affected: Mutex<VecDeque<OrmResult<u64>>>,
    ids: Mutex<VecDeque<OrmResult<i64>>>,
    next_id: AtomicI64,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `query` response.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.rows.lock().unwrap().push_back(Ok(rows));
    }

    /// Script the next `query` call to fail.
    pub fn push_query_error(&self, message: impl Into<String>) {
        self.rows
            .lock()
            .unwrap()
            .push_back(Err(OrmError::execution(message)));
    }

    /// Script the next `execute` response.
    pub fn push_affected(&self, n: u64) {
        self.affected.lock().unwrap().push_back(Ok(n));
    }

    /// Script the next `insert` response.
    pub fn push_insert_id(&self, id: i64) {
        self.ids.lock().unwrap().push_back(Ok(id));
    }

    /// Script the next `insert` call to fail.
    pub fn push_insert_error(&self, message: impl Into<String>) {
        self.ids
            .lock()
            .unwrap()
            .push_back(Err(OrmError::execution(message)));
    }

    /// Everything executed so far, in order.
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.log.lock().unwrap().clone()
    }

    /// Number of recorded statements of the given kind.
    pub fn count(&self, kind: StatementKind) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    fn record(&self, kind: StatementKind, sql: &str, params: &[Value]) {
        self.log.lock().unwrap().push(RecordedStatement {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

impl Executor for MockExecutor {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        self.record(StatementKind::Query, sql, params);
        let out = self
            .rows
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));
        std::future::ready(out)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        self.record(StatementKind::Execute, sql, params);
        let out = self
            .affected
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(1));
        std::future::ready(out)
    }

    fn insert(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<i64>> + Send {
        self.record(StatementKind::Insert, sql, params);
        let out = self
            .ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1));
        std::future::ready(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let exec = MockExecutor::new();
        exec.push_rows(vec![row! { "id" => 1 }]);
        exec.push_rows(Vec::new());

        let first = exec.query("SELECT 1", &[]).await.unwrap();
        let second = exec.query("SELECT 2", &[]).await.unwrap();
        let third = exec.query("SELECT 3", &[]).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(third.is_empty(), "dry queue falls back to no rows");
    }

    #[tokio::test]
    async fn log_records_sql_and_params() {
        let exec = MockExecutor::new();
        exec.execute("DELETE FROM users WHERE id = $1", &[Value::Int(3)])
            .await
            .unwrap();

        let log = exec.statements();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, StatementKind::Execute);
        assert_eq!(log[0].sql, "DELETE FROM users WHERE id = $1");
        assert_eq!(log[0].params, vec![Value::Int(3)]);
    }

    #[tokio::test]
    async fn insert_ids_count_up_when_unscripted() {
        let exec = MockExecutor::new();
        assert_eq!(exec.insert("INSERT", &[]).await.unwrap(), 1);
        assert_eq!(exec.insert("INSERT", &[]).await.unwrap(), 2);
        exec.push_insert_id(99);
        assert_eq!(exec.insert("INSERT", &[]).await.unwrap(), 99);
    }

    #[tokio::test]
    async fn scripted_errors_surface() {
        let exec = MockExecutor::new();
        exec.push_query_error("connection reset");
        let err = exec.query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_execution());
    }
}
