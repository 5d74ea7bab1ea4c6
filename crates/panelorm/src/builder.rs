//! The field-mapped, single-shot query builder.
//!
//! A [`QueryBuilder`] is constructed once per logical query, mutated through a
//! chain of calls, executed with [`get`](QueryBuilder::get), and discarded.
//! Each chain method records which operation was invoked last; `get()`
//! dispatches on that tag to the matching finisher (insert / query / execute)
//! and runs exactly one statement through the injected [`Executor`].
//!
//! Problems detected while the chain is being assembled — an unknown logical
//! field, a missing id on `update`/`delete`/`find` — are stashed in the
//! builder and surfaced at `get()` before any I/O. Malformed SQL is never
//! sent to the executor.
//!
//! ```ignore
//! let users = QueryBuilder::new("users", FieldMap::new([("id", "id"), ("name", "full_name")])?)?;
//!
//! let rows = users
//!     .read(row! { "name" => "Ana" })
//!     .order_by("full_name", Direction::Asc)
//!     .fetch(&exec)
//!     .await?;
//! ```

use crate::error::{OrmError, OrmResult};
use crate::executor::Executor;
use crate::field_map::FieldMap;
use crate::ident::{check_column_ref, check_ident};
use crate::row::Row;
use crate::value::Value;
use std::fmt;

/// Tag recording which builder method was invoked last; drives `get()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Join,
}

/// Comparison operator for [`QueryBuilder::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// column = value
    Eq,
    /// column != value
    Ne,
    /// column > value
    Gt,
    /// column >= value
    Gte,
    /// column < value
    Lt,
    /// column <= value
    Lte,
    /// column LIKE pattern
    Like,
}

impl Op {
    fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "LIKE",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort direction for [`QueryBuilder::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        })
    }
}

/// Result of [`QueryBuilder::get`], shaped by the recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// INSERT finished; carries the generated id.
    Created { id: i64 },
    /// SELECT finished; rows keyed by logical field names.
    Rows(Vec<Row>),
    /// UPDATE/DELETE finished; number of affected rows.
    Affected(u64),
}

/// A mutable, per-chain SQL builder bound to one table and one field map.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    field_map: FieldMap,
    /// Most recent input payload (`create`/`read`); consumed by `find`.
    last_request: Option<Row>,
    op: Option<Operation>,
    /// Base statement for the recorded operation.
    sql: String,
    group_clause: String,
    order_clauses: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    params: Vec<Value>,
    /// First problem detected while chaining; surfaced at `get()`.
    build_error: Option<OrmError>,
}

impl QueryBuilder {
    /// Create a builder for `table` with a validated field map.
    ///
    /// Fails fast on a bad table name; the field map validates itself at its
    /// own construction (non-empty, `"id"` entry present).
    pub fn new(table: impl Into<String>, field_map: FieldMap) -> OrmResult<Self> {
        let table = table.into();
        check_ident(&table)?;
        Ok(Self {
            table,
            field_map,
            last_request: None,
            op: None,
            sql: String::new(),
            group_clause: String::new(),
            order_clauses: Vec::new(),
            limit: None,
            offset: None,
            params: Vec::new(),
            build_error: None,
        })
    }

    /// Target table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The field map this builder maps logical names through.
    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// The operation recorded so far, if any.
    pub fn operation(&self) -> Option<Operation> {
        self.op
    }

    /// Bound parameter values, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// A clean builder over the same table and field map.
    fn fresh(&self) -> Self {
        Self {
            table: self.table.clone(),
            field_map: self.field_map.clone(),
            last_request: None,
            op: None,
            sql: String::new(),
            group_clause: String::new(),
            order_clauses: Vec::new(),
            limit: None,
            offset: None,
            params: Vec::new(),
            build_error: None,
        }
    }

    fn fail(mut self, err: OrmError) -> Self {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
        self
    }

    /// Push a bound parameter, returning its 1-based placeholder index.
    fn bind(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// The id column, table-qualified when the chain is a join.
    fn id_column_ref(&self) -> String {
        let id_col = self.field_map.id_column();
        if self.op == Some(Operation::Join) {
            format!("{}.{}", self.table, id_col)
        } else {
            id_col.to_string()
        }
    }

    // ==================== Operations ====================

    /// Record an INSERT of `data`, iterated in its insertion order.
    ///
    /// Each key is mapped through the field map to its physical column and
    /// each value becomes a bound parameter.
    pub fn create(mut self, data: Row) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if data.is_empty() {
            return self.fail(OrmError::validation("create requires at least one field"));
        }
        let mut columns = Vec::with_capacity(data.len());
        let mut placeholders = Vec::with_capacity(data.len());
        for (name, value) in data.iter() {
            let Some(column) = self.field_map.column(name) else {
                let table = self.table.clone();
                return self.fail(OrmError::unknown_field(table, name));
            };
            columns.push(column.to_string());
            let idx = self.bind(value.clone());
            placeholders.push(format!("${idx}"));
        }
        self.sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        self.last_request = Some(data);
        self.op = Some(Operation::Create);
        self
    }

    /// Record a SELECT over every mapped field, filtered by `filters`.
    ///
    /// Each field map entry becomes `<column> AS <logical>`, so result rows
    /// key by logical names. Filters are ANDed onto a `WHERE 1=1` base, one
    /// bound parameter each.
    pub fn read(mut self, filters: Row) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        let select: Vec<String> = self
            .field_map
            .iter()
            .map(|(logical, column)| format!("{column} AS {logical}"))
            .collect();
        let mut sql = format!(
            "SELECT {} FROM {} WHERE 1=1",
            select.join(", "),
            self.table
        );
        for (name, value) in filters.iter() {
            let Some(column) = self.field_map.column(name) else {
                let table = self.table.clone();
                return self.fail(OrmError::unknown_field(table, name));
            };
            let column = column.to_string();
            let idx = self.bind(value.clone());
            sql.push_str(&format!(" AND {column} = ${idx}"));
        }
        self.sql = sql;
        self.last_request = Some(filters);
        self.op = Some(Operation::Read);
        self
    }

    /// Record an UPDATE of `data`.
    ///
    /// The `id` key is extracted, excluded from the SET list, and used for
    /// the WHERE clause. A payload without an id is rejected before any SQL
    /// is assembled.
    pub fn update(mut self, data: Row) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        let Some(id) = data.get("id").cloned() else {
            return self.fail(OrmError::missing_identifier("update"));
        };
        let mut set_parts = Vec::new();
        for (name, value) in data.iter() {
            if name == "id" {
                continue;
            }
            let Some(column) = self.field_map.column(name) else {
                let table = self.table.clone();
                return self.fail(OrmError::unknown_field(table, name));
            };
            let column = column.to_string();
            let idx = self.bind(value.clone());
            set_parts.push(format!("{column} = ${idx}"));
        }
        if set_parts.is_empty() {
            return self.fail(OrmError::validation(
                "update requires at least one non-id field",
            ));
        }
        let idx = self.bind(id);
        self.sql = format!(
            "UPDATE {} SET {} WHERE {} = ${idx}",
            self.table,
            set_parts.join(", "),
            self.field_map.id_column()
        );
        self.op = Some(Operation::Update);
        self
    }

    /// Record a DELETE targeting `data["id"]`.
    pub fn delete(mut self, data: Row) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        let Some(id) = data.get("id").cloned() else {
            return self.fail(OrmError::missing_identifier("delete"));
        };
        let idx = self.bind(id);
        self.sql = format!(
            "DELETE FROM {} WHERE {} = ${idx}",
            self.table,
            self.field_map.id_column()
        );
        self.op = Some(Operation::Delete);
        self
    }

    /// Record an INNER JOIN against `other`'s table.
    ///
    /// The select list covers every mapped column of both tables, aliased to
    /// logical names, except `other`'s id which is aliased
    /// `<other_table>_id` to avoid colliding with this table's id. Join
    /// columns are compared as varchar, tolerating schemas that mix int and
    /// string ids, and a GROUP BY over every selected column is always
    /// appended, which dedups rows the join would otherwise multiply.
    pub fn join(mut self, other: &QueryBuilder, local_col: &str, other_col: &str) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if let Err(err) = check_ident(local_col).and_then(|()| check_ident(other_col)) {
            return self.fail(err);
        }
        let mut select = Vec::new();
        let mut group = Vec::new();
        for (logical, column) in self.field_map.iter() {
            select.push(format!("{}.{column} AS {logical}", self.table));
            group.push(format!("{}.{column}", self.table));
        }
        for (logical, column) in other.field_map.iter() {
            if logical == "id" {
                select.push(format!("{0}.{column} AS {0}_id", other.table));
            } else {
                select.push(format!("{}.{column} AS {logical}", other.table));
            }
            group.push(format!("{}.{column}", other.table));
        }
        self.sql = format!(
            "SELECT {} FROM {} INNER JOIN {} ON {}.{}::varchar = {}.{}::varchar WHERE 1=1",
            select.join(", "),
            self.table,
            other.table,
            other.table,
            other_col,
            self.table,
            local_col
        );
        self.group_clause = format!(" GROUP BY {}", group.join(", "));
        self.op = Some(Operation::Join);
        self
    }

    // ==================== Refinements ====================

    fn refinable(&self) -> bool {
        matches!(self.op, Some(Operation::Read | Operation::Join))
    }

    /// Append `AND <column> <op> $n` to a read/join chain.
    ///
    /// The column is a raw (validated) reference, optionally table-qualified;
    /// it is not mapped through the field map. The value is bound.
    pub fn filter(mut self, column: &str, op: Op, value: impl Into<Value>) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if !self.refinable() {
            return self.fail(OrmError::validation(
                "filter can only refine a read or join chain",
            ));
        }
        if let Err(err) = check_column_ref(column) {
            return self.fail(err);
        }
        let idx = self.bind(value.into());
        self.sql
            .push_str(&format!(" AND {column} {} ${idx}", op.as_sql()));
        self
    }

    /// Append an ORDER BY clause to a read/join chain.
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if !self.refinable() {
            return self.fail(OrmError::validation(
                "order_by can only refine a read or join chain",
            ));
        }
        if let Err(err) = check_column_ref(column) {
            return self.fail(err);
        }
        self.order_clauses.push(format!("{column} {direction}"));
        self
    }

    /// Target the single row whose id came in with the most recent payload.
    ///
    /// Intended for chaining after `read` with no filters: the id is taken
    /// from the stored request payload and ANDed onto the WHERE clause.
    pub fn find(mut self) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if !self.refinable() {
            return self.fail(OrmError::validation(
                "find can only refine a read or join chain",
            ));
        }
        let id = self
            .last_request
            .as_ref()
            .and_then(|request| request.id().cloned());
        let Some(id) = id else {
            return self.fail(OrmError::missing_identifier("find"));
        };
        let column = self.id_column_ref();
        let idx = self.bind(id);
        self.sql.push_str(&format!(" AND {column} = ${idx}"));
        self
    }

    /// Most-recent-record idiom: `ORDER BY <id> DESC LIMIT 1`.
    pub fn latest(mut self) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if !self.refinable() {
            return self.fail(OrmError::validation(
                "latest can only refine a read or join chain",
            ));
        }
        let column = self.id_column_ref();
        self.order_clauses.push(format!("{column} DESC"));
        self.limit = Some(1);
        self
    }

    /// Set LIMIT on a read/join chain.
    pub fn limit(mut self, n: i64) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if !self.refinable() {
            return self.fail(OrmError::validation(
                "limit can only refine a read or join chain",
            ));
        }
        self.limit = Some(n);
        self
    }

    /// Set OFFSET on a read/join chain.
    pub fn offset(mut self, n: i64) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        if !self.refinable() {
            return self.fail(OrmError::validation(
                "offset can only refine a read or join chain",
            ));
        }
        self.offset = Some(n);
        self
    }

    // ==================== Finishers ====================

    fn select_statement(&self) -> String {
        let mut sql = self.sql.clone();
        sql.push_str(&self.group_clause);
        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clauses.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        sql
    }

    /// The statement `get()` would execute, or the deferred chain error.
    pub fn to_sql(&self) -> OrmResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        match self.op {
            None => Err(OrmError::dispatch("no operation recorded before get()")),
            Some(Operation::Create) => Ok(format!(
                "{} RETURNING {}",
                self.sql,
                self.field_map.id_column()
            )),
            Some(Operation::Read | Operation::Join) => Ok(self.select_statement()),
            Some(Operation::Update | Operation::Delete) => Ok(self.sql.clone()),
        }
    }

    /// Execute the chain: dispatch on the recorded operation to the matching
    /// finisher and run exactly one statement.
    pub async fn get(&self, exec: &impl Executor) -> OrmResult<Outcome> {
        let sql = self.to_sql()?;
        let op = self.op.expect("to_sql checked the operation");
        tracing::debug!(sql = %sql, params = self.params.len(), ?op, "executing statement");
        let outcome = match op {
            Operation::Create => exec
                .insert(&sql, &self.params)
                .await
                .map(|id| Outcome::Created { id }),
            Operation::Read | Operation::Join => exec
                .query(&sql, &self.params)
                .await
                .map(Outcome::Rows),
            Operation::Update | Operation::Delete => exec
                .execute(&sql, &self.params)
                .await
                .map(Outcome::Affected),
        };
        outcome.inspect_err(|err| tracing::warn!(error = %err, sql = %sql, "statement failed"))
    }

    /// Execute a read/join chain and return its rows.
    pub async fn fetch(&self, exec: &impl Executor) -> OrmResult<Vec<Row>> {
        match self.get(exec).await? {
            Outcome::Rows(rows) => Ok(rows),
            _ => Err(OrmError::dispatch("fetch requires a read or join chain")),
        }
    }

    /// Execute a read/join chain and return its first row, or `NotFound`.
    pub async fn fetch_one(&self, exec: &impl Executor) -> OrmResult<Row> {
        self.fetch(exec)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OrmError::not_found(format!("no row in {}", self.table)))
    }

    // ==================== Upsert-with-diff-check ====================

    /// [`get_or_create_by`](Self::get_or_create_by) keyed on `"id"`.
    pub async fn get_or_create(&self, data: Row, exec: &impl Executor) -> OrmResult<Row> {
        self.get_or_create_by(data, "id", exec).await
    }

    /// Read-if-exists, create-if-absent, update-if-changed.
    ///
    /// 1. If `data[key]` is present, read by that key.
    /// 2. No row found: create `data`, then re-read the canonical stored row.
    /// 3. Row found and `data` differs from it: carry the stored id into
    ///    `data`, update, then re-read.
    /// 4. Row found and equal: return it unchanged, no write issued.
    ///
    /// The diff check compares exactly and typed, over the fields present in
    /// the input payload: `Int(5)` differs from `Text("5")`.
    pub async fn get_or_create_by(
        &self,
        mut data: Row,
        key: &str,
        exec: &impl Executor,
    ) -> OrmResult<Row> {
        let existing = match data.get(key) {
            Some(value) => {
                let mut filter = Row::new();
                filter.insert(key, value.clone());
                self.fresh().read(filter).fetch(exec).await?.into_iter().next()
            }
            None => None,
        };

        match existing {
            None => {
                let outcome = self.fresh().create(data).get(exec).await?;
                let Outcome::Created { id } = outcome else {
                    return Err(OrmError::dispatch("create finisher returned no id"));
                };
                let mut by_id = Row::new();
                by_id.insert("id", Value::Int(id));
                self.fresh().read(by_id).fetch_one(exec).await
            }
            Some(stored) => {
                let changed = data
                    .iter()
                    .any(|(name, value)| stored.get(name) != Some(value));
                if !changed {
                    return Ok(stored);
                }
                let id = stored
                    .id()
                    .cloned()
                    .ok_or_else(|| OrmError::missing_identifier("get_or_create"))?;
                data.insert("id", id.clone());
                self.fresh().update(data).get(exec).await?;
                let mut by_id = Row::new();
                by_id.insert("id", id);
                self.fresh().read(by_id).fetch_one(exec).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn users() -> QueryBuilder {
        QueryBuilder::new(
            "users",
            FieldMap::new([("id", "id"), ("name", "full_name")]).unwrap(),
        )
        .unwrap()
    }

    fn roles() -> QueryBuilder {
        QueryBuilder::new(
            "roles",
            FieldMap::new([("id", "id"), ("name", "role_name")]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_table_name() {
        let map = FieldMap::new([("id", "id")]).unwrap();
        assert!(QueryBuilder::new("users; drop", map).is_err());
    }

    #[test]
    fn create_binds_every_field_in_payload_order() {
        let qb = users().create(row! { "id" => 1, "name" => "Ana" });
        assert_eq!(
            qb.to_sql().unwrap(),
            "INSERT INTO users (id, full_name) VALUES ($1, $2) RETURNING id"
        );
        assert_eq!(qb.params(), &[Value::Int(1), Value::Text("Ana".into())]);
        assert_eq!(qb.operation(), Some(Operation::Create));
    }

    #[test]
    fn create_rejects_unknown_field() {
        let err = users()
            .create(row! { "id" => 1, "mail" => "a@b" })
            .to_sql()
            .unwrap_err();
        assert_eq!(err, OrmError::unknown_field("users", "mail"));
    }

    #[test]
    fn create_rejects_empty_payload() {
        let err = users().create(Row::new()).to_sql().unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));
    }

    #[test]
    fn read_without_filters_is_where_1_eq_1() {
        let qb = users().read(Row::new());
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT id AS id, full_name AS name FROM users WHERE 1=1"
        );
        assert!(qb.params().is_empty());
    }

    #[test]
    fn read_maps_filter_keys_through_field_map() {
        let qb = users().read(row! { "name" => "Ana" });
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT id AS id, full_name AS name FROM users WHERE 1=1 AND full_name = $1"
        );
        assert_eq!(qb.params(), &[Value::Text("Ana".into())]);
    }

    #[test]
    fn update_excludes_id_from_set_and_targets_it_in_where() {
        let qb = users().update(row! { "id" => 7, "name" => "Bea" });
        let sql = qb.to_sql().unwrap();
        assert_eq!(sql, "UPDATE users SET full_name = $1 WHERE id = $2");
        assert_eq!(qb.params(), &[Value::Text("Bea".into()), Value::Int(7)]);
    }

    #[test]
    fn update_without_id_is_rejected() {
        let err = users().update(row! { "name" => "Bea" }).to_sql().unwrap_err();
        assert_eq!(err, OrmError::missing_identifier("update"));
    }

    #[test]
    fn update_with_only_id_is_rejected() {
        let err = users().update(row! { "id" => 7 }).to_sql().unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));
    }

    #[test]
    fn delete_targets_id_column() {
        let qb = users().delete(row! { "id" => 7 });
        assert_eq!(qb.to_sql().unwrap(), "DELETE FROM users WHERE id = $1");
        assert_eq!(qb.params(), &[Value::Int(7)]);
    }

    #[test]
    fn delete_without_id_is_rejected() {
        let err = users().delete(Row::new()).to_sql().unwrap_err();
        assert_eq!(err, OrmError::missing_identifier("delete"));
    }

    #[test]
    fn join_aliases_both_tables_and_groups_every_column() {
        let qb = users().join(&roles(), "user_id", "id");
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT users.id AS id, users.full_name AS name, \
             roles.id AS roles_id, roles.role_name AS name \
             FROM users INNER JOIN roles \
             ON roles.id::varchar = users.user_id::varchar WHERE 1=1 \
             GROUP BY users.id, users.full_name, roles.id, roles.role_name"
        );
    }

    #[test]
    fn join_rejects_bad_column_names() {
        let err = users().join(&roles(), "user id", "id").to_sql().unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn filter_appends_bound_condition() {
        let qb = users()
            .read(Row::new())
            .filter("full_name", Op::Like, "A%");
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT id AS id, full_name AS name FROM users WHERE 1=1 AND full_name LIKE $1"
        );
        assert_eq!(qb.params(), &[Value::Text("A%".into())]);
    }

    #[test]
    fn filter_on_join_accepts_qualified_columns() {
        let qb = users()
            .join(&roles(), "user_id", "id")
            .filter("roles.role_name", Op::Eq, "admin");
        let sql = qb.to_sql().unwrap();
        assert!(sql.contains("AND roles.role_name = $1"));
        // refinements land before the GROUP BY tail
        assert!(sql.ends_with(
            "GROUP BY users.id, users.full_name, roles.id, roles.role_name"
        ));
    }

    #[test]
    fn filter_outside_query_chain_is_rejected() {
        let err = users()
            .create(row! { "id" => 1, "name" => "Ana" })
            .filter("full_name", Op::Eq, "Ana")
            .to_sql()
            .unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));
    }

    #[test]
    fn order_limit_offset_tail() {
        let qb = users()
            .read(Row::new())
            .order_by("full_name", Direction::Asc)
            .limit(10)
            .offset(20);
        assert!(
            qb.to_sql()
                .unwrap()
                .ends_with("ORDER BY full_name ASC LIMIT 10 OFFSET 20")
        );
    }

    #[test]
    fn find_targets_id_from_last_request() {
        let qb = users().read(row! { "id" => 3 }).find();
        // the filter already bound $1; find binds the same id again as $2
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT id AS id, full_name AS name FROM users WHERE 1=1 AND id = $1 AND id = $2"
        );
        assert_eq!(qb.params(), &[Value::Int(3), Value::Int(3)]);
    }

    #[test]
    fn find_without_stored_id_is_rejected() {
        let err = users().read(Row::new()).find().to_sql().unwrap_err();
        assert_eq!(err, OrmError::missing_identifier("find"));
    }

    #[test]
    fn latest_orders_desc_with_limit_one() {
        let qb = users().read(Row::new()).latest();
        assert!(qb.to_sql().unwrap().ends_with("ORDER BY id DESC LIMIT 1"));
    }

    #[test]
    fn get_without_operation_is_a_dispatch_error() {
        let err = users().to_sql().unwrap_err();
        assert!(matches!(err, OrmError::Dispatch(_)));
    }

    #[test]
    fn first_chain_error_wins() {
        let err = users()
            .read(row! { "mail" => "a@b" })
            .find()
            .to_sql()
            .unwrap_err();
        assert_eq!(err, OrmError::unknown_field("users", "mail"));
    }
}
