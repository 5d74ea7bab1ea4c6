//! End-to-end builder chains against the scripted executor.

use panelorm::{
    Direction, FieldMap, MockExecutor, Op, OrmError, Outcome, QueryBuilder, Row, StatementKind,
    Value, row,
};

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

#[tokio::test]
async fn create_chain_returns_generated_id() {
    let exec = MockExecutor::new();
    exec.push_insert_id(42);

    let outcome = users()
        .create(row! { "id" => 1, "name" => "Ana" })
        .get(&exec)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Created { id: 42 });

    let log = exec.statements();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, StatementKind::Insert);
    assert_eq!(
        log[0].sql,
        "INSERT INTO users (id, full_name) VALUES ($1, $2) RETURNING id"
    );
    assert_eq!(log[0].params, vec![Value::Int(1), Value::Text("Ana".into())]);
}

#[tokio::test]
async fn create_failure_surfaces_as_execution_error() {
    let exec = MockExecutor::new();
    exec.push_insert_error("duplicate key");

    let err = users()
        .create(row! { "name" => "Ana" })
        .get(&exec)
        .await
        .unwrap_err();
    assert!(err.is_execution());
}

#[tokio::test]
async fn read_by_id_returns_rows_keyed_by_logical_names() {
    let exec = MockExecutor::new();
    exec.push_rows(vec![row! { "id" => 1, "name" => "Ana" }]);

    let rows = users().read(row! { "id" => 1 }).fetch(&exec).await.unwrap();
    assert_eq!(rows, vec![row! { "id" => 1, "name" => "Ana" }]);

    let log = exec.statements();
    assert_eq!(
        log[0].sql,
        "SELECT id AS id, full_name AS name FROM users WHERE 1=1 AND id = $1"
    );
    assert_eq!(log[0].params, vec![Value::Int(1)]);
}

#[tokio::test]
async fn fetch_one_reports_not_found() {
    let exec = MockExecutor::new();

    let err = users()
        .read(row! { "id" => 9 })
        .fetch_one(&exec)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() {
    let exec = MockExecutor::new();
    exec.push_affected(1);
    exec.push_affected(0);

    let updated = users()
        .update(row! { "id" => 7, "name" => "Bea" })
        .get(&exec)
        .await
        .unwrap();
    assert_eq!(updated, Outcome::Affected(1));

    let deleted = users().delete(row! { "id" => 8 }).get(&exec).await.unwrap();
    assert_eq!(deleted, Outcome::Affected(0));

    let log = exec.statements();
    assert_eq!(log[0].sql, "UPDATE users SET full_name = $1 WHERE id = $2");
    assert_eq!(log[1].sql, "DELETE FROM users WHERE id = $1");
}

#[tokio::test]
async fn missing_id_never_reaches_the_executor() {
    let exec = MockExecutor::new();

    let err = users()
        .update(row! { "name" => "Bea" })
        .get(&exec)
        .await
        .unwrap_err();
    assert_eq!(err, OrmError::missing_identifier("update"));
    assert!(exec.statements().is_empty());
}

#[tokio::test]
async fn join_chain_runs_one_grouped_select() {
    let exec = MockExecutor::new();
    exec.push_rows(vec![
        row! { "id" => 1, "name" => "admin", "roles_id" => 3 },
    ]);

    let rows = users()
        .join(&roles(), "user_id", "id")
        .filter("roles.role_name", Op::Eq, "admin")
        .order_by("users.id", Direction::Desc)
        .fetch(&exec)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("roles_id"), Some(&Value::Int(3)));

    let log = exec.statements();
    assert_eq!(log.len(), 1);
    let sql = &log[0].sql;
    assert!(sql.contains("roles.id AS roles_id"));
    assert!(sql.contains("ON roles.id::varchar = users.user_id::varchar"));
    assert!(sql.contains("AND roles.role_name = $1"));
    assert!(sql.contains("GROUP BY users.id, users.full_name, roles.id, roles.role_name"));
    assert!(sql.ends_with("ORDER BY users.id DESC"));
}

#[tokio::test]
async fn latest_reads_most_recent_record() {
    let exec = MockExecutor::new();
    exec.push_rows(vec![row! { "id" => 99, "name" => "Zoe" }]);

    let last = users().read(Row::new()).latest().fetch_one(&exec).await.unwrap();
    assert_eq!(last.id(), Some(&Value::Int(99)));

    assert!(
        exec.statements()[0]
            .sql
            .ends_with("WHERE 1=1 ORDER BY id DESC LIMIT 1")
    );
}

#[tokio::test]
async fn empty_chain_is_a_dispatch_error() {
    let exec = MockExecutor::new();
    let err = users().get(&exec).await.unwrap_err();
    assert!(matches!(err, OrmError::Dispatch(_)));
    assert!(exec.statements().is_empty());
}
