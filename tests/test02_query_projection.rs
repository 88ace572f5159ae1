mod common;

use common::{Executed, ScriptedBackend};
use sqlmw::prelude::*;

fn executed(journal: &std::sync::Mutex<common::Journal>) -> Vec<Executed> {
    journal.lock().unwrap().executed.clone()
}

#[tokio::test]
async fn placeholders_follow_backend_style() -> Result<(), SqlMiddlewareDbError> {
    let pg = ScriptedBackend::postgres().connected();
    let pg_journal = pg.journal();
    let my = ScriptedBackend::mysql().connected();
    let my_journal = my.journal();

    let state = State::new().with("a", 1).with("b", 2);
    let template = "UPDATE t SET x = 1 WHERE a = :a AND b = :b";
    Sql::new(pg).query(template).call(state.clone()).await?;
    Sql::new(my).query(template).call(state).await?;

    let pg_run = executed(&pg_journal);
    assert_eq!(pg_run[0].sql, "UPDATE t SET x = 1 WHERE a = $1 AND b = $2");
    assert_eq!(pg_run[0].params, vec![RowValues::Int(1), RowValues::Int(2)]);

    let my_run = executed(&my_journal);
    assert_eq!(my_run[0].sql, "UPDATE t SET x = 1 WHERE a = ? AND b = ?");
    assert_eq!(my_run[0].params, pg_run[0].params);
    Ok(())
}

#[tokio::test]
async fn falsy_values_are_left_unresolved() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::postgres().connected();
    let journal = backend.journal();
    let sql = Sql::new(backend);

    sql.query("DELETE FROM t WHERE id = :id")
        .call(State::new().with("id", 0))
        .await?;

    let run = executed(&journal);
    assert_eq!(run[0].sql, "DELETE FROM t WHERE id = :id");
    assert!(run[0].params.is_empty());
    Ok(())
}

#[tokio::test]
async fn single_row_select_projects_columns() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::postgres().connected().then_rows(
        &["id", "title"],
        vec![vec![RowValues::Int(1), RowValues::Text("X".into())]],
    );
    let sql = Sql::new(backend);

    let state = sql
        .query("SELECT id, title FROM article LIMIT 1")
        .call(State::new())
        .await?;

    assert_eq!(state.get("id"), Some(&RowValues::Int(1)));
    assert_eq!(state.get("title"), Some(&RowValues::Text("X".into())));
    let rows = state.rows().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.results[0].get("title"), Some(&RowValues::Text("X".into())));
    assert_eq!(state.results().map(<[ResultSet]>::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn multi_row_select_only_sets_rows() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::postgres().connected().then_rows(
        &["id"],
        vec![vec![RowValues::Int(1)], vec![RowValues::Int(2)], vec![RowValues::Int(3)]],
    );
    let sql = Sql::new(backend);

    let state = sql.query("select id from article").call(State::new()).await?;

    assert_eq!(state.rows().map(ResultSet::len), Some(3));
    assert!(!state.contains_key("id"));
    Ok(())
}

#[tokio::test]
async fn selected_values_feed_later_queries() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::postgres()
        .then_rows(&["target_user_id"], vec![vec![RowValues::Int(12)]]);
    let journal = backend.journal();
    let sql = Sql::new(backend);

    let replace = sql.group([
        sql.connect(),
        sql.query("SELECT user_id AS target_user_id FROM reg WHERE number = :target"),
        sql.query("UPDATE auth SET user_id = :spare WHERE user_id = :target_user_id"),
    ]);
    replace
        .call(State::new().with("target", 3).with("spare", 9))
        .await?;

    let run = executed(&journal);
    assert_eq!(run.len(), 2);
    assert_eq!(run[1].sql, "UPDATE auth SET user_id = $1 WHERE user_id = $2");
    assert_eq!(run[1].params, vec![RowValues::Int(9), RowValues::Int(12)]);
    Ok(())
}

#[tokio::test]
async fn insert_sets_insert_id() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::postgres()
        .connected()
        .then_insert(RowValues::Int(7))
        .then_insert(RowValues::Int(8));
    let sql = Sql::new(backend);

    let state = sql
        .query("insert into article (title) values (:title)")
        .call(State::new().with("title", "t"))
        .await?;
    assert_eq!(state.insert_id(), Some(&RowValues::Int(7)));
    assert!(state.rows().is_none());

    // classification is a plain prefix match
    let state = sql
        .query("  INSERT INTO article (title) VALUES (:title)")
        .call(State::new().with("title", "t"))
        .await?;
    assert!(state.insert_id().is_none());
    Ok(())
}

#[tokio::test]
async fn failed_query_stops_the_group() {
    let backend = ScriptedBackend::postgres()
        .connected()
        .then_fail("syntax error");
    let journal = backend.journal();
    let sql = Sql::new(backend);

    let chain = sql.group([sql.query("SELEC 1"), sql.query("SELECT 2")]);
    let err = chain.call(State::new()).await.unwrap_err();

    assert!(matches!(err, SqlMiddlewareDbError::ExecutionError(ref m) if m == "syntax error"));
    assert_eq!(executed(&journal).len(), 1);
}

#[tokio::test]
async fn query_without_connection_fails() {
    let sql = Sql::new(ScriptedBackend::postgres());
    let err = sql.query("SELECT 1").call(State::new()).await.unwrap_err();
    assert!(matches!(err, SqlMiddlewareDbError::NotConnected));
}

#[tokio::test]
async fn connect_is_idempotent_disconnect_is_not() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::postgres();
    let journal = backend.journal();
    let sql = Sql::new(backend);

    sql.group([sql.connect(), sql.connect(), sql.disconnect()])
        .call(State::new())
        .await?;
    {
        let journal = journal.lock().unwrap();
        assert_eq!(journal.connects, 1);
        assert_eq!(journal.disconnects, 1);
    }

    let err = sql.disconnect().call(State::new()).await.unwrap_err();
    assert!(matches!(err, SqlMiddlewareDbError::NotConnected));
    Ok(())
}

#[tokio::test]
async fn transaction_keywords_follow_dialect() -> Result<(), SqlMiddlewareDbError> {
    let backend = ScriptedBackend::mysql().connected();
    let journal = backend.journal();
    let sql = Sql::new(backend);

    sql.group([sql.begin()?, sql.assign("step", "work"), sql.commit()?, sql.rollback()?])
        .call(State::new())
        .await?;

    let statements: Vec<String> = executed(&journal).into_iter().map(|e| e.sql).collect();
    assert_eq!(statements, ["START TRANSACTION", "COMMIT", "ROLLBACK"]);

    let other = Sql::new(ScriptedBackend::new(DatabaseType::Other));
    assert!(matches!(other.begin(), Err(SqlMiddlewareDbError::ConfigError(_))));
    Ok(())
}

#[tokio::test]
async fn assign_writes_state() -> Result<(), SqlMiddlewareDbError> {
    let sql = Sql::new(ScriptedBackend::postgres());
    let state = sql
        .group([sql.assign("game_id", 4), sql.assign("", 1)])
        .call(State::new())
        .await?;
    assert_eq!(state.get("game_id"), Some(&RowValues::Int(4)));
    assert_eq!(state.len(), 1);
    Ok(())
}
