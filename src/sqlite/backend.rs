use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rusqlite::Connection;
use tracing::debug;

use super::config::SqliteOptions;
use super::params::Params;
use super::query::build_result_set;
use crate::backend::{Backend, QueryOutcome};
use crate::error::SqlMiddlewareDbError;
use crate::translation::PlaceholderStyle;
use crate::types::{DatabaseType, RowValues};

type SharedConnection = Arc<Mutex<Connection>>;

/// `SQLite` backend holding one rusqlite connection.
///
/// rusqlite is synchronous, so every call runs on tokio's blocking pool.
#[derive(Debug)]
pub struct SqliteBackend {
    options: SqliteOptions,
    conn: Option<SharedConnection>,
}

impl SqliteBackend {
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        Self {
            options,
            conn: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }

    async fn with_connection<F, R>(&self, f: F) -> Result<R, SqlMiddlewareDbError>
    where
        F: FnOnce(&Connection) -> Result<R, SqlMiddlewareDbError> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(self.conn.as_ref().ok_or(SqlMiddlewareDbError::NotConnected)?);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&guard)
        })
        .await?
    }
}

fn execute(
    conn: &Connection,
    sql: &str,
    params: &Params,
) -> Result<QueryOutcome, SqlMiddlewareDbError> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() > 0 {
        let rows = build_result_set(&mut stmt, params.as_values())?;
        return Ok(QueryOutcome::rows(rows));
    }

    let changed = stmt.execute(rusqlite::params_from_iter(params.as_values()))?;
    // last_insert_rowid is connection-wide; only trust it when this statement changed rows.
    let insert_id = (changed > 0).then(|| RowValues::Int(conn.last_insert_rowid()));
    Ok(QueryOutcome::summary(changed, insert_id))
}

#[async_trait]
impl Backend for SqliteBackend {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn placeholder(&self, ordinal: usize) -> String {
        PlaceholderStyle::Sqlite.token(ordinal)
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    async fn connect(&mut self) -> Result<(), SqlMiddlewareDbError> {
        if self.conn.is_some() {
            debug!(db_path = %self.options.db_path, "sqlite: already connected");
            return Ok(());
        }

        debug!(db_path = %self.options.db_path, "sqlite: opening connection");
        let db_path = self.options.db_path.clone();
        let wal = self.options.wal && !self.options.is_in_memory();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            if wal {
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                    row.get::<_, String>(0)
                })?;
            }
            Ok::<_, SqlMiddlewareDbError>(conn)
        })
        .await??;

        self.conn = Some(Arc::new(Mutex::new(conn)));
        Ok(())
    }

    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryOutcome, SqlMiddlewareDbError> {
        let sql = sql.to_owned();
        let params = Params::convert(params);
        self.with_connection(move |conn| execute(conn, &sql, &params))
            .await
    }

    async fn disconnect(&mut self) -> Result<(), SqlMiddlewareDbError> {
        let conn = self.conn.take().ok_or(SqlMiddlewareDbError::NotConnected)?;
        debug!(db_path = %self.options.db_path, "sqlite: closing connection");
        match Arc::try_unwrap(conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().unwrap_or_else(PoisonError::into_inner);
                tokio::task::spawn_blocking(move || conn.close().map_err(|(_, e)| e)).await??;
            }
            Err(_) => debug!("sqlite: connection still in use by a worker, dropping handle"),
        }
        Ok(())
    }
}
