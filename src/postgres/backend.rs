use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

use super::config::PostgresOptions;
use super::params::Params;
use super::query::build_result_set_from_statement;
use crate::backend::{Backend, QueryOutcome};
use crate::error::SqlMiddlewareDbError;
use crate::translation::PlaceholderStyle;
use crate::types::{DatabaseType, RowValues};

/// `PostgreSQL` backend holding one `tokio_postgres` client.
///
/// The driver's connection future runs on its own task from `connect` until `disconnect`.
/// Inserts report no identifier; use `INSERT ... RETURNING` and a follow-up select when one is
/// needed.
pub struct PostgresBackend {
    options: PostgresOptions,
    client: Option<Client>,
    connection_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PostgresBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresBackend")
            .field("host", &self.options.host)
            .field("dbname", &self.options.dbname)
            .field("connected", &self.client.is_some())
            .finish()
    }
}

impl PostgresBackend {
    #[must_use]
    pub fn new(options: PostgresOptions) -> Self {
        Self {
            options,
            client: None,
            connection_task: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &PostgresOptions {
        &self.options
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    fn placeholder(&self, ordinal: usize) -> String {
        PlaceholderStyle::Postgres.token(ordinal)
    }

    fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    async fn connect(&mut self) -> Result<(), SqlMiddlewareDbError> {
        if self.client.is_some() {
            debug!("postgres: already connected");
            return Ok(());
        }

        let cfg = self.options.to_pg_config()?;
        debug!(host = ?self.options.host, dbname = ?self.options.dbname, "postgres: connecting");
        let (client, connection) = cfg.connect(NoTls).await.map_err(|e| {
            SqlMiddlewareDbError::ConnectionError(format!("Failed to connect to Postgres: {e}"))
        })?;

        let task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "postgres: connection terminated");
            }
        });

        self.client = Some(client);
        self.connection_task = Some(task);
        debug!("postgres: connected");
        Ok(())
    }

    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryOutcome, SqlMiddlewareDbError> {
        let client = self.client.as_ref().ok_or(SqlMiddlewareDbError::NotConnected)?;
        let stmt = client.prepare(sql).await?;
        let converted = Params::convert(params);

        if stmt.columns().is_empty() {
            let changed = client.execute(&stmt, converted.as_refs()).await?;
            let changed = usize::try_from(changed).map_err(|e| {
                SqlMiddlewareDbError::ExecutionError(format!(
                    "postgres affected rows conversion error: {e}"
                ))
            })?;
            return Ok(QueryOutcome::summary(changed, None));
        }

        let rows = client.query(&stmt, converted.as_refs()).await?;
        let result_set = build_result_set_from_statement(&stmt, &rows)?;
        Ok(QueryOutcome::rows(result_set))
    }

    async fn disconnect(&mut self) -> Result<(), SqlMiddlewareDbError> {
        let client = self.client.take().ok_or(SqlMiddlewareDbError::NotConnected)?;
        debug!("postgres: disconnecting");
        // Dropping the client ends the connection future.
        drop(client);
        if let Some(task) = self.connection_task.take() {
            task.await?;
        }
        Ok(())
    }
}
