//! Backend adapter capability: one implementation per SQL dialect/driver.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::SqlMiddlewareDbError;
use crate::results::ResultSet;
use crate::types::{DatabaseType, RowValues};

pub mod registry;

pub use registry::{BackendConfig, BackendFactory, BackendRegistry};

/// What a backend reports for one executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    /// Rows, for statements that return them.
    pub rows: Option<ResultSet>,
    /// Rows changed, for statements that do not return rows.
    pub rows_affected: usize,
    /// Identifier assigned by an insert, when the driver reports one.
    pub insert_id: Option<RowValues>,
}

impl QueryOutcome {
    #[must_use]
    pub fn rows(rows: ResultSet) -> Self {
        Self {
            rows_affected: rows.len(),
            rows: Some(rows),
            insert_id: None,
        }
    }

    #[must_use]
    pub fn summary(rows_affected: usize, insert_id: Option<RowValues>) -> Self {
        Self {
            rows: None,
            rows_affected,
            insert_id,
        }
    }
}

/// Connection, query and placeholder behavior of one database dialect.
///
/// A backend holds at most one live connection. `connect` on a connected backend succeeds
/// without opening a second one; `query` and `disconnect` without a connection fail with
/// [`SqlMiddlewareDbError::NotConnected`].
#[async_trait]
pub trait Backend: Send {
    /// Dialect, used to look up transaction keywords.
    fn database_type(&self) -> DatabaseType;

    /// Positional parameter token for the 1-based `ordinal`. Pure.
    fn placeholder(&self, ordinal: usize) -> String;

    fn is_connected(&self) -> bool;

    async fn connect(&mut self) -> Result<(), SqlMiddlewareDbError>;

    /// Execute `sql` with `params` bound positionally.
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryOutcome, SqlMiddlewareDbError>;

    async fn disconnect(&mut self) -> Result<(), SqlMiddlewareDbError>;
}

/// Backend handle shared by the middleware built from one [`crate::Sql`].
pub type SharedBackend = Arc<Mutex<Box<dyn Backend>>>;

pub(crate) fn share(backend: Box<dyn Backend>) -> SharedBackend {
    Arc::new(Mutex::new(backend))
}
