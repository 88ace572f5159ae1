//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::backend::{
    Backend, BackendConfig, BackendFactory, BackendRegistry, QueryOutcome, SharedBackend,
};
pub use crate::error::SqlMiddlewareDbError;
pub use crate::extension::{BundleRegistry, FactoryBundle, MiddlewareBundle, MiddlewareFactory};
pub use crate::middleware::{
    ArcMiddleware, Group, Middleware, TransactionKeywords, TransactionStep, group, middleware_fn,
};
pub use crate::pipeline::{Callback, Pipeline};
pub use crate::projection::project;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::sql::Sql;
pub use crate::state::{INSERT_ID_KEY, RESULTS_KEY, ROWS_KEY, State};
pub use crate::translation::{CompiledQuery, PlaceholderStyle, StatementKind};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresBackend, PostgresOptions, PostgresOptionsBuilder};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteBackend, SqliteOptions, SqliteOptionsBuilder};
