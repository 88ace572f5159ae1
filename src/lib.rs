//! Composable SQL middleware over a pluggable database backend.
//!
//! Queries are written against a key/value [`State`] using `:name` placeholders. Each query is a
//! middleware; groups run middleware one after the other and stop at the first error. Select
//! results, insert identifiers and single-row columns are folded back into the state so later
//! queries can refer to them by name.
//!
//! ```rust,no_run
//! use sqlmw::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlMiddlewareDbError> {
//! let sql = Sql::new(SqliteBackend::new(SqliteOptions::in_memory()));
//! let create = sql.group([
//!     sql.connect(),
//!     sql.query("CREATE TABLE article (id INTEGER PRIMARY KEY, title TEXT)"),
//!     sql.query("INSERT INTO article (title) VALUES (:title)"),
//!     sql.query("SELECT id, title FROM article WHERE id = :_insertId"),
//! ]);
//! let state = create.call(State::new().with("title", "hello")).await?;
//! assert_eq!(state.get("title"), Some(&RowValues::Text("hello".into())));
//! # Ok(()) }
//! ```

pub mod backend;
pub mod error;
pub mod extension;
pub mod middleware;
pub mod pipeline;
pub mod prelude;
pub mod projection;
pub mod results;
pub mod sql;
pub mod state;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use backend::{Backend, BackendConfig, BackendRegistry, QueryOutcome, SharedBackend};
pub use error::SqlMiddlewareDbError;
pub use middleware::{ArcMiddleware, Middleware, group, middleware_fn};
pub use pipeline::{Callback, Pipeline};
pub use results::{CustomDbRow, ResultSet};
pub use sql::Sql;
pub use state::State;
pub use types::{DatabaseType, RowValues};
