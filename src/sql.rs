use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{Backend, BackendConfig, BackendRegistry, SharedBackend, share};
use crate::error::SqlMiddlewareDbError;
use crate::extension::{BundleRegistry, MiddlewareBundle, MiddlewareFactory};
use crate::middleware::{
    ArcMiddleware, Assign, Connect, Disconnect, Query, TransactionKeywords, TransactionStep, group,
};
use crate::pipeline::Pipeline;
use crate::types::{DatabaseType, RowValues};

/// Orchestration object: owns one backend handle and builds middleware against it.
///
/// ```rust,no_run
/// use sqlmw::prelude::*;
///
/// # async fn demo() -> Result<(), SqlMiddlewareDbError> {
/// let sql = Sql::new(SqliteBackend::new(SqliteOptions::in_memory()));
///
/// let replace_player = sql.group([
///     sql.connect(),
///     sql.query("SELECT user_id AS target_user_id FROM reg WHERE number=:target"),
///     sql.query("UPDATE auth SET user_id=:spare_user_id WHERE user_id=:target_user_id"),
/// ]);
///
/// let state = State::new().with("target", 3).with("spare_user_id", 9);
/// replace_player.call(state).await?;
/// # Ok(()) }
/// ```
pub struct Sql {
    backend: SharedBackend,
    database_type: DatabaseType,
    extensions: HashMap<String, MiddlewareFactory>,
}

impl fmt::Debug for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.extensions.keys().collect();
        names.sort();
        f.debug_struct("Sql")
            .field("database_type", &self.database_type)
            .field("extensions", &names)
            .finish_non_exhaustive()
    }
}

impl Sql {
    /// Take exclusive ownership of `backend`.
    #[must_use]
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    #[must_use]
    pub fn from_boxed(backend: Box<dyn Backend>) -> Self {
        let database_type = backend.database_type();
        Self {
            backend: share(backend),
            database_type,
            extensions: HashMap::new(),
        }
    }

    /// Build the backend registered under `name` and wrap it.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` for an unknown backend name or invalid options.
    pub fn from_registry(
        registry: &BackendRegistry,
        name: &str,
        config: &BackendConfig,
    ) -> Result<Self, SqlMiddlewareDbError> {
        registry.build(name, config).map(Self::from_boxed)
    }

    /// The backend handle shared by every middleware built from this object.
    #[must_use]
    pub fn backend(&self) -> SharedBackend {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    /// Middleware that connects the backend if it is not connected yet.
    #[must_use]
    pub fn connect(&self) -> ArcMiddleware {
        Arc::new(Connect::new(self.backend()))
    }

    /// Middleware that disconnects the backend.
    #[must_use]
    pub fn disconnect(&self) -> ArcMiddleware {
        Arc::new(Disconnect::new(self.backend()))
    }

    /// Middleware running `template` with `:name` placeholders resolved from state.
    #[must_use]
    pub fn query(&self, template: impl Into<String>) -> ArcMiddleware {
        Arc::new(Query::new(self.backend(), template))
    }

    /// Sequential chain of `members`.
    #[must_use]
    pub fn group(&self, members: impl IntoIterator<Item = ArcMiddleware>) -> ArcMiddleware {
        group(members)
    }

    /// Middleware setting `key` to `value`.
    #[must_use]
    pub fn assign(&self, key: impl Into<String>, value: impl Into<RowValues>) -> ArcMiddleware {
        Arc::new(Assign::new(key, value))
    }

    /// Transaction-control middleware for this backend's dialect.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the dialect has no transaction keywords.
    pub fn transaction(
        &self,
        step: TransactionStep,
    ) -> Result<ArcMiddleware, SqlMiddlewareDbError> {
        let keywords = TransactionKeywords::for_database(self.database_type).ok_or_else(|| {
            SqlMiddlewareDbError::ConfigError(format!(
                "No {step:?} statement known for backend {:?}",
                self.database_type
            ))
        })?;
        Ok(self.query(keywords.statement(step)))
    }

    /// # Errors
    /// See [`Sql::transaction`].
    pub fn begin(&self) -> Result<ArcMiddleware, SqlMiddlewareDbError> {
        self.transaction(TransactionStep::Begin)
    }

    /// # Errors
    /// See [`Sql::transaction`].
    pub fn commit(&self) -> Result<ArcMiddleware, SqlMiddlewareDbError> {
        self.transaction(TransactionStep::Commit)
    }

    /// # Errors
    /// See [`Sql::transaction`].
    pub fn rollback(&self) -> Result<ArcMiddleware, SqlMiddlewareDbError> {
        self.transaction(TransactionStep::Rollback)
    }

    /// Install every factory of `bundle` under its name, returning how many were installed.
    ///
    /// Entries without a factory are skipped with a warning; the remaining entries are still
    /// installed. A name installed twice keeps the latest factory.
    pub fn use_bundle(&mut self, bundle: &dyn MiddlewareBundle) -> usize {
        let mut installed = 0;
        for (name, factory) in bundle.factories() {
            match factory {
                Some(factory) => {
                    debug!(%name, "use: installing middleware factory");
                    self.extensions.insert(name, factory);
                    installed += 1;
                }
                None => warn!(%name, "use: entry does not provide a middleware factory, skipping"),
            }
        }
        installed
    }

    /// Resolve a bundle by name from `registry` and install it.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if `registry` has no bundle named `name`.
    pub fn use_named(
        &mut self,
        name: &str,
        registry: &BundleRegistry,
    ) -> Result<usize, SqlMiddlewareDbError> {
        let bundle = registry.resolve(name)?;
        Ok(self.use_bundle(bundle.as_ref()))
    }

    #[must_use]
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// Build the installed extension `name` with `args`.
    ///
    /// The returned [`Pipeline`] accepts an optional state and an optional callback; without a
    /// callback, errors are reported through `tracing`.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if no extension is installed under `name`, or
    /// whatever the factory reports.
    pub fn extension(
        &self,
        name: &str,
        args: &[RowValues],
    ) -> Result<Pipeline, SqlMiddlewareDbError> {
        let factory = self.extensions.get(name).ok_or_else(|| {
            SqlMiddlewareDbError::ConfigError(format!("Unknown middleware extension: {name}"))
        })?;
        let middleware = factory(self, args)?;
        Ok(Pipeline::new(middleware).named(name))
    }
}
