//! Installing extra middleware builders onto a [`Sql`] at runtime.
//!
//! A bundle is any value listing `(name, factory)` entries. A factory receives the [`Sql`] it is
//! installed on (so it can build query middleware against the same backend) plus the
//! construction arguments, and returns the middleware.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SqlMiddlewareDbError;
use crate::middleware::ArcMiddleware;
use crate::sql::Sql;
use crate::types::RowValues;

/// Builds one middleware from construction arguments.
pub type MiddlewareFactory =
    Arc<dyn Fn(&Sql, &[RowValues]) -> Result<ArcMiddleware, SqlMiddlewareDbError> + Send + Sync>;

/// A named collection of middleware factories.
///
/// An entry whose factory is `None` is skipped with a warning when the bundle is installed.
pub trait MiddlewareBundle: Send + Sync {
    fn factories(&self) -> Vec<(String, Option<MiddlewareFactory>)>;
}

/// Bundle assembled from closures.
///
/// ```rust
/// use sqlmw::prelude::*;
///
/// let bundle = FactoryBundle::new().with("touch", |sql: &Sql, _args: &[RowValues]| {
///     Ok(sql.query("UPDATE t SET seen = 1 WHERE id = :id"))
/// });
/// assert_eq!(bundle.factories().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct FactoryBundle {
    entries: Vec<(String, Option<MiddlewareFactory>)>,
}

impl fmt::Debug for FactoryBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, factory)| (name, factory.is_some())))
            .finish()
    }
}

impl FactoryBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory under `name`.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Sql, &[RowValues]) -> Result<ArcMiddleware, SqlMiddlewareDbError>
            + Send
            + Sync
            + 'static,
    {
        self.entries.push((name.into(), Some(Arc::new(factory))));
        self
    }

    /// Add a raw entry, possibly without a factory.
    #[must_use]
    pub fn with_entry(
        mut self,
        name: impl Into<String>,
        factory: Option<MiddlewareFactory>,
    ) -> Self {
        self.entries.push((name.into(), factory));
        self
    }
}

impl MiddlewareBundle for FactoryBundle {
    fn factories(&self) -> Vec<(String, Option<MiddlewareFactory>)> {
        self.entries.clone()
    }
}

/// Explicit name → bundle lookup used by [`Sql::use_named`].
#[derive(Clone, Default)]
pub struct BundleRegistry {
    bundles: HashMap<String, Arc<dyn MiddlewareBundle>>,
}

impl fmt::Debug for BundleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.bundles.keys().collect();
        names.sort();
        f.debug_struct("BundleRegistry").field("names", &names).finish()
    }
}

impl BundleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, bundle: Arc<dyn MiddlewareBundle>) {
        self.bundles.insert(name.into(), bundle);
    }

    /// Look up a bundle by name.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if no bundle is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn MiddlewareBundle>, SqlMiddlewareDbError> {
        self.bundles.get(name).cloned().ok_or_else(|| {
            SqlMiddlewareDbError::ConfigError(format!("Unknown middleware bundle: {name}"))
        })
    }
}
