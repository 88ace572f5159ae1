use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::Backend;
use crate::error::SqlMiddlewareDbError;
use crate::types::DatabaseType;

#[cfg(feature = "postgres")]
use crate::postgres::{PostgresBackend, PostgresOptions};
#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteBackend, SqliteOptions};

/// Connection settings handed to a backend factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", content = "options", rename_all = "lowercase")]
pub enum BackendConfig {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),
    /// Free-form settings for custom backends; built-in factories deserialize their own options
    /// from it.
    Json(JsonValue),
}

impl BackendConfig {
    /// Deserialize typed options out of a [`BackendConfig::Json`] value.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the value does not match `T`.
    pub fn parse_json<T: for<'de> Deserialize<'de>>(
        value: &JsonValue,
    ) -> Result<T, SqlMiddlewareDbError> {
        serde_json::from_value(value.clone()).map_err(|e| {
            SqlMiddlewareDbError::ConfigError(format!("Invalid backend options: {e}"))
        })
    }
}

/// Builds a backend from its configuration.
pub type BackendFactory =
    Arc<dyn Fn(&BackendConfig) -> Result<Box<dyn Backend>, SqlMiddlewareDbError> + Send + Sync>;

/// Explicit name → backend factory table passed to [`crate::Sql::from_registry`].
#[derive(Clone, Default)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("BackendRegistry").field("names", &names).finish()
    }
}

impl BackendRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the compiled-in backends under their dialect names and aliases
    /// (`sqlite`; `postgres`, `pg`, `postgresql`).
    #[must_use]
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "sqlite")]
        registry.register_dialect(
            DatabaseType::Sqlite,
            Arc::new(|config: &BackendConfig| -> Result<Box<dyn Backend>, SqlMiddlewareDbError> {
                let opts = match config {
                    BackendConfig::Sqlite(opts) => opts.clone(),
                    BackendConfig::Json(value) => BackendConfig::parse_json(value)?,
                    #[allow(unreachable_patterns)]
                    other => return Err(mismatched("sqlite", other)),
                };
                Ok(Box::new(SqliteBackend::new(opts)))
            }),
        );

        #[cfg(feature = "postgres")]
        registry.register_dialect(
            DatabaseType::Postgres,
            Arc::new(|config: &BackendConfig| -> Result<Box<dyn Backend>, SqlMiddlewareDbError> {
                let opts = match config {
                    BackendConfig::Postgres(opts) => opts.clone(),
                    BackendConfig::Json(value) => BackendConfig::parse_json(value)?,
                    #[allow(unreachable_patterns)]
                    other => return Err(mismatched("postgres", other)),
                };
                opts.validate()?;
                Ok(Box::new(PostgresBackend::new(opts)))
            }),
        );

        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: BackendFactory) {
        self.factories.insert(name.into().to_ascii_lowercase(), factory);
    }

    /// Register `factory` under the dialect's name and every alias it parses from.
    pub fn register_dialect(&mut self, database_type: DatabaseType, factory: BackendFactory) {
        if let Some(value) = database_type.to_possible_value() {
            for name in value.get_name_and_aliases() {
                self.register(name, Arc::clone(&factory));
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    /// Build the backend registered under `name` (case-insensitive).
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` for an unknown name, or whatever the factory
    /// reports for invalid options.
    pub fn build(
        &self,
        name: &str,
        config: &BackendConfig,
    ) -> Result<Box<dyn Backend>, SqlMiddlewareDbError> {
        let factory = self
            .factories
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| {
                SqlMiddlewareDbError::ConfigError(format!("Unsupported backend: {name}"))
            })?;
        factory(config)
    }
}

#[allow(dead_code)]
fn mismatched(expected: &str, got: &BackendConfig) -> SqlMiddlewareDbError {
    SqlMiddlewareDbError::ConfigError(format!(
        "{expected} backend cannot be built from {got:?}"
    ))
}
