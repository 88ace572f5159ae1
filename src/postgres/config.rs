use serde::{Deserialize, Serialize};

use super::PostgresBackend;
use crate::error::SqlMiddlewareDbError;

/// Connection settings for a `PostgreSQL` server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl PostgresOptions {
    /// Check that every field needed to connect is present.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), SqlMiddlewareDbError> {
        if self.dbname.is_none() {
            return Err(SqlMiddlewareDbError::ConfigError(
                "dbname is required".to_string(),
            ));
        }
        if self.host.is_none() {
            return Err(SqlMiddlewareDbError::ConfigError(
                "host is required".to_string(),
            ));
        }
        if self.port.is_none() {
            return Err(SqlMiddlewareDbError::ConfigError(
                "port is required".to_string(),
            ));
        }
        if self.user.is_none() {
            return Err(SqlMiddlewareDbError::ConfigError(
                "user is required".to_string(),
            ));
        }
        if self.password.is_none() {
            return Err(SqlMiddlewareDbError::ConfigError(
                "password is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Driver configuration for these options.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if a required field is missing.
    pub fn to_pg_config(&self) -> Result<tokio_postgres::Config, SqlMiddlewareDbError> {
        self.validate()?;
        let mut cfg = tokio_postgres::Config::new();
        if let Some(host) = &self.host {
            cfg.host(host);
        }
        if let Some(port) = self.port {
            cfg.port(port);
        }
        if let Some(dbname) = &self.dbname {
            cfg.dbname(dbname);
        }
        if let Some(user) = &self.user {
            cfg.user(user);
        }
        if let Some(password) = &self.password {
            cfg.password(password);
        }
        Ok(cfg)
    }
}

/// Fluent builder for `PostgreSQL` options.
#[derive(Debug, Clone, Default)]
pub struct PostgresOptionsBuilder {
    opts: PostgresOptions,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.opts.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = Some(port);
        self
    }

    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.opts.dbname = Some(dbname.into());
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> PostgresOptions {
        self.opts
    }

    /// Validate the options and build an unconnected backend.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if a required field is missing.
    pub fn build(self) -> Result<PostgresBackend, SqlMiddlewareDbError> {
        let opts = self.finish();
        opts.validate()?;
        Ok(PostgresBackend::new(opts))
    }
}
