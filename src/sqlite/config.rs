use serde::{Deserialize, Serialize};

use super::SqliteBackend;

/// Options for opening a `SQLite` database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// Filesystem path, `:memory:`, or a `file:` URI.
    pub db_path: String,
    /// `PRAGMA journal_mode = WAL` on connect. Ignored for in-memory databases.
    #[serde(default)]
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            wal: false,
        }
    }

    /// In-memory database private to the single connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    #[must_use]
    pub(crate) fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:" || self.db_path.contains("mode=memory")
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build an unconnected backend from these options.
    #[must_use]
    pub fn build(self) -> SqliteBackend {
        SqliteBackend::new(self.finish())
    }
}
