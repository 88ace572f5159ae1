use crate::types::DatabaseType;

/// Transaction-control statement to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStep {
    Begin,
    Commit,
    Rollback,
}

/// Dialect keywords for transaction control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionKeywords {
    pub begin: &'static str,
    pub commit: &'static str,
    pub rollback: &'static str,
}

impl TransactionKeywords {
    /// Keywords for `database_type`, or `None` for a dialect without a table entry.
    #[must_use]
    pub fn for_database(database_type: DatabaseType) -> Option<Self> {
        match database_type {
            DatabaseType::Mysql => Some(Self {
                begin: "START TRANSACTION",
                commit: "COMMIT",
                rollback: "ROLLBACK",
            }),
            DatabaseType::Postgres | DatabaseType::Sqlite => Some(Self {
                begin: "BEGIN",
                commit: "COMMIT",
                rollback: "ROLLBACK",
            }),
            DatabaseType::Other => None,
        }
    }

    #[must_use]
    pub fn statement(&self, step: TransactionStep) -> &'static str {
        match step {
            TransactionStep::Begin => self.begin,
            TransactionStep::Commit => self.commit,
            TransactionStep::Rollback => self.rollback,
        }
    }
}
