#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlmw::prelude::*;

/// One statement as the backend received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub params: Vec<RowValues>,
}

#[derive(Debug, Default)]
pub struct Journal {
    pub executed: Vec<Executed>,
    pub connects: usize,
    pub disconnects: usize,
}

/// In-process backend that records every call and answers from a script.
///
/// Unscripted queries succeed with no rows and nothing affected.
#[derive(Debug)]
pub struct ScriptedBackend {
    style: PlaceholderStyle,
    database_type: DatabaseType,
    connected: bool,
    script: VecDeque<Result<QueryOutcome, String>>,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedBackend {
    pub fn new(database_type: DatabaseType) -> Self {
        Self {
            style: database_type
                .placeholder_style()
                .unwrap_or(PlaceholderStyle::Postgres),
            database_type,
            connected: false,
            script: VecDeque::new(),
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    pub fn postgres() -> Self {
        Self::new(DatabaseType::Postgres)
    }

    pub fn mysql() -> Self {
        Self::new(DatabaseType::Mysql)
    }

    pub fn connected(mut self) -> Self {
        self.connected = true;
        self
    }

    pub fn then_rows(mut self, columns: &[&str], rows: Vec<Vec<RowValues>>) -> Self {
        let columns = columns.iter().map(|c| (*c).to_string()).collect();
        self.script
            .push_back(Ok(QueryOutcome::rows(ResultSet::from_rows(columns, rows))));
        self
    }

    pub fn then_insert(mut self, id: RowValues) -> Self {
        self.script.push_back(Ok(QueryOutcome::summary(1, Some(id))));
        self
    }

    pub fn then_fail(mut self, message: &str) -> Self {
        self.script.push_back(Err(message.to_string()));
        self
    }

    pub fn journal(&self) -> Arc<Mutex<Journal>> {
        Arc::clone(&self.journal)
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    fn placeholder(&self, ordinal: usize) -> String {
        self.style.token(ordinal)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), SqlMiddlewareDbError> {
        if !self.connected {
            self.connected = true;
            self.journal.lock().unwrap().connects += 1;
        }
        Ok(())
    }

    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryOutcome, SqlMiddlewareDbError> {
        if !self.connected {
            return Err(SqlMiddlewareDbError::NotConnected);
        }
        self.journal.lock().unwrap().executed.push(Executed {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        match self.script.pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(SqlMiddlewareDbError::ExecutionError(message)),
            None => Ok(QueryOutcome::default()),
        }
    }

    async fn disconnect(&mut self) -> Result<(), SqlMiddlewareDbError> {
        if !self.connected {
            return Err(SqlMiddlewareDbError::NotConnected);
        }
        self.connected = false;
        self.journal.lock().unwrap().disconnects += 1;
        Ok(())
    }
}

/// Middleware that appends `label` to the text under `trace`.
pub fn tracer(label: &'static str) -> ArcMiddleware {
    middleware_fn(move |mut state: State| async move {
        let mut trace = state
            .get("trace")
            .and_then(RowValues::as_text)
            .unwrap_or_default()
            .to_string();
        trace.push_str(label);
        state.set("trace", trace);
        Ok(state)
    })
}

pub fn trace_of(state: &State) -> &str {
    state.get("trace").and_then(RowValues::as_text).unwrap_or("")
}
