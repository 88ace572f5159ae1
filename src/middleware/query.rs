use async_trait::async_trait;
use tracing::debug;

use super::Middleware;
use crate::backend::SharedBackend;
use crate::error::SqlMiddlewareDbError;
use crate::projection::project;
use crate::state::State;
use crate::translation::CompiledQuery;

/// Runs one query template against the backend and folds the answer into state.
///
/// The template is resolved against the incoming state on every call, so one `Query` can bind
/// different placeholders from run to run.
pub struct Query {
    backend: SharedBackend,
    template: String,
}

impl Query {
    #[must_use]
    pub fn new(backend: SharedBackend, template: impl Into<String>) -> Self {
        Self {
            backend,
            template: template.into(),
        }
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

#[async_trait]
impl Middleware for Query {
    async fn call(&self, mut state: State) -> Result<State, SqlMiddlewareDbError> {
        let mut backend = self.backend.lock().await;
        let compiled = CompiledQuery::compile(&self.template, &state, |ordinal| {
            backend.placeholder(ordinal)
        });
        debug!(
            template = %self.template,
            sql = %compiled.sql,
            bound = ?compiled.bound_keys,
            "query: compiled"
        );

        let outcome = backend.query(&compiled.sql, &compiled.params).await?;
        drop(backend);

        project(&mut state, compiled.kind, outcome);
        Ok(state)
    }
}
