use std::fmt;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tracing::error;

use crate::error::SqlMiddlewareDbError;
use crate::middleware::{ArcMiddleware, Middleware, panic_message};
use crate::state::State;

/// Completion callback, invoked exactly once per [`Pipeline::invoke`].
pub type Callback = Box<dyn FnOnce(Result<State, SqlMiddlewareDbError>) + Send>;

/// Runnable wrapper around middleware with the optional-state / optional-callback call shapes.
///
/// ```rust,no_run
/// use sqlmw::prelude::*;
///
/// # async fn demo(sql: &Sql) -> Result<(), SqlMiddlewareDbError> {
/// let pipeline = Pipeline::new(sql.group([sql.connect(), sql.query("SELECT 1 AS one")]));
/// let state = pipeline.run_empty().await?;
/// assert_eq!(state.get("one"), Some(&RowValues::Int(1)));
///
/// // callback style; errors without a callback are logged instead
/// let report: Callback = Box::new(|res: Result<State, SqlMiddlewareDbError>| {
///     println!("done: {}", res.is_ok());
/// });
/// pipeline.invoke(None, Some(report)).await;
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    middleware: ArcMiddleware,
    name: Option<String>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("name", &self.name).finish()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new(middleware: ArcMiddleware) -> Self {
        Self {
            middleware,
            name: None,
        }
    }

    /// Label used when reporting errors through the default callback.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn middleware(&self) -> ArcMiddleware {
        ArcMiddleware::clone(&self.middleware)
    }

    /// Run with `state` as the initial working state.
    ///
    /// # Errors
    /// Returns the first error reported by the wrapped middleware.
    pub async fn run(&self, state: State) -> Result<State, SqlMiddlewareDbError> {
        self.middleware.call(state).await
    }

    /// Run starting from an empty state.
    ///
    /// # Errors
    /// Returns the first error reported by the wrapped middleware.
    pub async fn run_empty(&self) -> Result<State, SqlMiddlewareDbError> {
        self.run(State::new()).await
    }

    /// Run and deliver the outcome to `callback`.
    ///
    /// A missing state starts empty. A missing callback is replaced by one that reports errors
    /// through `tracing::error!` and otherwise does nothing. A panic in the wrapped middleware is
    /// delivered to the callback as [`SqlMiddlewareDbError::MiddlewarePanic`].
    pub async fn invoke(&self, state: Option<State>, callback: Option<Callback>) {
        let callback = callback.unwrap_or_else(|| self.default_callback());
        let outcome = AssertUnwindSafe(self.run(state.unwrap_or_default()))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(SqlMiddlewareDbError::MiddlewarePanic(panic_message(
                    payload.as_ref(),
                )))
            });
        callback(outcome);
    }

    /// [`Pipeline::invoke`] on a new tokio task.
    pub fn spawn(&self, state: Option<State>, callback: Option<Callback>) -> JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.invoke(state, callback).await })
    }

    fn default_callback(&self) -> Callback {
        let name = self.name.clone();
        Box::new(move |outcome| {
            if let Err(err) = outcome {
                error!(
                    pipeline = name.as_deref().unwrap_or("<anonymous>"),
                    error = %err,
                    "pipeline failed"
                );
            }
        })
    }
}

#[async_trait]
impl Middleware for Pipeline {
    async fn call(&self, state: State) -> Result<State, SqlMiddlewareDbError> {
        self.run(state).await
    }
}

impl From<ArcMiddleware> for Pipeline {
    fn from(middleware: ArcMiddleware) -> Self {
        Pipeline::new(middleware)
    }
}
