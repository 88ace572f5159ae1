//! The middleware contract and the built-in middleware.
//!
//! A middleware takes the pipeline state and either hands back the (possibly updated) state or
//! fails. Groups run members one after the other, stopping at the first failure.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SqlMiddlewareDbError;
use crate::state::State;

mod assign;
mod connect;
mod group;
mod query;
mod transaction;

pub use assign::Assign;
pub use connect::{Connect, Disconnect};
pub use group::{Group, group};
pub(crate) use group::panic_message;
pub use query::Query;
pub use transaction::{TransactionKeywords, TransactionStep};

/// One unit of pipeline behavior.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Run against `state`, returning the state for the next member.
    async fn call(&self, state: State) -> Result<State, SqlMiddlewareDbError>;
}

/// Shared, type-erased middleware; what every builder on [`crate::Sql`] returns.
pub type ArcMiddleware = Arc<dyn Middleware>;

/// Middleware backed by an async closure.
pub struct FnMiddleware<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(State) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<State, SqlMiddlewareDbError>> + Send + 'static,
{
    async fn call(&self, state: State) -> Result<State, SqlMiddlewareDbError> {
        (self.f)(state).await
    }
}

/// Wrap an async closure as middleware.
///
/// ```rust
/// use sqlmw::prelude::*;
///
/// let stamp = middleware_fn(|state: State| async move {
///     Ok(state.with("stamped", true))
/// });
/// # let _ = stamp;
/// ```
pub fn middleware_fn<F, Fut>(f: F) -> ArcMiddleware
where
    F: Fn(State) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<State, SqlMiddlewareDbError>> + Send + 'static,
{
    Arc::new(FnMiddleware { f })
}
