use async_trait::async_trait;

use super::Middleware;
use crate::backend::SharedBackend;
use crate::error::SqlMiddlewareDbError;
use crate::state::State;

/// Opens the backend connection unless one is already live. State passes through untouched.
pub struct Connect {
    backend: SharedBackend,
}

impl Connect {
    #[must_use]
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Middleware for Connect {
    async fn call(&self, state: State) -> Result<State, SqlMiddlewareDbError> {
        self.backend.lock().await.connect().await?;
        Ok(state)
    }
}

/// Closes the backend connection. Fails with `NotConnected` when there is none.
pub struct Disconnect {
    backend: SharedBackend,
}

impl Disconnect {
    #[must_use]
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Middleware for Disconnect {
    async fn call(&self, state: State) -> Result<State, SqlMiddlewareDbError> {
        self.backend.lock().await.disconnect().await?;
        Ok(state)
    }
}
