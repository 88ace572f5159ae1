use async_trait::async_trait;

use super::Middleware;
use crate::error::SqlMiddlewareDbError;
use crate::state::State;
use crate::types::RowValues;

/// Sets a fixed key to a fixed value. An empty key does nothing.
pub struct Assign {
    key: String,
    value: RowValues,
}

impl Assign {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
impl Middleware for Assign {
    async fn call(&self, mut state: State) -> Result<State, SqlMiddlewareDbError> {
        if !self.key.is_empty() {
            state.set(self.key.clone(), self.value.clone());
        }
        Ok(state)
    }
}
