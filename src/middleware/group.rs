use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::debug;

use super::{ArcMiddleware, Middleware};
use crate::error::SqlMiddlewareDbError;
use crate::state::State;

/// Ordered chain of middleware sharing one state.
///
/// Members run strictly in order, each receiving the state its predecessor returned. The first
/// error stops the chain and is returned unchanged. A panicking member is reported as
/// [`SqlMiddlewareDbError::MiddlewarePanic`] instead of unwinding into the caller. Groups nest:
/// a group member behaves exactly like its members spliced in place.
#[derive(Clone, Default)]
pub struct Group {
    members: Vec<ArcMiddleware>,
}

impl Group {
    #[must_use]
    pub fn new(members: impl IntoIterator<Item = ArcMiddleware>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Append a member to the end of the chain.
    pub fn push(&mut self, member: ArcMiddleware) {
        self.members.push(member);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Build a [`Group`] as shared middleware.
#[must_use]
pub fn group(members: impl IntoIterator<Item = ArcMiddleware>) -> ArcMiddleware {
    Arc::new(Group::new(members))
}

#[async_trait]
impl Middleware for Group {
    async fn call(&self, state: State) -> Result<State, SqlMiddlewareDbError> {
        let mut state = state;
        let mut index = 0;

        while let Some(member) = self.members.get(index) {
            // Build the member future inside the guarded block so a panic raised before its
            // first await is caught too.
            let outcome = AssertUnwindSafe(async move { member.call(state).await })
                .catch_unwind()
                .await;

            state = match outcome {
                Ok(Ok(next)) => next,
                Ok(Err(err)) => {
                    debug!(index, error = %err, "group: member failed, stopping chain");
                    return Err(err);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    debug!(index, %message, "group: member panicked, stopping chain");
                    return Err(SqlMiddlewareDbError::MiddlewarePanic(format!(
                        "member {index}: {message}"
                    )));
                }
            };
            index += 1;
        }

        Ok(state)
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
