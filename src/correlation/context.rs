//! Request-scoped correlation context.
//!
//! The context is held in task-local storage whose scope covers exactly one
//! request's handling future. Scope exit is the cleanup: there is no clear
//! step that could be skipped on an error path, and a context set for one
//! request is unreachable from any other task.

use std::time::Instant;

use crate::correlation::id::CorrelationId;

tokio::task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Per-request in-flight state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: CorrelationId,
    started_at: Instant,
}

impl RequestContext {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            started_at: Instant::now(),
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Run `fut` with `ctx` as the active request context.
pub async fn scope<F>(ctx: RequestContext, fut: F) -> F::Output
where
    F: std::future::Future,
{
    REQUEST_CONTEXT.scope(ctx, fut).await
}

/// Correlation ID of the request currently being handled, if any.
///
/// Returns `None` when called outside a request scope (startup tasks,
/// background jobs); callers are expected to proceed without it.
pub fn current_correlation_id() -> Option<CorrelationId> {
    REQUEST_CONTEXT
        .try_with(|ctx| ctx.correlation_id.clone())
        .ok()
}
