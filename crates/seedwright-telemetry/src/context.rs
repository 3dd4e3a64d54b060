//! Span and task-local context shared by the bootstrap code and HTTP middleware.

use std::future::Future;
use std::sync::Arc;

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::span::EnteredSpan;
use tracing::{Span, field};

use crate::init::build_sha;

/// Process-level span that stays entered until dropped.
///
/// Hold it in `main` so every event emitted during start-up carries the phase and
/// build identifier.
pub struct ProcessSpan {
    _entered: EnteredSpan,
}

impl ProcessSpan {
    /// Open and enter the `seedwright` span for `phase`.
    #[must_use]
    pub fn enter(phase: &str) -> Self {
        let span = tracing::info_span!("seedwright", phase, build_sha = build_sha());
        Self {
            _entered: span.entered(),
        }
    }
}

tokio::task_local! {
    static CURRENT_SCOPE: RequestScope;
}

/// Identifiers of the HTTP request a task is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    request_id: Arc<str>,
    route: Arc<str>,
}

impl RequestScope {
    /// Describe a request by its id and route template.
    #[must_use]
    pub fn new(request_id: impl Into<Arc<str>>, route: impl Into<Arc<str>>) -> Self {
        Self {
            request_id: request_id.into(),
            route: route.into(),
        }
    }

    /// Scope of the request the current task is serving, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT_SCOPE.try_with(Self::clone).ok()
    }

    /// Value of the `x-request-id` header, possibly empty.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Matched route template, or the raw path when no route matched.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Fill the `request_id` and `route` fields of `span`.
    ///
    /// The span must declare both fields, typically as [`field::Empty`].
    pub fn record_on(&self, span: &Span) {
        span.record("request_id", field::display(&self.request_id));
        span.record("route", field::display(&self.route));
    }

    /// Drive `future` with this scope visible through [`RequestScope::current`].
    pub async fn run<F>(self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_SCOPE.scope(self, future).await
    }
}

/// Layer that assigns a UUID `x-request-id` to requests arriving without one.
#[must_use]
pub fn assign_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
#[must_use]
pub fn echo_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
