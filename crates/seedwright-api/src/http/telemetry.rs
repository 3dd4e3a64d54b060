//! Request accounting middleware.
//!
//! Runs innermost in the route stack so the matched route template is available and the
//! handler executes inside a [`RequestScope`].

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use seedwright_telemetry::{Metrics, RequestScope};

use crate::http::constants::HEADER_REQUEST_ID;

/// Count the request under its route template and expose its scope to the handler.
pub(crate) async fn track_request(
    State(telemetry): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(
            || request.uri().path().to_owned(),
            |matched| matched.as_str().to_owned(),
        );
    let request_id = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let scope = RequestScope::new(request_id, route.as_str());
    let response = scope.run(next.run(request)).await;
    telemetry.inc_http_request(&route, response.status().as_u16());
    response
}
