//! Request ids, one tracing span per request, and slow request reporting.

use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderName, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

use crate::utility::tracing_targets::TRACING_TARGET_REQUEST;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are logged at `warn`.
const SLOW_REQUEST: Duration = Duration::from_secs(1);

/// Staff imports parse a whole CSV file and get more time.
const SLOW_IMPORT: Duration = Duration::from_secs(10);

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Tags every request with an `x-request-id`, opens a span carrying it,
    /// hides credentials from that span and reports slow requests.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        let trace = TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(DefaultOnResponse::new().level(Level::DEBUG));

        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(trace)
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(middleware::from_fn(report_slow_requests));

        self.layer(layers)
    }
}

fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        target: TRACING_TARGET_REQUEST,
        "request",
        id = request_id,
        method = %request.method(),
        path = request.uri().path(),
    )
}

fn threshold(path: &str) -> Duration {
    if path.contains("/users/import") {
        SLOW_IMPORT
    } else {
        SLOW_REQUEST
    }
}

async fn report_slow_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let limit = threshold(request.uri().path());

    let response = next.run(request).await;

    let elapsed = started.elapsed();
    if elapsed > limit {
        tracing::warn!(
            target: TRACING_TARGET_REQUEST,
            status = response.status().as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            limit_ms = limit.as_millis() as u64,
            "slow request"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn request_id_is_generated_or_echoed() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_observability();
        let server = TestServer::new(app)?;

        let generated = server.get("/").await;
        assert!(generated.maybe_header(REQUEST_ID_HEADER).is_some());

        let echoed = server
            .get("/")
            .add_header(REQUEST_ID_HEADER, "caller-chosen-id")
            .await;
        assert_eq!(echoed.header(REQUEST_ID_HEADER), "caller-chosen-id");
        Ok(())
    }

    #[test]
    fn imports_get_a_longer_threshold() {
        assert_eq!(threshold("/institutions/abc/users/import/validate/"), SLOW_IMPORT);
        assert_eq!(threshold("/institutions/abc/users/"), SLOW_REQUEST);
    }
}
