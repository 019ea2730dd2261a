//! Request tracing for the HTTP surface.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Builds the per-request tracing layer.
///
/// Every request gets an `INFO` span carrying method, URI and version; the
/// response is logged at `INFO` with its latency in milliseconds. 5xx
/// responses are additionally reported at `ERROR`.
///
/// ```text
/// INFO request{method=GET uri=/Ab3xY9 version=HTTP/1.1}: finished processing request latency=2 ms status=307
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
