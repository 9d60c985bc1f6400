//! Tower layers shared by every REST route
//!
//! Request ids, tracing spans, the request timeout, CORS and the global rate
//! limit.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use chat_common::{CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are answered with 503
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Wrap the router in the request-id, trace, timeout and CORS layers
///
/// The outermost layer is added last, so a request gets its id before the
/// trace span is opened.
pub fn apply_middleware(
    router: Router<AppState>,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    router
        .layer(cors_layer(cors_config, is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "chat_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
}

/// Apply one bucket shared by all callers
///
/// A zero rate or burst cannot build a limiter; the router is then left
/// unlimited and a warning is logged.
pub fn apply_rate_limit(router: Router<AppState>, config: &RateLimitConfig) -> Router<AppState> {
    let governor = GovernorConfigBuilder::default()
        .per_second(config.requests_per_second.into())
        .burst_size(config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish();

    let Some(governor) = governor else {
        tracing::warn!(
            requests_per_second = config.requests_per_second,
            burst = config.burst,
            "Rate limiting disabled by configuration"
        );
        return router;
    };

    router.layer(GovernorLayer {
        config: Arc::new(governor),
    })
}

/// Parse configured origins, skipping the ones that are not valid header values
fn allowed_origins(config: &CorsConfig) -> Vec<HeaderValue> {
    config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

fn cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, request_id_header()])
        .expose_headers([request_id_header()]);

    // Development with nothing configured accepts any origin
    if config.allowed_origins.is_empty() && !is_production {
        tracing::warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS outside development");
        return layer.allow_origin(Any);
    }

    let origins = allowed_origins(config);
    if origins.is_empty() {
        tracing::warn!("CORS has no allowed origins; browser requests will be refused");
    } else {
        tracing::info!(count = origins.len(), "CORS origins configured");
    }
    layer.allow_origin(AllowOrigin::list(origins))
}
