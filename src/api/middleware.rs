use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{info, warn};

use crate::metrics;

fn apply_cors_headers(headers: &mut HeaderMap) {
    let any = HeaderValue::from_static("*");
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, any.clone());
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, any.clone());
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, any);
}

/// Wildcard CORS on every response; `OPTIONS` pre-flight answers 204 without
/// reaching a handler.
pub async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }
    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    metrics::inc_http_requests();
    let response = next.run(request).await;
    let status = response.status();
    if status.is_server_error() {
        metrics::inc_http_server_errors();
        warn!("{} {} -> {} ({:?})", method, path, status, started.elapsed());
    } else {
        info!("{} {} -> {} ({:?})", method, path, status, started.elapsed());
    }
    response
}
