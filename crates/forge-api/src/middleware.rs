//! Request middleware: CORS and request ids.
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::CorsLayer;

pub static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Tag every request with an id (kept if the caller sent one) and echo it
/// on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = match req.headers().get(&REQUEST_ID) {
        Some(value) => value.clone(),
        None => {
            let generated = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            req.headers_mut().insert(REQUEST_ID.clone(), generated.clone());
            generated
        }
    };

    tracing::debug!(
        request_id = id.to_str().unwrap_or("?"),
        method = %req.method(),
        path = %req.uri().path(),
        "request"
    );

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID.clone(), id);
    response
}
