//! Security headers middleware.

use axum::{
    body::Body,
    http::{
        header::{
            HeaderName, HeaderValue, CACHE_CONTROL, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
        Request,
    },
    middleware::Next,
    response::Response,
};

const HEADERS: [(HeaderName, &str); 3] = [
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (X_FRAME_OPTIONS, "DENY"),
    (REFERRER_POLICY, "strict-origin-when-cross-origin"),
];

/// Add security headers to every response.
///
/// Dataset pages depend on the caller's login and permit status, so
/// responses are marked uncacheable unless a handler says otherwise.
/// HSTS belongs to the reverse proxy.
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Router};
    use tower::util::ServiceExt;

    async fn request(app: Router) -> Response {
        app.layer(middleware::from_fn(security_headers))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_security_headers_added() {
        let response = request(Router::new().route("/", get(|| async { "OK" }))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert_eq!(
            headers.get("Referrer-Policy").unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert_eq!(headers.get("Cache-Control").unwrap(), "no-store, max-age=0");
    }

    #[tokio::test]
    async fn test_existing_cache_control_is_kept() {
        let handler = || async { ([(CACHE_CONTROL, "max-age=60")], "OK").into_response() };
        let response = request(Router::new().route("/", get(handler))).await;
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "max-age=60");
    }
}
