//! Cross-origin policy.
//!
//! The form is served from a different origin than this API, so every
//! response carries the full header set, preflights included. The
//! allowed origin comes from configuration; the rest of the header set
//! is fixed by the contract with the form.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
     Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Origin policy applied to every response
#[derive(Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
}

impl CorsPolicy {
    /// Build a policy allowing the given origin, `*` if it is not a
    /// valid header value
    pub fn new(allow_origin: &str) -> Self {
        let allow_origin = HeaderValue::from_str(allow_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("*"));
        Self { allow_origin }
    }
}

/// Middleware attaching the CORS header set to the response
pub async fn apply_cors(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        policy.allow_origin.clone(),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}
