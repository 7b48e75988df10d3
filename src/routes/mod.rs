//! HTTP route handlers and router assembly.

pub mod health;
pub mod submit;

pub use health::{health, ready};
pub use submit::{method_not_allowed, preflight, submit_survey, AppState};

use std::any::Any;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::cors::{apply_cors, CorsPolicy};
use submit::ErrorResponse;

/// Build the application router.
///
/// The CORS middleware sits outermost so that every response, including
/// 405s and caught panics, carries the cross-origin headers.
pub fn router(state: AppState, cors: CorsPolicy) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Submission endpoint; the fallback is the method gate
        .route(
            "/api/submit-survey",
            post(submit_survey)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(cors, apply_cors))
        .with_state(state)
}

/// Convert a caught panic into the generic server-error response
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("Handler panicked: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Internal server error: {}", message),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let app = router(AppState { store: None }, CorsPolicy::new("*"));
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn ready_reflects_store_configuration() {
        let app = router(AppState { store: None }, CorsPolicy::new("*"));
        let (status, body) = get_json(app, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn panic_handler_reports_the_message() {
        let response = handle_panic(Box::new("store client poisoned".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "error": "Internal server error: store client poisoned" })
        );
    }
}
