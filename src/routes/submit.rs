//! Survey submission endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::models::{SurveyRecord, SurveySubmission};
use crate::store::{StoreError, SurveyStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` until both Supabase credentials are configured
    pub store: Option<Arc<dyn SurveyStore>>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/submit-survey - Accept one survey submission
///
/// At most one store write per request; every failure path responds
/// without writing.
pub async fn submit_survey(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(store) = state.store.as_ref() else {
        error!("Rejecting submission: Supabase credentials not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: Missing Supabase credentials".to_string(),
        );
    };

    if body.is_empty() {
        warn!("Rejecting submission: empty request body");
        return error_response(StatusCode::BAD_REQUEST, "Missing request body".to_string());
    }

    // A body that does not parse is treated as a submission with no
    // fields, which then fails the required-field check below.
    let submission: SurveySubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Unparseable submission body: {}", e);
            SurveySubmission::default()
        }
    };

    let ip_address = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));

    let Some(record) = SurveyRecord::from_submission(submission, ip_address) else {
        warn!("Rejecting submission: missing required fields");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields".to_string(),
        );
    };

    match store.insert(&record).await {
        Ok(()) => {
            info!("Stored survey response from {}", record.ip_address);
            (StatusCode::OK, Json(SubmitResponse { success: true })).into_response()
        }
        Err(StoreError::Rejected(message)) => {
            error!("Supabase rejected insert: {}", message);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", message),
            )
        }
        Err(StoreError::Transport(message)) => {
            error!("Supabase call failed: {}", message);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database operation failed: {}", message),
            )
        }
    }
}

/// OPTIONS /api/submit-survey - CORS preflight
///
/// Headers come from the CORS middleware; the body stays empty.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Fallback for every other method on the submission route
pub async fn method_not_allowed() -> Response {
    warn!("Rejecting submission: method not allowed");
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed".to_string(),
    )
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// Proxy header first, then the connection's address, then "unknown".
/// The forwarded-for value is stored as sent, hop list and all.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
