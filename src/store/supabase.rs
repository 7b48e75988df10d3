//! Supabase backend, talking to the project's PostgREST endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::SurveyRecord;
use crate::store::{StoreError, SurveyStore};

/// Writes records through `POST {project}/rest/v1/{table}`.
pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: String,
    service_role_key: String,
}

impl SupabaseStore {
    /// Create a store client for one project and table
    pub fn new(project_url: &str, service_role_key: &str, table: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let endpoint = format!("{}/rest/v1/{}", project_url.trim_end_matches('/'), table);

        Self {
            client,
            endpoint,
            service_role_key: service_role_key.to_string(),
        }
    }
}

#[async_trait]
impl SurveyStore for SupabaseStore {
    async fn insert(&self, record: &SurveyRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!("Inserted survey response into {}", self.endpoint);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!("Supabase returned {}: {}", status, body);
            Err(StoreError::Rejected(rejection_message(status, &body)))
        }
    }
}

/// Pull the `message` out of a PostgREST error body, falling back to the
/// raw body or the status line when it is not the expected JSON.
fn rejection_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct PostgrestError {
        message: String,
    }

    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => err.message,
        Err(_) if body.is_empty() => format!("HTTP {}", status),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_prefers_postgrest_message() {
        let body = r#"{"code":"23502","details":null,"hint":null,"message":"null value in column \"country\""}"#;
        let msg = rejection_message(StatusCode::BAD_REQUEST, body);
        assert_eq!(msg, "null value in column \"country\"");
    }

    #[test]
    fn rejection_message_falls_back_to_raw_body() {
        let msg = rejection_message(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(msg, "upstream unavailable");
    }

    #[test]
    fn rejection_message_falls_back_to_status() {
        let msg = rejection_message(StatusCode::UNAUTHORIZED, "");
        assert_eq!(msg, "HTTP 401 Unauthorized");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let store = SupabaseStore::new("https://abc.supabase.co/", "key", "survey_responses");
        assert_eq!(
            store.endpoint,
            "https://abc.supabase.co/rest/v1/survey_responses"
        );
    }
}
