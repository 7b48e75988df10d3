//! Configuration for the survey server.
//!
//! All configuration is read from environment variables once at startup
//! and passed into the handler through application state; nothing else
//! reads the environment.

use std::env;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// Supabase project URL. Absent credentials are surfaced to callers
    /// as a configuration error, not a startup failure.
    pub supabase_url: Option<String>,

    /// Supabase service-role key
    pub supabase_service_role_key: Option<String>,

    /// Table receiving submissions
    pub supabase_table: String,

    /// Allowed CORS origin
    pub cors_allow_origin: String,

    /// Log level
    pub log_level: String,

    /// Enable JSON logging
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            supabase_url: env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty()),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            supabase_table: env::var("SUPABASE_TABLE")
                .unwrap_or_else(|_| "survey_responses".to_string()),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Get the full server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
