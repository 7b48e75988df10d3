//! Survey Server - survey submission ingestion service
//!
//! Architecture:
//! - Axum HTTP server receives survey submissions from the web form
//! - Each submission is validated and written straight to Supabase
//! - No queue, no retry: the caller resubmits on failure
//!
//! # Usage
//!
//! ```bash
//! # Requires SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY in the
//! # environment (or a .env file)
//! cargo run
//! ```

mod config;
mod cors;
mod models;
mod routes;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::cors::CorsPolicy;
use crate::routes::{router, AppState};
use crate::store::{SupabaseStore, SurveyStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Setup logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }

    info!("Starting Survey Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Listening on {}, target table {:?}",
        config.server_addr(),
        config.supabase_table
    );

    // Build the store client. Missing credentials are not fatal at
    // startup; submissions are rejected with a configuration error
    // until both values are present.
    let store: Option<Arc<dyn SurveyStore>> =
        match (&config.supabase_url, &config.supabase_service_role_key) {
            (Some(url), Some(key)) => {
                info!("Using Supabase project at {}", url);
                Some(Arc::new(SupabaseStore::new(url, key, &config.supabase_table)))
            }
            _ => {
                warn!("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY not set; submissions will be rejected");
                None
            }
        };

    let state = AppState { store };
    let app = router(state, CorsPolicy::new(&config.cors_allow_origin));

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
