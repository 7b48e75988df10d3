//! Survey persistence backends.

pub mod supabase;

pub use supabase::SupabaseStore;

use async_trait::async_trait;

use crate::models::SurveyRecord;

/// Failure modes of a store write.
///
/// `Rejected` means the store answered and refused the insert;
/// `Transport` means the call itself never completed. Callers map them
/// to different response messages.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store reported a structured error
    #[error("{0}")]
    Rejected(String),

    /// The request to the store failed (connect, TLS, timeout)
    #[error("{0}")]
    Transport(String),
}

/// Trait for persisting survey records to a backend
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Insert a single record into the configured collection
    async fn insert(&self, record: &SurveyRecord) -> Result<(), StoreError>;
}
