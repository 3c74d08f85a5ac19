//! Account resource ports: credits, dog profiles, documents.

use std::path::Path;

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{CreditBalance, DocumentRef, DogProfile};

/// Port for the credit ledger.
#[async_trait]
pub trait CreditsPort: Send + Sync {
    async fn balance(&self) -> Result<CreditBalance, ApiError>;
}

/// Port for dog profile listing.
#[async_trait]
pub trait DogProfilePort: Send + Sync {
    async fn list_profiles(&self) -> Result<Vec<DogProfile>, ApiError>;
}

/// Port for document storage.
#[async_trait]
pub trait DocumentPort: Send + Sync {
    /// Documents already uploaded by the user.
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, ApiError>;

    /// Upload a local file; the returned reference can be attached to a message.
    async fn upload(&self, path: &Path) -> Result<DocumentRef, ApiError>;
}
