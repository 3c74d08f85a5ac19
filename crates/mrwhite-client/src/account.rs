//! Credits, dog profile and document adapters.

use std::path::Path;

use async_trait::async_trait;
use mrwhite_core::{
    ApiError, CreditBalance, CreditsPort, DocumentPort, DocumentRef, DogProfile, DogProfilePort,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::MrWhiteApi;
use crate::endpoints::{CREDITS_BALANCE, DOCUMENTS, DOCUMENTS_UPLOAD, DOGS};
use crate::error::ClientError;

/// The documents endpoint wraps its list; the dogs endpoint does not.
#[derive(Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<DocumentRef>,
}

#[async_trait]
impl CreditsPort for MrWhiteApi {
    async fn balance(&self) -> Result<CreditBalance, ApiError> {
        Ok(self.client.get_json(CREDITS_BALANCE, &[]).await?)
    }
}

#[async_trait]
impl DogProfilePort for MrWhiteApi {
    async fn list_profiles(&self) -> Result<Vec<DogProfile>, ApiError> {
        Ok(self.client.get_json(DOGS, &[]).await?)
    }
}

#[async_trait]
impl DocumentPort for MrWhiteApi {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, ApiError> {
        let list: DocumentList = self.client.get_json(DOCUMENTS, &[]).await?;
        Ok(list.documents)
    }

    async fn upload(&self, path: &Path) -> Result<DocumentRef, ApiError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::Io(format!("{} is not a file", path.display())))?;
        let bytes = tokio::fs::read(path).await.map_err(ClientError::from)?;
        let size = bytes.len();

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.clone()));
        let document: DocumentRef = self.client.post_multipart(DOCUMENTS_UPLOAD, form).await?;

        tracing::info!(file = %file_name, bytes = size, id = document.id, "Document uploaded");
        Ok(document)
    }
}
