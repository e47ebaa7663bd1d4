use async_trait::async_trait;

use crate::api::{ApiError, DocChatClient};
use crate::document::{DocumentRef, UploadFile};

/// The two exchanges a session drives
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<DocumentRef, ApiError>;

    async fn ask(&self, question: &str) -> Result<String, ApiError>;
}

#[async_trait]
impl Backend for DocChatClient {
    async fn upload(&self, file: &UploadFile) -> Result<DocumentRef, ApiError> {
        DocChatClient::upload(self, file).await
    }

    async fn ask(&self, question: &str) -> Result<String, ApiError> {
        DocChatClient::ask(self, question).await
    }
}
