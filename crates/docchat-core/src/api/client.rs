use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::wire::{self, ChatRequest, ChatResponse, MessageResponse, UploadResponse};
use super::ApiError;
use crate::document::{DocumentRef, UploadFile, PDF_MIME};

const UPLOAD_FAILED: &str = "Upload failed";
const CHAT_FAILED: &str = "Chat request failed";
const RESET_FAILED: &str = "Reset request failed";
const HEALTH_FAILED: &str = "Health check failed";

/// HTTP client for the document question-answering backend
#[derive(Clone)]
pub struct DocChatClient {
    client: Client,
    base_url: String,
}

impl DocChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one PDF to `/api/upload` and return the backend's reference for it
    pub async fn upload(&self, file: &UploadFile) -> Result<DocumentRef, ApiError> {
        let url = format!("{}/api/upload", self.base_url);

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(PDF_MIME)?;
        let form = Form::new().part("file", part);

        tracing::info!(file = file.name(), bytes = file.len(), "uploading document");

        let response = self.client.post(&url).multipart(form).send().await?;
        let body: UploadResponse = read_json(response, UPLOAD_FAILED, "filename").await?;
        let filename = wire::required(body.filename, "filename")?;

        if let Some(message) = body.message {
            tracing::info!(%message, "upload accepted");
        }

        Ok(DocumentRef::new(filename))
    }

    /// Ask a question about whichever document the backend currently holds
    pub async fn ask(&self, question: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/chat", self.base_url);

        tracing::debug!(chars = question.chars().count(), "sending question");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { question })
            .send()
            .await?;

        let body: ChatResponse = read_json(response, CHAT_FAILED, "answer").await?;
        wire::required(body.answer, "answer")
    }

    /// Clear the backend's document store
    pub async fn reset(&self) -> Result<String, ApiError> {
        let url = format!("{}/api/reset", self.base_url);

        let response = self.client.post(&url).send().await?;
        let body: MessageResponse = read_json(response, RESET_FAILED, "message").await?;
        wire::required(body.message, "message")
    }

    pub async fn health(&self) -> Result<String, ApiError> {
        let url = format!("{}/", self.base_url);

        let response = self.client.get(&url).send().await?;
        let body: MessageResponse = read_json(response, HEALTH_FAILED, "message").await?;
        wire::required(body.message, "message")
    }
}

/// Map a response to its JSON body, or to the exchange's error.
///
/// Non-success statuses use the body's `detail` when present, `fallback`
/// otherwise. A success body that isn't JSON counts as missing `field`.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
    field: &'static str,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = wire::error_detail(&body).unwrap_or_else(|| fallback.to_string());
        tracing::warn!(status = status.as_u16(), %message, "backend rejected request");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "backend returned a non-JSON success body");
        ApiError::MalformedResponse { field }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = DocChatClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
