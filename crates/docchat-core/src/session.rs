//! Session state for one document conversation.
//!
//! A session starts with no document. A successful upload moves it to
//! `DocumentReady`, which is terminal: from then on only chat is reachable.
//! A single in-flight flag covers both exchanges, so at most one request is
//! ever outstanding.

use thiserror::Error;

use crate::api::ApiError;
use crate::backend::Backend;
use crate::document::{DocumentRef, UploadFile};
use crate::state::ChatMessage;

/// Prefix of the assistant message synthesized when a chat exchange fails
pub const CHAT_ERROR_PREFIX: &str = "Sorry, I ran into an error: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionGate {
    NoDocument,
    DocumentReady(DocumentRef),
}

/// Why a submission was refused. Refusals never change session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a request is already in flight")]
    Busy,
    #[error("question is empty")]
    EmptyQuestion,
    #[error("no document has been uploaded yet")]
    NoDocument,
    #[error("a document is already loaded")]
    DocumentLoaded,
}

#[derive(Debug)]
pub struct Session {
    gate: SessionGate,
    messages: Vec<ChatMessage>,
    upload_error: Option<String>,
    pending: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            gate: SessionGate::NoDocument,
            messages: Vec::new(),
            upload_error: None,
            pending: false,
        }
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn document(&self) -> Option<&DocumentRef> {
        match &self.gate {
            SessionGate::DocumentReady(doc) => Some(doc),
            SessionGate::NoDocument => None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn begin_upload(&mut self) -> Result<(), SessionError> {
        if self.pending {
            return Err(SessionError::Busy);
        }
        if self.document().is_some() {
            return Err(SessionError::DocumentLoaded);
        }

        self.pending = true;
        self.upload_error = None;
        Ok(())
    }

    pub fn finish_upload(&mut self, outcome: Result<DocumentRef, ApiError>) {
        self.pending = false;

        match outcome {
            Ok(doc) => {
                tracing::info!(document = %doc, "document ready");
                self.messages = vec![ChatMessage::welcome(doc.as_str())];
                self.upload_error = None;
                self.gate = SessionGate::DocumentReady(doc);
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload failed");
                self.upload_error = Some(err.to_string());
            }
        }
    }

    /// Validate `input`, append it as a user message and mark the session
    /// busy. Returns the question to send.
    pub fn begin_chat(&mut self, input: &str) -> Result<String, SessionError> {
        if self.document().is_none() {
            return Err(SessionError::NoDocument);
        }
        if self.pending {
            return Err(SessionError::Busy);
        }
        if input.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }

        self.messages.push(ChatMessage::user(input));
        self.pending = true;
        Ok(input.to_string())
    }

    pub fn finish_chat(&mut self, outcome: Result<String, ApiError>) {
        self.pending = false;

        let content = match outcome {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, "chat exchange failed");
                format!("{}{}", CHAT_ERROR_PREFIX, err)
            }
        };
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Run a full upload exchange. Refused submissions make no request.
    pub async fn upload<B>(&mut self, backend: &B, file: &UploadFile) -> Result<(), SessionError>
    where
        B: Backend + ?Sized,
    {
        self.begin_upload()?;
        let outcome = backend.upload(file).await;
        self.finish_upload(outcome);
        Ok(())
    }

    /// Run a full chat round trip. Refused submissions make no request.
    pub async fn ask<B>(&mut self, backend: &B, input: &str) -> Result<(), SessionError>
    where
        B: Backend + ?Sized,
    {
        let question = self.begin_chat(input)?;
        let outcome = backend.ask(&question).await;
        self.finish_chat(outcome);
        Ok(())
    }
}
