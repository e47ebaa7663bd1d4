//! UI-agnostic chat state types
//!
//! These are shared by every front end (the TUI, one-shot commands) and
//! don't depend on any UI framework.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message in the document conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
        }
    }

    /// The synthetic greeting shown whenever a new document becomes active
    pub fn welcome(filename: &str) -> Self {
        Self::assistant(format!("Ready! Ask me any questions about {}.", filename))
    }
}
