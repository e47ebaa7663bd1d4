pub mod api;
pub mod backend;
pub mod config;
pub mod document;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use api::{ApiError, DocChatClient};
pub use backend::Backend;
pub use config::Config;
pub use document::{DocumentRef, UploadFile};
pub use session::{Session, SessionError, SessionGate};
pub use state::{ChatMessage, ChatRole};
