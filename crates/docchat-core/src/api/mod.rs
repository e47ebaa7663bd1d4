pub mod client;
pub mod error;
mod wire;

pub use client::DocChatClient;
pub use error::{ApiError, UNKNOWN_ERROR};
