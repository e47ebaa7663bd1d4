use std::path::PathBuf;

use docchat_core::{ApiError, ChatRole, DocChatClient, DocumentRef, Session, SessionGate, UploadFile};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Upload,
    Chat,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Turn whatever was typed or dropped into the terminal into a path.
///
/// Terminals paste dropped files quoted or with escaped spaces, and users
/// type `~` for their home directory.
pub fn clean_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    let unescaped = unquoted.replace("\\ ", " ");

    if let Some(rest) = unescaped.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(unescaped)
}

pub struct App {
    pub should_quit: bool,
    pub session: Session,
    client: DocChatClient,

    // Shared single-line input (file path on the upload screen, question on chat)
    pub input: String,
    pub cursor: usize,

    upload_task: Option<JoinHandle<Result<DocumentRef, ApiError>>>,
    chat_task: Option<JoinHandle<Result<String, ApiError>>>,

    // Chat view
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat area
    pub chat_width: u16,  // inner width, for wrap estimates
    pub follow_bottom: bool,
    pub needs_scroll_to_bottom: bool,

    pub animation_frame: u8,
}

impl App {
    pub fn new(client: DocChatClient) -> Self {
        Self {
            should_quit: false,
            session: Session::new(),
            client,
            input: String::new(),
            cursor: 0,
            upload_task: None,
            chat_task: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            follow_bottom: true,
            needs_scroll_to_bottom: false,
            animation_frame: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.session.gate() {
            SessionGate::NoDocument => Screen::Upload,
            SessionGate::DocumentReady(_) => Screen::Chat,
        }
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn submit(&mut self) {
        match self.screen() {
            Screen::Upload => {
                let raw = self.input.clone();
                self.start_upload(&raw);
            }
            Screen::Chat => self.start_chat(),
        }
    }

    /// Read and upload the file at `raw` in the background
    pub fn start_upload(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        if let Err(err) = self.session.begin_upload() {
            tracing::debug!(error = %err, "upload not started");
            return;
        }

        let path = clean_path(raw);
        tracing::info!(path = %path.display(), "starting upload");

        let client = self.client.clone();
        self.upload_task = Some(tokio::spawn(async move {
            let file = UploadFile::from_path(&path).await?;
            client.upload(&file).await
        }));
    }

    /// Submit the current input as a question. The user message lands in the
    /// list before the request is spawned.
    pub fn start_chat(&mut self) {
        let question = match self.session.begin_chat(&self.input) {
            Ok(question) => question,
            Err(err) => {
                tracing::debug!(error = %err, "question not sent");
                return;
            }
        };

        self.clear_input();
        self.follow_bottom = true;
        self.needs_scroll_to_bottom = true;

        let client = self.client.clone();
        self.chat_task = Some(tokio::spawn(async move { client.ask(&question).await }));
    }

    /// Hand finished exchanges back to the session
    pub async fn poll_tasks(&mut self) {
        if self.upload_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.upload_task.take() {
                let outcome = task.await.unwrap_or_else(|e| Err(ApiError::transport(e)));
                let succeeded = outcome.is_ok();
                self.session.finish_upload(outcome);
                if succeeded {
                    self.clear_input();
                    self.chat_scroll = 0;
                }
            }
        }

        if self.chat_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.chat_task.take() {
                let outcome = task.await.unwrap_or_else(|e| Err(ApiError::transport(e)));
                self.session.finish_chat(outcome);
                if self.follow_bottom {
                    self.needs_scroll_to_bottom = true;
                }
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if self.session.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Input editing

    pub fn input_enabled(&self) -> bool {
        !self.session.is_pending()
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // Chat scrolling

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.chat_scroll = (self.chat_scroll + lines).min(max);
        self.follow_bottom = self.chat_scroll >= max;
    }

    pub fn page_size(&self) -> u16 {
        self.chat_height.max(2) / 2
    }

    /// Called by the renderer once it knows the chat area size
    pub fn apply_pending_scroll(&mut self) {
        if self.needs_scroll_to_bottom || (self.follow_bottom && self.session.is_pending()) {
            self.chat_scroll = self.max_scroll();
            self.needs_scroll_to_bottom = false;
        }
    }

    fn max_scroll(&self) -> u16 {
        let visible = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.estimated_chat_lines().saturating_sub(visible)
    }

    /// Rough wrapped line count of the chat transcript, mirroring the layout
    /// in `ui::chat_lines` (label, body lines, blank separator).
    fn estimated_chat_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 { self.chat_width as usize } else { 50 };

        let mut total: usize = 0;
        for msg in self.session.messages() {
            total += 1;
            for line in msg.content.lines() {
                let chars = line.chars().count();
                total += chars.div_ceil(wrap_width).max(1);
            }
            total += 1;
        }
        if self.session.is_pending() {
            total += 2;
        }
        total.min(u16::MAX as usize) as u16
    }

    pub fn last_assistant_is_error(&self) -> bool {
        self.session
            .messages()
            .last()
            .map(|m| {
                m.role == ChatRole::Assistant
                    && m.content.starts_with(docchat_core::session::CHAT_ERROR_PREFIX)
            })
            .unwrap_or(false)
    }
}
