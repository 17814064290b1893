//! # Assistant screens
//!
//! State of the Lumina chat and image-studio screens. The network call itself
//! lives in the host; this module decides when a call may start, and how its
//! outcome lands on the screen:
//!
//! 1. `begin` refuses blank input and a second request while one is in
//!    flight, and captures the screen epoch.
//! 2. The host performs the call without holding the state.
//! 3. `finish` applies the outcome only if the epoch still matches; a failed
//!    call degrades to fallback text and never propagates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, Result};

pub const CHAT_GREETING: &str =
    "Hello! I am Lumina, your advanced AI assistant. How can I help you today?";
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I encountered an error.";
pub const CHAT_FAILURE_FALLBACK: &str =
    "System error: Unable to connect to the AI brain. Please check your configuration.";
pub const IMAGE_FAILURE_NOTICE: &str = "Failed to generate image. Please try again.";
pub const CHARITY_BOT_FALLBACK: &str = "抱歉，我正在整理最新的公益数据，请稍后再试。";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// One prior turn handed to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChat {
    pub prompt: String,
    /// Messages before the prompt.
    pub history: Vec<HistoryEntry>,
    pub epoch: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatScreen {
    messages: Vec<Message>,
    is_loading: bool,
    epoch: u64,
    next_id: u64,
}

impl ChatScreen {
    pub fn new(epoch: u64) -> Self {
        Self {
            messages: vec![Message {
                id: "1".into(),
                role: Role::Assistant,
                content: CHAT_GREETING.into(),
                timestamp: Utc::now(),
            }],
            is_loading: false,
            epoch,
            next_id: 2,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Post the user's message and hand back the request to perform.
    pub fn begin(&mut self, input: &str) -> Result<PendingChat> {
        if self.is_loading {
            return Err(CoreError::Busy);
        }
        if input.trim().is_empty() {
            return Err(CoreError::NotAllowed("message is empty".into()));
        }

        let history = self
            .messages
            .iter()
            .map(|m| HistoryEntry {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        self.push(Role::User, input.to_string());
        self.is_loading = true;

        Ok(PendingChat {
            prompt: input.to_string(),
            history,
            epoch: self.epoch,
        })
    }

    /// Land the model's reply (or failure) as exactly one assistant message.
    ///
    /// Returns false, changing nothing, when `pending` belongs to an earlier
    /// screen.
    pub fn finish(&mut self, pending: &PendingChat, outcome: std::result::Result<String, String>) -> bool {
        if pending.epoch != self.epoch {
            return false;
        }
        let content = match outcome {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_string(),
            Ok(text) => text,
            Err(_) => CHAT_FAILURE_FALLBACK.to_string(),
        };
        self.push(Role::Assistant, content);
        self.is_loading = false;
        true
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(Message {
            id: self.next_id.to_string(),
            role,
            content,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }
}

// ─────────────────────────────────────────────────────────
// Image studio
// ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// `data:` URI.
    pub url: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingImage {
    pub prompt: String,
    pub epoch: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStudio {
    /// Newest first.
    images: Vec<GeneratedImage>,
    prompt: String,
    is_generating: bool,
    notice: Option<String>,
    epoch: u64,
    next_id: u64,
}

impl ImageStudio {
    pub fn new(epoch: u64) -> Self {
        Self {
            images: Vec::new(),
            prompt: String::new(),
            is_generating: false,
            notice: None,
            epoch,
            next_id: 1,
        }
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn begin(&mut self, prompt: &str) -> Result<PendingImage> {
        if self.is_generating {
            return Err(CoreError::Busy);
        }
        if prompt.trim().is_empty() {
            return Err(CoreError::NotAllowed("prompt is empty".into()));
        }
        self.prompt = prompt.to_string();
        self.is_generating = true;
        self.notice = None;
        Ok(PendingImage {
            prompt: prompt.to_string(),
            epoch: self.epoch,
        })
    }

    /// Prepend the generated image, or keep the prompt and show a notice.
    pub fn finish(&mut self, pending: &PendingImage, outcome: std::result::Result<String, String>) -> bool {
        if pending.epoch != self.epoch {
            return false;
        }
        match outcome {
            Ok(url) => {
                self.images.insert(
                    0,
                    GeneratedImage {
                        id: self.next_id.to_string(),
                        url,
                        prompt: pending.prompt.clone(),
                        timestamp: Utc::now(),
                    },
                );
                self.next_id += 1;
                self.prompt.clear();
            }
            Err(_) => self.notice = Some(IMAGE_FAILURE_NOTICE.to_string()),
        }
        self.is_generating = false;
        true
    }
}
