//! Gemini REST client behind the [`Assistant`] seam.
//!
//! Every call is a single `generateContent` request with no retry; callers
//! decide how a failure degrades (fallback text in chat, a notice in the
//! image studio, canned text from the charity bot).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use leshan_core::assistant::{HistoryEntry, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{GatewayError, Result};

pub const LUMINA_INSTRUCTION: &str = "You are Lumina, an advanced AI assistant powered by Gemini 3 Pro. Provide insightful, accurate, and professional help.";
pub const CHARITY_BOT_INSTRUCTION: &str = "你现在是'乐善市南'慈善平台的公益助手。请以亲切、专业且透明的态度回答用户关于捐款去向、政策解读及项目详情的问题。回答要简洁，多使用鼓励公益的话语。";

const DEFAULT_IMAGE_MIME: &str = "image/png";

#[async_trait]
pub trait Assistant: Send + Sync {
    /// One Lumina chat turn; `history` precedes `prompt`.
    async fn chat(&self, prompt: &str, history: &[HistoryEntry]) -> Result<String>;

    /// Generate a square image and return it as a `data:` URI.
    async fn generate_image(&self, prompt: &str) -> Result<String>;

    /// Answer a donor question on the home screen.
    async fn ask_charity_bot(&self, query: &str) -> Result<String>;
}

// ─────────────────────────────────────────────────────────
// generateContent wire shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Content {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }

    /// Parts without a role, as used for system instructions.
    fn bare(text: &str) -> Self {
        Content {
            role: None,
            ..Content::text("", text)
        }
    }
}

impl GenerateResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate.
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// The first inline image of the first candidate, as a `data:` URI.
    pub fn image_data_uri(&self) -> Result<String> {
        let inline = self
            .first_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .ok_or_else(|| GatewayError::Ai("No image part found in response".to_string()))?;

        STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| GatewayError::Ai(format!("Image payload is not valid base64: {e}")))?;

        let mime = inline.mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME);
        Ok(format!("data:{mime};base64,{}", inline.data))
    }
}

/// Build the turn list for a chat call: history with `assistant → model`,
/// then the new prompt as a user turn.
pub fn chat_contents(prompt: &str, history: &[HistoryEntry]) -> Vec<Content> {
    history
        .iter()
        .map(|h| {
            let role = match h.role {
                Role::Assistant => "model",
                Role::User => "user",
            };
            Content::text(role, &h.content)
        })
        .chain(std::iter::once(Content::text("user", prompt)))
        .collect()
}

// ─────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    bot_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &Config) -> Self {
        GeminiClient {
            client,
            base_url: config.gemini_api_url.clone(),
            api_key: config.gemini_api_key.clone(),
            chat_model: config.chat_model.clone(),
            bot_model: config.bot_model.clone(),
            image_model: config.image_model.clone(),
        }
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Config("GEMINI_API_KEY is not set".to_string()))?;
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%model, %status, "Gemini request rejected");
            return Err(GatewayError::Ai(format!("{status}: {body}")));
        }

        let body: GenerateResponse = resp.json().await?;
        debug!(%model, candidates = body.candidates.len(), "Gemini response");
        Ok(body)
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    async fn chat(&self, prompt: &str, history: &[HistoryEntry]) -> Result<String> {
        let request = GenerateRequest {
            contents: chat_contents(prompt, history),
            system_instruction: Some(Content::bare(LUMINA_INSTRUCTION)),
            generation_config: None,
        };
        Ok(self.generate(&self.chat_model, &request).await?.text())
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::bare(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: ImageConfig { aspect_ratio: "1:1" },
            }),
        };
        self.generate(&self.image_model, &request)
            .await?
            .image_data_uri()
    }

    async fn ask_charity_bot(&self, query: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::text("user", query)],
            system_instruction: Some(Content::bare(CHARITY_BOT_INSTRUCTION)),
            generation_config: None,
        };
        Ok(self.generate(&self.bot_model, &request).await?.text())
    }
}
