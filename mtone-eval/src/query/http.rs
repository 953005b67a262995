//! OpenAI-compatible chat-completions client
//!
//! Both providers are reached through the same `/chat/completions` shape:
//! the prompt and the base64 audio travel as one user message with a `text`
//! part and an `input_audio` part. OpenAI audio models reject text-only
//! output, so they are additionally asked for `modalities: ["text", "audio"]`
//! and the reply text may come back as the audio transcript instead of
//! `content`.

use super::{QueryError, ToneQuerier, TONE_PROMPT};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mtone_common::config::{resolve_api_key, EvalConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("mtone/", env!("CARGO_PKG_VERSION"));

/// API family, taken from the `provider/` prefix of a model id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    /// Split `provider/model` into the provider and the bare model name
    pub fn from_model_id(model: &str) -> Result<(Self, &str), QueryError> {
        let (prefix, name) = model
            .split_once('/')
            .filter(|(_, name)| !name.is_empty())
            .ok_or_else(|| QueryError::UnsupportedModel(model.to_string()))?;

        match prefix {
            "openai" => Ok((Provider::OpenAi, name)),
            "gemini" => Ok((Provider::Gemini, name)),
            _ => Err(QueryError::UnsupportedModel(model.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }
}

/// `mp3` for `.mp3` files (any case), otherwise `wav`
pub fn audio_format(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("mp3") => "mp3",
        _ => "wav",
    }
}

/// Chat-completions request body for one clip
pub fn build_request_body(
    provider: Provider,
    model_name: &str,
    audio_b64: &str,
    format: &str,
) -> Value {
    let mut body = json!({
        "model": model_name,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": TONE_PROMPT },
                { "type": "input_audio", "input_audio": { "data": audio_b64, "format": format } },
            ],
        }],
    });

    if provider == Provider::OpenAi {
        body["modalities"] = json!(["text", "audio"]);
        body["audio"] = json!({ "voice": "alloy", "format": "wav" });
    }
    body
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    audio: Option<AudioReply>,
}

#[derive(Debug, Deserialize)]
struct AudioReply {
    transcript: Option<String>,
}

/// Reply text: message content, else the audio transcript, else empty
fn reply_text(response: ChatResponse) -> String {
    let Some(message) = response.choices.into_iter().next().map(|c| c.message) else {
        return String::new();
    };

    let content = message.content.as_deref().map(str::trim).unwrap_or_default();
    if !content.is_empty() {
        return content.to_string();
    }

    message
        .audio
        .and_then(|a| a.transcript)
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// HTTP implementation of [`ToneQuerier`]
pub struct HttpQuerier {
    http_client: reqwest::Client,
    openai_base_url: String,
    gemini_base_url: String,
    openai_api_key: Option<String>,
    gemini_api_key: Option<String>,
}

impl HttpQuerier {
    /// Build a client from the `[eval]` config; keys resolve ENV → TOML
    pub fn new(config: &EvalConfig) -> Result<Self, QueryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QueryError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            openai_base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            gemini_base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            openai_api_key: resolve_api_key(
                "OpenAI",
                &["OPENAI_API_KEY"],
                config.openai_api_key.as_deref(),
            ),
            gemini_api_key: resolve_api_key(
                "Gemini",
                &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
                config.gemini_api_key.as_deref(),
            ),
        })
    }

    fn endpoint(&self, provider: Provider) -> Result<(String, &str), QueryError> {
        let (base, key) = match provider {
            Provider::OpenAi => (&self.openai_base_url, &self.openai_api_key),
            Provider::Gemini => (&self.gemini_base_url, &self.gemini_api_key),
        };
        let key = key.as_deref().ok_or(QueryError::MissingApiKey(provider.label()))?;
        Ok((format!("{}/chat/completions", base), key))
    }
}

#[async_trait]
impl ToneQuerier for HttpQuerier {
    async fn query(&self, model: &str, audio_path: &Path) -> Result<String, QueryError> {
        let (provider, model_name) = Provider::from_model_id(model)?;
        let (url, api_key) = self.endpoint(provider)?;

        let bytes = tokio::fs::read(audio_path).await.map_err(|source| QueryError::Audio {
            path: audio_path.display().to_string(),
            source,
        })?;
        let body = build_request_body(
            provider,
            model_name,
            &STANDARD.encode(&bytes),
            audio_format(audio_path),
        );

        tracing::debug!(model = %model, bytes = bytes.len(), "Sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(QueryError::ApiError(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| QueryError::ParseError(e.to_string()))?;

        Ok(reply_text(chat))
    }
}
