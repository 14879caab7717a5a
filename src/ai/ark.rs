//! HTTP client for a chat-completion / image-generation provider

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::ModelProvider;
use crate::config::ApiConfig;
use crate::{Error, Result};

#[derive(Debug, Serialize)]
struct ContentPart<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

/// HTTP implementation of [`ModelProvider`]
pub struct ArkClient {
    client: Client,
    config: ApiConfig,
}

impl fmt::Debug for ArkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArkClient")
            .field("chat_endpoint", &self.config.chat_endpoint)
            .field("image_endpoint", &self.config.image_endpoint)
            .field("api_key", &self.config.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ArkClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn token(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::ConfigError("no API key configured".into()))
    }

    fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let token = self.token()?;
        log::debug!("POST {}", endpoint);

        let resp = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .json(body)
            .send()
            .map_err(|e| Error::NetworkError(format!("Failed to reach {}: {}", endpoint, e)))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("{} answered {}", endpoint, status);
            return Err(Error::ApiError {
                status: status.as_u16(),
            });
        }

        let text = resp
            .text()
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;
        serde_json::from_str(&text).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

fn non_empty(input: &str) -> Result<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("text is empty".into()));
    }
    Ok(trimmed)
}

impl ModelProvider for ArkClient {
    fn summarize(&self, text: &str) -> Result<String> {
        let text = non_empty(text)?;
        let prompt = format!("{}\n\n{}", self.config.summary_instruction, text);
        let req = ChatRequest {
            model: &self.config.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![ContentPart {
                    kind: "text",
                    text: &prompt,
                }],
            }],
        };

        let resp: ChatResponse = self.post_json(&self.config.chat_endpoint, &req)?;
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::MalformedResponse("missing choices[0].message.content".into()))
    }

    fn generate_image(&self, prompt: &str) -> Result<String> {
        let prompt = non_empty(prompt)?;
        let req = ImageRequest {
            model: &self.config.image_model,
            prompt,
            size: &self.config.image_size,
            response_format: "url",
        };

        let resp: ImageResponse = self.post_json(&self.config.image_endpoint, &req)?;
        resp.data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::MalformedResponse("missing data[0].url".into()))
    }
}
