//! Runtime configuration
//!
//! Credentials are never compiled in. The bearer token comes from the
//! environment (or whoever builds the config) and may be absent when only
//! local rendering is used.

use std::path::PathBuf;
use std::time::Duration;

use crate::rendering::{DEFAULT_FONT_SIZE, DEFAULT_WIDTH};
use crate::style::DEFAULT_STYLE;
use crate::{Error, Result};

pub const ENV_API_KEY: &str = "WORD2PIC_API_KEY";
pub const ENV_CHAT_ENDPOINT: &str = "WORD2PIC_CHAT_ENDPOINT";
pub const ENV_IMAGE_ENDPOINT: &str = "WORD2PIC_IMAGE_ENDPOINT";
pub const ENV_MODE: &str = "WORD2PIC_MODE";
pub const ENV_STORE: &str = "WORD2PIC_STORE";

/// How `generate` produces its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Draw the card locally
    #[default]
    Local,
    /// Ask the image-generation service for a picture
    Remote,
}

impl std::str::FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(RenderMode::Local),
            "remote" | "ai" => Ok(RenderMode::Remote),
            other => Err(Error::ConfigError(format!("unknown mode '{}'", other))),
        }
    }
}

/// Settings for the model provider
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Chat-completion endpoint used for summaries
    pub chat_endpoint: String,
    /// Image-generation endpoint
    pub image_endpoint: String,
    pub chat_model: String,
    pub image_model: String,
    /// Size string passed through to the image endpoint, e.g. "1024x1024"
    pub image_size: String,
    /// Prompt prefix for summaries; the user text follows after a blank line
    pub summary_instruction: String,
    /// Bearer token. `None` disables remote calls.
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: "https://ark.cn-beijing.volces.com/api/v3/chat/completions".to_string(),
            image_endpoint: "https://ark.cn-beijing.volces.com/api/v3/images/generations".to_string(),
            chat_model: "doubao-seed-1-6-vision-250815".to_string(),
            image_model: "doubao-seedream-3-0-t2i-250415".to_string(),
            image_size: "1024x1024".to_string(),
            summary_instruction: "请对以下文本进行简洁的总结，保留核心内容：".to_string(),
            api_key: None,
            timeout_ms: 30000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that both endpoints are absolute http(s) URLs
    #[cfg(feature = "remote")]
    pub fn validate(&self) -> Result<()> {
        for endpoint in [&self.chat_endpoint, &self.image_endpoint] {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| Error::ConfigError(format!("bad endpoint '{}': {}", endpoint, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::ConfigError(format!(
                    "endpoint '{}' must be http or https",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

/// Top-level application configuration
///
/// # Examples
///
/// ```
/// let cfg = word2pic::AppConfig::default();
/// assert_eq!(cfg.width, 300);
/// assert!(cfg.api.api_key.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width: u32,
    pub font_size: u32,
    /// Style selected when nothing else is chosen
    pub default_style: String,
    pub mode: RenderMode,
    /// How long a control stays disabled after a failed remote call
    pub cooldown_ms: u64,
    /// Where the last text / image reference are persisted. `None` keeps them in memory.
    pub store_path: Option<PathBuf>,
    pub api: ApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            default_style: DEFAULT_STYLE.to_string(),
            mode: RenderMode::Local,
            cooldown_ms: 2000,
            store_path: None,
            api: ApiConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Defaults overlaid with `WORD2PIC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; empty values are ignored
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(key) = get(ENV_API_KEY) {
            cfg.api.api_key = Some(key.trim().to_string());
        }
        if let Some(endpoint) = get(ENV_CHAT_ENDPOINT) {
            cfg.api.chat_endpoint = endpoint;
        }
        if let Some(endpoint) = get(ENV_IMAGE_ENDPOINT) {
            cfg.api.image_endpoint = endpoint;
        }
        if let Some(mode) = get(ENV_MODE) {
            cfg.mode = mode.parse()?;
        }
        if let Some(path) = get(ENV_STORE) {
            cfg.store_path = Some(PathBuf::from(path));
        }

        #[cfg(feature = "remote")]
        cfg.api.validate()?;

        Ok(cfg)
    }
}
