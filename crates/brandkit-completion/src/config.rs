//! Configuration for the chat-completion client.

/// Environment variable holding the completion API key. Required.
pub const COMPLETION_API_KEY_ENV: &str = "BRANDKIT_COMPLETION_API_KEY";

/// Environment variable overriding the API base URL.
pub const COMPLETION_BASE_URL_ENV: &str = "BRANDKIT_COMPLETION_BASE_URL";

/// Environment variable overriding the model.
pub const COMPLETION_MODEL_ENV: &str = "BRANDKIT_COMPLETION_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// System prompt sent ahead of every user prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert branding assistant with deep knowledge of \
brand strategy, logo design and visual identity, color theory, marketing and messaging, brand voice \
and market positioning. Give specific, actionable advice tailored to the user's needs. When \
discussing design elements, be concrete about colors (use hex codes), fonts and visual principles.";

/// Startup errors of the completion client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration value {0}")]
    Missing(&'static str),
}

/// Settings of the remote completion API.
#[derive(Clone, PartialEq)]
pub struct CompletionConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) temperature: f32,
    pub(crate) max_tokens: u32,
    pub(crate) system_prompt: String,
}

impl CompletionConfig {
    /// Create a new builder around the API key.
    pub fn builder(api_key: impl Into<String>) -> CompletionConfigBuilder {
        CompletionConfigBuilder {
            config: CompletionConfig {
                api_key: api_key.into(),
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
                system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            },
        }
    }

    /// Reads the key, and optionally the base URL and model, from the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the same values as [`from_env`](Self::from_env) through
    /// `lookup`. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(COMPLETION_API_KEY_ENV).ok_or(ConfigError::Missing(COMPLETION_API_KEY_ENV))?;
        let mut builder = Self::builder(api_key);
        if let Some(url) = get(COMPLETION_BASE_URL_ENV) {
            builder = builder.base_url(url);
        }
        if let Some(model) = get(COMPLETION_MODEL_ENV) {
            builder = builder.model(model);
        }
        Ok(builder.build())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub(crate) fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Builder for [`CompletionConfig`].
#[derive(Debug)]
pub struct CompletionConfigBuilder {
    config: CompletionConfig,
}

impl CompletionConfigBuilder {
    /// Base URL of an OpenAI-compatible API.
    ///
    /// Default: `https://api.openai.com`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Default: `gpt-3.5-turbo`
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Default: 0.7
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Default: 1000
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn build(self) -> CompletionConfig {
        self.config
    }
}
