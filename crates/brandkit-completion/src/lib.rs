//! Chat completions for the branding assistant.
//!
//! [`CompletionAdapter::generate_response`] turns a prompt into a reply and
//! never fails:
//!
//! - the remote answer from an OpenAI-compatible API ([`ChatCompletions`]) when
//!   the call succeeds
//! - a canned local answer ([`respond`]) when the API reports a rate limit or
//!   exhausted quota
//! - [`APOLOGY`] for every other failure
//!
//! The quota handling is a Tower [`FallbackLayer`] whose handle predicate
//! accepts only [`ClientError::QuotaExceeded`](brandkit_core::ClientError::QuotaExceeded).
//!
//! ```rust,no_run
//! use brandkit_completion::CompletionAdapter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = CompletionAdapter::from_env()?;
//! println!("{}", adapter.generate_response("Suggest a tagline for a bakery").await);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod client;
mod config;
mod events;
mod fallback;
mod responder;

pub use adapter::{CompletionAdapter, CompletionAdapterBuilder, APOLOGY};
pub use client::ChatCompletions;
pub use config::{
    CompletionConfig, CompletionConfigBuilder, ConfigError, COMPLETION_API_KEY_ENV,
    COMPLETION_BASE_URL_ENV, COMPLETION_MODEL_ENV, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
};
pub use events::FallbackEvent;
pub use fallback::{
    Fallback, FallbackConfig, FallbackConfigBuilder, FallbackLayer, FromRequestErrorFn,
    HandlePredicate,
};
pub use responder::{respond, Topic};
