//! End-to-end tests of the completion adapter against a mock API.
//!
//! - fallback.rs: quota errors fall back to local answers, others apologize
//! - events.rs: fallback events reach registered listeners

mod events;
mod fallback;

use brandkit_completion::{CompletionAdapter, CompletionConfig};
use wiremock::MockServer;

pub(crate) fn adapter(server: &MockServer) -> CompletionAdapter {
    CompletionAdapter::new(
        CompletionConfig::builder("sk-test")
            .base_url(server.uri())
            .build(),
    )
}
