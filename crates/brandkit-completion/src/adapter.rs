use crate::client::ChatCompletions;
use crate::config::{CompletionConfig, ConfigError};
use crate::events::FallbackEvent;
use crate::fallback::{FallbackConfigBuilder, FallbackLayer};
use crate::responder;
use brandkit_core::ClientError;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder, ServiceExt};

/// Returned when the remote call fails for any reason other than quota.
pub const APOLOGY: &str = "I apologize, but I'm having trouble processing your request at the \
moment. This could be due to high demand or a temporary service interruption. Please try again \
in a few moments.";

type CompletionService = BoxCloneSyncService<String, String, ClientError>;

/// Turns a prompt into an assistant reply without ever failing.
///
/// The remote answer is preferred. A quota failure is answered by the local
/// [responder](crate::respond); any other failure yields [`APOLOGY`].
///
/// # Examples
///
/// ```
/// use brandkit_completion::CompletionAdapter;
/// use brandkit_core::ClientError;
///
/// # async fn example() {
/// let adapter = CompletionAdapter::builder(tower::service_fn(|_prompt: String| async {
///     Err::<String, _>(ClientError::QuotaExceeded("429".into()))
/// }))
/// .build();
///
/// let reply = adapter.generate_response("Pick a color palette").await;
/// assert!(reply.contains("Primary:"));
/// # }
/// ```
#[derive(Clone)]
pub struct CompletionAdapter {
    service: CompletionService,
}

impl CompletionAdapter {
    /// The production adapter over [`ChatCompletions`].
    pub fn new(config: CompletionConfig) -> Self {
        Self::builder(ChatCompletions::new(config)).build()
    }

    /// Reads the API settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        CompletionConfig::from_env().map(Self::new)
    }

    /// Start from any remote service, e.g. a `tower::service_fn` fake.
    pub fn builder<S>(remote: S) -> CompletionAdapterBuilder
    where
        S: Service<String, Response = String, Error = ClientError> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        CompletionAdapterBuilder {
            remote: BoxCloneSyncService::new(remote),
            fallback: FallbackLayer::builder()
                .name("completion")
                .handle(ClientError::is_quota_exceeded)
                .from_request_error(|prompt: &String, _| responder::respond(prompt)),
        }
    }

    /// Answer `prompt`. Never fails.
    pub async fn generate_response(&self, prompt: &str) -> String {
        match self.service.clone().oneshot(prompt.to_string()).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, "completion failed, returning apology");
                APOLOGY.to_string()
            }
        }
    }
}

impl std::fmt::Debug for CompletionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionAdapter").finish_non_exhaustive()
    }
}

/// Builder for [`CompletionAdapter`].
pub struct CompletionAdapterBuilder {
    remote: CompletionService,
    fallback: FallbackConfigBuilder<String, String, ClientError>,
}

impl CompletionAdapterBuilder {
    /// Register a callback for fallback events (remote success, local answer,
    /// unhandled failure).
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&FallbackEvent) + Send + Sync + 'static,
    {
        self.fallback = self.fallback.on_event(f);
        self
    }

    pub fn build(self) -> CompletionAdapter {
        #[cfg(feature = "metrics")]
        metrics::describe_counter!(
            "completion_calls_total",
            "Total number of completion calls by outcome"
        );

        let service = ServiceBuilder::new()
            .layer(self.fallback.build())
            .service(self.remote);
        CompletionAdapter {
            service: BoxCloneSyncService::new(service),
        }
    }
}
