//! Reachability probes.

use futures::future::BoxFuture;
use reqwest::header::CACHE_CONTROL;
use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default resource probed by [`HttpProbe`].
pub const DEFAULT_PROBE_URL: &str = "https://www.google.com/favicon.ico";

/// Trait for checking whether the network is reachable.
///
/// # Examples
///
/// Using a closure (via blanket impl):
///
/// ```rust
/// use brandkit_connectivity::ConnectivityProbe;
///
/// let always_online = || async { true };
/// # let _ = &always_online;
/// ```
///
/// Implementing the trait:
///
/// ```rust
/// use brandkit_connectivity::ConnectivityProbe;
///
/// struct Airplane;
///
/// impl ConnectivityProbe for Airplane {
///     async fn check(&self) -> bool {
///         false
///     }
/// }
/// ```
pub trait ConnectivityProbe: Send + Sync {
    /// Returns `true` when a remote resource answered, `false` otherwise.
    fn check(&self) -> impl Future<Output = bool> + Send;
}

impl<F, Fut> ConnectivityProbe for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    fn check(&self) -> impl Future<Output = bool> + Send {
        self()
    }
}

/// Object-safe view of a probe so the monitor does not carry a type parameter.
pub(crate) trait DynProbe: Send + Sync {
    fn check_boxed(&self) -> BoxFuture<'_, bool>;
}

impl<P> DynProbe for P
where
    P: ConnectivityProbe,
{
    fn check_boxed(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.check())
    }
}

/// Probe issuing a cache-busting `HEAD` request to a well-known resource.
///
/// Any completed response counts as reachable, whatever its status code.
/// Only a transport failure (DNS, refused connection, TLS) reports offline.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    /// Creates a probe for `url` with a fresh HTTP client.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a probe sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Returns the probed URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_URL)
    }
}

impl ConnectivityProbe for HttpProbe {
    async fn check(&self) -> bool {
        let buster = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        match self
            .client
            .head(&self.url)
            .query(&[("_", buster.to_string())])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
        {
            Ok(response) => {
                tracing::trace!(url = %self.url, status = %response.status(), "probe answered");
                true
            }
            Err(error) => {
                tracing::debug!(url = %self.url, %error, "probe failed");
                false
            }
        }
    }
}
