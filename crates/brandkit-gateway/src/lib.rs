//! The resilient client gateway.
//!
//! [`Gateway`] is the only way the client core talks to the hosted backend:
//! a REST table API, an email/password auth service and object storage. Every
//! request passes through the same Tower stack:
//!
//! 1. [`OfflineGate`] probes connectivity and fails with
//!    [`ClientError::Offline`](brandkit_core::ClientError::Offline) without
//!    sending anything when the network is down.
//! 2. A [`brandkit_retry::RetryLayer`] retries transient delivery failures up
//!    to 3 times with linear backoff (1 s, 2 s, 3 s).
//! 3. The transport, [`HttpTransport`] by default, delivers the request.
//!
//! HTTP rejections come back as responses and are turned into
//! [`ClientError::RemoteRejected`](brandkit_core::ClientError::RemoteRejected)
//! after the stack, so they are never retried.
//!
//! # Configuration
//!
//! The gateway needs the base URL and the anonymous key, read from
//! `BRANDKIT_STORE_URL` and `BRANDKIT_STORE_ANON_KEY`. Missing either one is a
//! [`ConfigError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use brandkit_gateway::{FileStorage, Gateway, GatewayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::builder(GatewayConfig::from_env()?)
//!     .session_storage(FileStorage::new("/tmp/brandkit/session.json"))
//!     .build();
//!
//! gateway
//!     .auth()
//!     .sign_in_with_password("ada@example.com", "correct horse")
//!     .await?;
//!
//! let keywords: Vec<serde_json::Value> = gateway
//!     .from("market_research")
//!     .eq("user_id", gateway.auth().current_user()?.id)
//!     .fetch()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod gate;
mod gateway;
mod request;
mod session;
mod storage;
mod table;
mod transport;

pub use auth::{Auth, SignUp, REFRESH_MARGIN};
pub use config::{ConfigError, GatewayConfig, STORE_ANON_KEY_ENV, STORE_URL_ENV};
pub use gate::{OfflineGate, OfflineGateLayer};
pub use gateway::{Gateway, GatewayBuilder};
pub use request::{RemoteRequest, RemoteResponse};
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, User};
pub use storage::Bucket;
pub use table::{Mutation, TableQuery};
pub use transport::{BoxTransport, HttpTransport};
