//! Tests for the resilient gateway.
//!
//! - offline.rs: the offline gate short-circuits before retry
//! - retry.rs: transient failures are retried with linear backoff
//! - http.rs: end-to-end against a mock server

mod http;
mod offline;
mod retry;

use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor};
use brandkit_gateway::{Gateway, GatewayBuilder, GatewayConfig, MemoryStorage};
use std::sync::Arc;

pub(crate) fn monitor(online: bool) -> Arc<ConnectivityMonitor> {
    Arc::new(ConnectivityMonitor::new(
        move || async move { online },
        ConnectivityConfig::default(),
    ))
}

pub(crate) fn builder(url: &str, online: bool) -> GatewayBuilder {
    Gateway::builder(GatewayConfig::new(url, "anon-key").unwrap())
        .monitor(monitor(online))
        .session_storage(MemoryStorage::new())
        .self_check_on_start(false)
}
