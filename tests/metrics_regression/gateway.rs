//! Gateway metrics regression tests

use super::helpers::*;
use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor};
use brandkit_core::ClientError;
use brandkit_gateway::{Gateway, GatewayConfig, RemoteRequest, RemoteResponse};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn gateway_outcomes_are_counted() {
    init_recorder();

    let online = Gateway::builder(GatewayConfig::new("https://abc.example.co", "anon").unwrap())
        .monitor(Arc::new(ConnectivityMonitor::new(
            || async { true },
            ConnectivityConfig::default(),
        )))
        .self_check_on_start(false)
        .transport(tower::service_fn(|_req: RemoteRequest| async {
            Ok::<_, ClientError>(RemoteResponse::new(200, "[]"))
        }))
        .build();
    let _: Result<Vec<serde_json::Value>, _> = online.from("projects").fetch().await;

    let offline = Gateway::builder(GatewayConfig::new("https://abc.example.co", "anon").unwrap())
        .monitor(Arc::new(ConnectivityMonitor::new(
            || async { false },
            ConnectivityConfig::default(),
        )))
        .self_check_on_start(false)
        .build();
    let _: Result<Vec<serde_json::Value>, _> = offline.from("projects").fetch().await;

    assert_counter_exists("gateway_requests_total");
    assert_metric_has_label("gateway_requests_total", "result", "ok");
    assert_metric_has_label("gateway_requests_total", "result", "offline");
}
