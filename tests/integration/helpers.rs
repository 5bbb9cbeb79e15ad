//! Test helpers for integration tests

use std::sync::Arc;
use std::time::Duration;

use envmon::{
    actors::{messages::Snapshot, monitor::MonitorHandle},
    config::Config,
    sources::DeviceSource,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config that only polls when asked to
pub fn manual_config() -> Config {
    Config {
        poll_interval_ms: 3_600_000,
        fetch_timeout_ms: 300,
        ..Config::default()
    }
}

/// Spawn a monitor backed by the HTTP device source and wait for its first poll
pub async fn spawn_monitor(config: &Config) -> MonitorHandle {
    let source = DeviceSource::new(config.fetch_timeout()).unwrap();
    let handle = MonitorHandle::spawn(config, Arc::new(source));

    let mut rx = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.tick >= 1))
        .await
        .expect("first poll did not complete")
        .unwrap();

    handle
}

/// `host:port` of a mock server, the form users type into the connect dialog
pub fn device_address(server: &MockServer) -> String {
    let url = url::Url::parse(&server.uri()).unwrap();
    format!("{}:{}", url.host_str().unwrap(), url.port().unwrap())
}

/// Mock device answering with the given JSON body
pub async fn mock_device(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    server
}

/// A report with every value inside its comfortable band
pub fn calm_report() -> serde_json::Value {
    serde_json::json!({
        "temperature": 21.5,
        "humidity": 55.0,
        "air_quality": 92,
        "ammonia": 3.1,
        "co2": 430,
        "dust": 12.0
    })
}

pub fn assert_has_reading(snapshot: &Snapshot) {
    assert!(snapshot.reading.is_some(), "snapshot has no reading");
}
