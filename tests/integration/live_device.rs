//! Live polling and fallback against a mocked device

use std::time::Duration;

use envmon::alerts::{AlertMetric, Severity};
use envmon::connection::{Mode, Phase};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_live_reading_is_published() {
    let device = mock_device(calm_report()).await;
    let handle = spawn_monitor(&manual_config()).await;

    handle.connect(device_address(&device)).unwrap();
    let snapshot = handle.poll_now().await.unwrap();

    assert_eq!(snapshot.connection.phase(), Phase::Live);
    let reading = snapshot.reading.unwrap();
    assert_eq!(reading.temperature, 21.5);
    assert_eq!(reading.air_quality, 92.0);
    assert_eq!(reading.co2, 430.0);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_live_reading_raises_alerts() {
    let device = mock_device(serde_json::json!({
        "temperature": 16,
        "humidity": 55,
        "air_quality": 90,
        "co2": 900
    }))
    .await;
    let handle = spawn_monitor(&manual_config()).await;
    let baseline = handle.snapshot().alerts.len();

    handle.connect(device_address(&device)).unwrap();
    let snapshot = handle.poll_now().await.unwrap();

    let new_alerts = &snapshot.alerts[..snapshot.alerts.len() - baseline];
    assert_eq!(new_alerts.len(), 2);

    assert_eq!(new_alerts[0].metric, AlertMetric::Temperature);
    assert_eq!(new_alerts[0].severity, Severity::Warning);
    assert_eq!(new_alerts[0].message, "Temperature too low: 16°C");

    assert_eq!(new_alerts[1].metric, AlertMetric::AirQuality);
    assert_eq!(new_alerts[1].severity, Severity::Critical);
    assert!(new_alerts[1].message.contains("900"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_timeout_falls_back_within_same_tick() {
    let device = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(calm_report())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&device)
        .await;

    let handle = spawn_monitor(&manual_config()).await;

    handle.connect(device_address(&device)).unwrap();
    let before = handle.snapshot().tick;
    let snapshot = handle.poll_now().await.unwrap();

    assert_eq!(snapshot.tick, before + 1);
    assert_has_reading(&snapshot);
    assert_eq!(snapshot.connection.mode, Mode::Simulated);
    assert!(!snapshot.connection.live_connected);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_http_error_falls_back() {
    let device = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&device)
        .await;

    let handle = spawn_monitor(&manual_config()).await;

    handle.connect(device_address(&device)).unwrap();
    let snapshot = handle.poll_now().await.unwrap();

    assert_has_reading(&snapshot);
    assert_eq!(snapshot.connection.phase(), Phase::Simulated);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let device = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&device)
        .await;

    let handle = spawn_monitor(&manual_config()).await;

    handle.connect(device_address(&device)).unwrap();
    let snapshot = handle.poll_now().await.unwrap();

    assert_has_reading(&snapshot);
    assert_eq!(snapshot.connection.phase(), Phase::Simulated);
    // simulated readings stay within the simulator's band
    let temperature = snapshot.reading.unwrap().temperature;
    assert!((19.0..=25.0).contains(&temperature));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fallback_is_sticky_until_reconnect() {
    let device = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&device)
        .await;

    let handle = spawn_monitor(&manual_config()).await;

    handle.connect(device_address(&device)).unwrap();
    handle.poll_now().await.unwrap();

    // further polls stay simulated and never hit the device again
    for _ in 0..3 {
        let snapshot = handle.poll_now().await.unwrap();
        assert_eq!(snapshot.connection.mode, Mode::Simulated);
    }

    handle.shutdown().await.unwrap();
    device.verify().await;
}
