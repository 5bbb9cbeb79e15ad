//! Presentation intents against a running monitor

use envmon::connection::{Mode, Phase};
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test]
async fn test_toggle_on_then_off_without_connect() {
    let handle = spawn_monitor(&manual_config()).await;
    let mut rx = handle.subscribe();

    handle.toggle_simulation().unwrap();
    rx.wait_for(|s| s.connection.mode == Mode::Live).await.unwrap();
    assert!(!handle.snapshot().connection.live_connected);

    handle.toggle_simulation().unwrap();
    rx.wait_for(|s| s.connection.mode == Mode::Simulated)
        .await
        .unwrap();
    assert!(!handle.snapshot().connection.live_connected);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_keeps_live_mode_until_next_poll() {
    let device = mock_device(calm_report()).await;
    let handle = spawn_monitor(&manual_config()).await;

    handle.connect(device_address(&device)).unwrap();
    handle.poll_now().await.unwrap();

    let mut rx = handle.subscribe();
    handle.disconnect().unwrap();
    let snapshot = rx
        .wait_for(|s| !s.connection.live_connected)
        .await
        .unwrap()
        .clone();

    assert_eq!(snapshot.connection.mode, Mode::Live);
    assert_eq!(snapshot.connection.phase(), Phase::ConnectingLive);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_intents_are_published_without_a_poll() {
    let handle = spawn_monitor(&manual_config()).await;
    let tick = handle.snapshot().tick;
    let mut rx = handle.subscribe();

    handle.connect("192.0.2.10").unwrap();
    let snapshot = rx
        .wait_for(|s| s.connection.target_address.is_some())
        .await
        .unwrap()
        .clone();

    assert_eq!(snapshot.tick, tick);
    assert_eq!(snapshot.connection.phase(), Phase::Live);
    assert_eq!(
        snapshot.connection.target_address.as_deref(),
        Some("192.0.2.10")
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dismiss_unknown_alert_leaves_feed_unchanged() {
    // large enough that nothing is evicted during the test
    let config = envmon::config::Config {
        feed_capacity: 100,
        ..manual_config()
    };
    let handle = spawn_monitor(&config).await;
    let before = handle.poll_now().await.unwrap().alerts;

    handle.dismiss_alert("temp-cold-does-not-exist").unwrap();
    // commands are handled in order, so the dismissal happened before this poll
    let after = handle.poll_now().await.unwrap().alerts;

    let added = after.len() - before.len();
    assert_eq!(&after[added..], &before[..]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dropping_every_handle_stops_polling() {
    let handle = spawn_monitor(&manual_config()).await;
    let mut rx = handle.subscribe();

    drop(handle);

    // the actor exits and drops its sender
    while rx.changed().await.is_ok() {}
}
