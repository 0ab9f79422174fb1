use telebridge_streamer::BridgeConfig;

use crate::integration::{create_test_bridge_with, init_tracing};
use crate::utils::MockRobot;

#[tokio::test]
async fn test_auto_start_when_both_ready() {
    init_tracing();

    let bridge = create_test_bridge_with(BridgeConfig::default(), MockRobot::new());

    bridge.viewer_ready().await;
    assert!(!bridge.status().await.streaming);

    bridge.robot_ready().await;

    assert!(bridge.wait_for_status(|s| s.streaming).await, "stream did not auto-start");
    assert!(bridge.signaling.wait_for_sent(1, 2000).await);
    assert_eq!(bridge.signaling.offers().len(), 1);
}

#[tokio::test]
async fn test_auto_start_on_viewer_after_robot() {
    let bridge = create_test_bridge_with(BridgeConfig::default(), MockRobot::new());

    bridge.robot_ready().await;
    bridge.viewer_ready().await;

    assert!(bridge.wait_for_status(|s| s.streaming).await);
}

#[tokio::test]
async fn test_manual_mode_waits_for_start() {
    let bridge = create_test_bridge_with(
        BridgeConfig {
            auto_start: false,
            ..BridgeConfig::default()
        },
        MockRobot::new(),
    );

    bridge.robot_ready().await;
    bridge.viewer_ready().await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert!(!bridge.status().await.streaming);
    assert!(bridge.signaling.offers().is_empty());
}
