use serde_json::json;
use telebridge_streamer::{ControlState, PeerEventKind};

use crate::integration::{create_test_bridge, init_tracing};
use crate::utils::{MediaCall, RobotCall};

#[tokio::test]
async fn test_command_round_trip_over_control_channel() {
    init_tracing();

    let bridge = create_test_bridge();
    let sink = bridge.connect().await;

    let res = bridge
        .request(
            &sink,
            json!({"type": "robot_command", "command": "tilt_to_angle", "params": {"angle": 30}, "commandId": "t-1"}),
        )
        .await;

    assert_eq!(res["commandId"], "t-1");
    assert_eq!(res["success"], true);
    assert_eq!(res["message"], "Head tilted to 30°");
    assert!(res["timestamp"].as_u64().unwrap() > 0);
    assert_eq!(bridge.status().await.tilt.degrees(), 30);
}

#[tokio::test]
async fn test_response_precedes_followups() {
    let bridge = create_test_bridge();
    let sink = bridge.connect().await;
    let before = bridge.media.sent_control().await.len();

    bridge
        .command(
            &sink,
            json!({"type": "robot_command", "command": "get_locations", "commandId": "g-1"}),
        )
        .await;
    assert!(
        bridge
            .media
            .wait_for(before + 2, 2000, |c| matches!(c, MediaCall::SendControl(_)))
            .await
    );

    let sent = bridge.media.sent_control().await;
    assert_eq!(sent[before]["type"], "robot_response");
    assert_eq!(sent[before + 1]["type"], "location_update");
    assert_eq!(sent[before + 1]["locations"], json!(["home base", "kitchen"]));
}

#[tokio::test]
async fn test_foreign_frames_are_ignored() {
    let bridge = create_test_bridge();
    let sink = bridge.connect().await;

    bridge
        .command(&sink, json!({"type": "chat", "text": "hi"}))
        .await;
    sink.emit(PeerEventKind::ControlMessage("not json".into()))
        .await;
    bridge
        .command(&sink, json!({"type": "robot_command", "command": "turn_around"}))
        .await;

    assert!(bridge.robot.wait_for_call(&RobotCall::TurnBy(180), 2000).await);
    assert!(bridge.media.sent_of_type("robot_response").await.is_empty());
}

#[tokio::test]
async fn test_closed_channel_drops_outbound() {
    let bridge = create_test_bridge();
    let sink = bridge.connect().await;

    sink.emit(PeerEventKind::ControlChannelClosed).await;
    assert!(
        bridge
            .wait_for_status(|s| s.control_state == Some(ControlState::Closed))
            .await
    );
    let before = bridge.media.sent_control().await.len();

    bridge
        .command(
            &sink,
            json!({"type": "robot_command", "command": "stop", "commandId": "s-1"}),
        )
        .await;

    assert!(bridge.robot.wait_for_call(&RobotCall::StopMovement, 2000).await);
    assert_eq!(bridge.media.sent_control().await.len(), before);
}
