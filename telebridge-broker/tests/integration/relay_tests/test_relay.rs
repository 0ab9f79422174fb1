use serde_json::json;
use std::net::SocketAddr;

use crate::integration::{init_tracing, spawn_broker, wait_for_link};
use crate::utils::TestClient;

async fn paired(addr: SocketAddr) -> (TestClient, TestClient) {
    let mut streamer = TestClient::register(addr, "streamer").await.unwrap();
    assert!(wait_for_link(addr, "streamer", "connected").await);
    let viewer = TestClient::register(addr, "viewer").await.unwrap();
    assert!(streamer.recv_type("viewer-ready", 2000).await.is_some());
    (streamer, viewer)
}

#[tokio::test]
async fn test_offer_answer_and_candidates() {
    init_tracing();

    let addr = spawn_broker().await;
    let (mut streamer, mut viewer) = paired(addr).await;

    let offer = json!({"type": "offer", "offer": {"type": "offer", "sdp": "v=0 offer"}});
    streamer.send(offer.clone()).await.unwrap();
    assert_eq!(viewer.recv_type("offer", 2000).await, Some(offer));

    let answer = json!({"type": "answer", "answer": {"type": "answer", "sdp": "v=0 answer"}});
    viewer.send(answer.clone()).await.unwrap();
    assert_eq!(streamer.recv_type("answer", 2000).await, Some(answer));

    let from_streamer = json!({"type": "candidate", "candidate": {"sdpMid": "0", "sdpMLineIndex": 0, "candidate": "candidate:1"}});
    let from_viewer = json!({"type": "candidate", "candidate": {"sdpMid": "0", "sdpMLineIndex": 0, "candidate": "candidate:2"}});
    streamer.send(from_streamer.clone()).await.unwrap();
    viewer.send(from_viewer.clone()).await.unwrap();

    assert_eq!(viewer.recv_type("candidate", 2000).await, Some(from_streamer));
    assert_eq!(streamer.recv_type("candidate", 2000).await, Some(from_viewer));
}

#[tokio::test]
async fn test_robot_command_and_response() {
    let addr = spawn_broker().await;
    let (mut streamer, mut viewer) = paired(addr).await;

    let command = json!({"type": "robot_command", "command": "stop", "commandId": "c-1"});
    viewer.send(command.clone()).await.unwrap();
    assert_eq!(streamer.recv_type("robot_command", 2000).await, Some(command));

    let response = json!({"type": "robot_response", "commandId": "c-1", "success": true, "message": "Movement stopped", "timestamp": 1});
    streamer.send(response.clone()).await.unwrap();
    assert_eq!(viewer.recv_type("robot_response", 2000).await, Some(response));
}

#[tokio::test]
async fn test_robot_command_without_robot() {
    init_tracing();

    let addr = spawn_broker().await;
    let mut viewer = TestClient::register(addr, "viewer").await.unwrap();
    assert!(wait_for_link(addr, "viewer", "connected").await);

    viewer
        .send(json!({"type": "robot_command", "command": "move", "commandId": "c-7"}))
        .await
        .unwrap();

    let res = viewer.recv_type("robot_response", 2000).await.expect("no response");
    assert_eq!(res["success"], false);
    assert_eq!(res["error"], "Robot not connected");
    assert_eq!(res["commandId"], "c-7");
}

#[tokio::test]
async fn test_offer_without_viewer_is_dropped() {
    let addr = spawn_broker().await;
    let mut streamer = TestClient::register(addr, "streamer").await.unwrap();

    streamer
        .send(json!({"type": "offer", "offer": {"sdp": "v=0"}}))
        .await
        .unwrap();

    assert!(streamer.is_silent(200).await);
}
