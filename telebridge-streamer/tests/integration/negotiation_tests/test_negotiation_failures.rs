use telebridge_streamer::{IceState, PeerEventKind};

use crate::integration::{create_test_bridge, init_tracing};
use crate::utils::MediaCall;

#[tokio::test]
async fn test_ice_failure_closes_session() {
    init_tracing();

    let bridge = create_test_bridge();
    let sink = bridge.start_streaming().await;

    sink.emit(PeerEventKind::IceConnectionState(IceState::Failed))
        .await;

    assert!(bridge.wait_for_status(|s| !s.streaming).await, "session survived ICE failure");
    let calls = bridge.media.calls().await;
    assert_eq!(calls[calls.len() - 2..], [MediaCall::CloseControl, MediaCall::Close]);

    // После сбоя можно начать заново
    bridge.handle.start().await.expect("restart rejected");
    assert_eq!(bridge.signaling.offers().len(), 2);
}

#[tokio::test]
async fn test_bad_answer_closes_session() {
    init_tracing();

    let bridge = create_test_bridge();
    bridge.media.fail_answer();
    let _sink = bridge.start_streaming().await;

    bridge.answer().await;

    assert!(bridge.wait_for_status(|s| !s.streaming).await);
    assert!(bridge.media.calls().await.contains(&MediaCall::Close));
}

#[tokio::test]
async fn test_offer_failure_rejects_start() {
    init_tracing();

    let bridge = create_test_bridge();
    bridge.media.fail_offer();
    bridge.viewer_ready().await;
    bridge.robot_ready().await;

    let res = bridge.handle.start().await;

    assert!(res.is_err());
    assert!(!bridge.status().await.streaming);
    assert!(bridge.signaling.offers().is_empty());
    assert!(bridge.media.calls().await.contains(&MediaCall::Close));
}

#[tokio::test]
async fn test_stale_session_events_are_dropped() {
    init_tracing();

    let bridge = create_test_bridge();
    let old_sink = bridge.start_streaming().await;
    bridge.handle.stop().await.unwrap();
    bridge.handle.start().await.unwrap();

    old_sink.emit(PeerEventKind::ControlChannelOpen).await;
    old_sink
        .emit(PeerEventKind::IceConnectionState(IceState::Failed))
        .await;

    // Статус обрабатывается после событий старой сессии
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let status = bridge.status().await;
    assert!(status.streaming, "stale ICE failure closed the new session");
    assert_eq!(
        status.control_state,
        Some(telebridge_streamer::ControlState::Opening)
    );
}
