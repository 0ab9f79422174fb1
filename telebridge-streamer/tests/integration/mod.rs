//! Integration tests for telebridge-streamer.
//!
//! Tests are organized by functionality:
//! - `command_tests` - viewer commands against the dispatcher
//! - `negotiation_tests` - offer/answer and ICE ordering within a session
//! - `coordinator_tests` - start/stop gating, telemetry and teardown
//! - `signaling_tests` - the WebSocket client against a live broker
//! - `transport_tests` - the webrtc-rs adapter against an in-process viewer peer


use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use telebridge_core::{IceCandidate, SignalingMessage};
use telebridge_streamer::{
    BridgeConfig, BridgeStatus, ControlState, Coordinator, CoordinatorHandle, CoordinatorParts,
    IceState, PeerEventKind, PeerEventSink, RobotEvent, SignalingEvent,
};
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::{MediaCall, MockMediaConnector, MockRobot, MockSignalingOutput};

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Poll `check` until it holds or `timeout_ms` passes.
pub async fn wait_until<F, Fut>(timeout_ms: u64, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// A running coordinator wired to mocks.
pub struct TestBridge {
    pub handle: CoordinatorHandle,
    pub signaling_tx: mpsc::Sender<SignalingEvent>,
    pub robot_tx: mpsc::Sender<RobotEvent>,
    pub robot: MockRobot,
    pub media: MockMediaConnector,
    pub signaling: MockSignalingOutput,
}

/// Create a coordinator with manual start and mock ports.
pub fn create_test_bridge() -> TestBridge {
    create_test_bridge_with(
        BridgeConfig {
            auto_start: false,
            ..BridgeConfig::default()
        },
        MockRobot::with_locations(["home base", "kitchen"]),
    )
}

pub fn create_test_bridge_with(config: BridgeConfig, robot: MockRobot) -> TestBridge {
    let (signaling_tx, signaling_rx) = mpsc::channel(64);
    let (robot_tx, robot_rx) = mpsc::channel(64);
    let media = MockMediaConnector::new();
    let signaling = MockSignalingOutput::new_stored_only();

    let (coordinator, handle) = Coordinator::new(
        config,
        CoordinatorParts {
            robot: Arc::new(robot.clone()),
            media: Arc::new(media.clone()),
            signaling: Arc::new(signaling.clone()),
            signaling_rx,
            robot_rx,
        },
    );

    // Spawn coordinator event loop
    tokio::spawn(coordinator.run());

    TestBridge {
        handle,
        signaling_tx,
        robot_tx,
        robot,
        media,
        signaling,
    }
}

impl TestBridge {
    pub async fn status(&self) -> BridgeStatus {
        self.handle.status().await.expect("coordinator stopped")
    }

    pub async fn wait_for_status(&self, pred: impl Fn(&BridgeStatus) -> bool) -> bool {
        let pred = &pred;
        wait_until(2000, move || async move { pred(&self.status().await) }).await
    }

    pub async fn signal(&self, msg: SignalingMessage) {
        self.signaling_tx
            .send(SignalingEvent::Message(msg))
            .await
            .expect("Failed to send signaling event");
    }

    pub async fn viewer_ready(&self) {
        self.signaling_tx
            .send(SignalingEvent::Connected)
            .await
            .expect("Failed to send signaling event");
        self.signal(SignalingMessage::ViewerReady).await;
        assert!(self.wait_for_status(|s| s.viewer_ready).await, "viewer never became ready");
    }

    pub async fn robot_event(&self, event: RobotEvent) {
        self.robot_tx
            .send(event)
            .await
            .expect("Failed to send robot event");
    }

    pub async fn robot_ready(&self) {
        self.robot_event(RobotEvent::Ready(true)).await;
        assert!(self.wait_for_status(|s| s.robot_ready).await, "robot never became ready");
    }

    /// Both sides ready and `start` accepted. Returns the sink of the new session.
    pub async fn start_streaming(&self) -> PeerEventSink {
        self.viewer_ready().await;
        self.robot_ready().await;
        self.handle.start().await.expect("start rejected");
        self.media
            .last_sink()
            .await
            .expect("media connector was not used")
    }

    pub async fn answer(&self) {
        self.signal(SignalingMessage::answer("v=0\r\ns=answer\r\n")).await;
    }

    pub async fn remote_candidate(&self, candidate: IceCandidate) {
        self.signal(SignalingMessage::Candidate { candidate }).await;
    }

    /// Full negotiation through an open control channel.
    pub async fn connect(&self) -> PeerEventSink {
        let sink = self.start_streaming().await;
        self.answer().await;
        assert!(
            self.media
                .wait_for(1, 2000, |c| matches!(c, MediaCall::SetRemoteAnswer(_)))
                .await
        );
        sink.emit(PeerEventKind::IceConnectionState(IceState::Connected))
            .await;
        sink.emit(PeerEventKind::ControlChannelOpen).await;
        assert!(
            self.wait_for_status(|s| s.control_state == Some(ControlState::Open))
                .await,
            "control channel never opened"
        );
        sink
    }

    /// Send a command frame as the viewer would over `robotControl`.
    pub async fn command(&self, sink: &PeerEventSink, frame: Value) {
        sink.emit(PeerEventKind::ControlMessage(frame.to_string()))
            .await;
    }

    /// Send a command and wait for its `robot_response`.
    pub async fn request(&self, sink: &PeerEventSink, frame: Value) -> Value {
        let before = self.media.sent_of_type("robot_response").await.len();
        self.command(sink, frame).await;
        assert!(
            self.media
                .wait_for_control("robot_response", before + 1, 2000)
                .await,
            "no robot_response"
        );
        self.media.sent_of_type("robot_response").await[before].clone()
    }
}
