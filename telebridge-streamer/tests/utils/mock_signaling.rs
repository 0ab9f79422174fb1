use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use telebridge_core::{IceCandidate, SignalingMessage};
use telebridge_streamer::{SignalingOutput, TransportError};
use tokio::sync::mpsc;

/// Mock SignalingOutput that captures every message sent to the broker.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Channel to send captured messages.
    tx: mpsc::UnboundedSender<SignalingMessage>,
    /// All captured messages (for verification).
    sent: Arc<Mutex<Vec<SignalingMessage>>>,
    open: Arc<AtomicBool>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SignalingMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            sent: Arc::new(Mutex::new(Vec::new())),
            open: Arc::new(AtomicBool::new(true)),
        };
        (signaling, rx)
    }

    /// Create a MockSignalingOutput without a receiver (messages are only stored).
    pub fn new_stored_only() -> Self {
        Self::new().0
    }

    /// Further sends fail with `NotOpen`.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SignalingMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// SDP of every offer sent so far.
    pub fn offers(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                SignalingMessage::Offer { offer } => Some(offer.sdp),
                _ => None,
            })
            .collect()
    }

    pub fn candidates(&self) -> Vec<IceCandidate> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                SignalingMessage::Candidate { candidate } => Some(candidate),
                _ => None,
            })
            .collect()
    }

    /// Wait until at least `count` messages were sent.
    ///
    /// Returns true if reached, false on timeout.
    pub async fn wait_for_sent(&self, count: usize, timeout_ms: u64) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.sent.lock().unwrap().len() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Default for MockSignalingOutput {
    fn default() -> Self {
        Self::new_stored_only()
    }
}

impl SignalingOutput for MockSignalingOutput {
    fn send(&self, msg: SignalingMessage) -> Result<(), TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::NotOpen);
        }
        tracing::debug!("[MockSignaling] send {:?}", msg);

        self.sent.lock().unwrap().push(msg.clone());
        let _ = self.tx.send(msg);
        Ok(())
    }
}
