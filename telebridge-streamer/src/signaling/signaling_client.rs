use crate::signaling::{ReconnectPolicy, SignalingEvent, SignalingOutput, TransportError};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use telebridge_core::SignalingMessage;
use telebridge_core::codec::{decode_signaling, encode};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum ConnectionEnd {
    Lost(String),
    /// Все хэндлы клиента и координатор ушли, переподключаться незачем.
    Abandoned,
}

/// WebSocket-клиент брокера.
/// Клонируемый хэндл для отправки; само соединение живёт в фоновой задаче.
#[derive(Clone)]
pub struct SignalingClient {
    outbound: mpsc::UnboundedSender<String>,
    connected: Arc<AtomicBool>,
}

impl SignalingClient {
    /// Запустить фоновую задачу соединения. События уходят в `events`.
    pub fn spawn(
        url: String,
        policy: ReconnectPolicy,
        events: mpsc::Sender<SignalingEvent>,
    ) -> (Self, JoinHandle<()>) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(run_connection_loop(
            url,
            policy,
            outbound_rx,
            connected.clone(),
            events,
        ));

        (Self { outbound, connected }, handle)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl SignalingOutput for SignalingClient {
    fn send(&self, msg: SignalingMessage) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotOpen);
        }
        let text = encode(&msg)?;
        self.outbound
            .send(text)
            .map_err(|_| TransportError::NotOpen)
    }
}

async fn run_connection_loop(
    url: String,
    policy: ReconnectPolicy,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    connected: Arc<AtomicBool>,
    events: mpsc::Sender<SignalingEvent>,
) {
    let mut attempt = 0;

    loop {
        let end = match connect_async(url.as_str()).await {
            Ok((ws, _)) => {
                info!("Connected to broker at {}", url);
                attempt = 0;
                drive_connection(ws, &mut outbound_rx, &connected, &events).await
            }
            Err(e) => ConnectionEnd::Lost(TransportError::Connect(e.to_string()).to_string()),
        };
        connected.store(false, Ordering::Release);

        let reason = match end {
            ConnectionEnd::Lost(reason) => reason,
            ConnectionEnd::Abandoned => break,
        };
        warn!("Signaling connection lost: {}", reason);
        if events.send(SignalingEvent::Disconnected(reason)).await.is_err() {
            break;
        }

        if !policy.allows(attempt) {
            info!("No reconnect attempts left, signaling client stopped");
            break;
        }
        attempt += 1;
        info!(
            "Reconnecting to broker in {:?} (attempt {}/{})",
            policy.delay, attempt, policy.max_attempts
        );
        tokio::time::sleep(policy.delay).await;
    }
}

async fn drive_connection(
    ws: WsStream,
    outbound_rx: &mut mpsc::UnboundedReceiver<String>,
    connected: &AtomicBool,
    events: &mpsc::Sender<SignalingEvent>,
) -> ConnectionEnd {
    let (mut sink, mut stream) = ws.split();

    let hello = match encode(&SignalingMessage::Streamer) {
        Ok(text) => text,
        Err(e) => return ConnectionEnd::Lost(e.to_string()),
    };
    if let Err(e) = sink.send(Message::Text(hello.into())).await {
        return ConnectionEnd::Lost(format!("registration failed: {e}"));
    }

    // Хвост очереди от прошлого соединения брокеру уже не нужен
    while outbound_rx.try_recv().is_ok() {}

    connected.store(true, Ordering::Release);
    if events.send(SignalingEvent::Connected).await.is_err() {
        return ConnectionEnd::Abandoned;
    }

    let send_loop = async {
        while let Some(text) = outbound_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                return ConnectionEnd::Lost(format!("write failed: {e}"));
            }
        }
        ConnectionEnd::Abandoned
    };

    let recv_loop = async {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match decode_signaling(text.as_str()) {
                    Ok(Some(msg)) => {
                        if events.send(SignalingEvent::Message(msg)).await.is_err() {
                            return ConnectionEnd::Abandoned;
                        }
                    }
                    Ok(None) => debug!("Ignoring signaling frame: {}", text.as_str()),
                    Err(e) => warn!("Invalid signaling frame dropped: {}", e),
                },
                Ok(Message::Close(_)) => return ConnectionEnd::Lost("closed by broker".into()),
                Ok(_) => {}
                Err(e) => return ConnectionEnd::Lost(format!("read failed: {e}")),
            }
        }
        ConnectionEnd::Lost("stream ended".into())
    };

    tokio::select! {
        end = send_loop => end,
        end = recv_loop => end,
    }
}
