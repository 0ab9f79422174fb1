use crate::ports::{MediaConnector, MediaPort};
use crate::session::{IceState, PeerEventKind, PeerEventSink};
use crate::transport::{IceConfig, LocalTracks};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, Weak};
use telebridge_core::IceCandidate;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::track::track_local::TrackLocal;

pub const CONTROL_CHANNEL_LABEL: &str = "robotControl";

/// Текущий канал управления. События шлёт только он.
type ControlSlot = Arc<Mutex<Option<Arc<RTCDataChannel>>>>;

/// Фабрика соединений поверх webrtc-rs.
#[derive(Clone)]
pub struct WebRtcConnector {
    tracks: LocalTracks,
}

impl WebRtcConnector {
    pub fn new(tracks: LocalTracks) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &LocalTracks {
        &self.tracks
    }
}

#[async_trait]
impl MediaConnector for WebRtcConnector {
    async fn connect(&self, ice: &IceConfig, events: PeerEventSink) -> Result<Box<dyn MediaPort>> {
        let port = ConnectionWrapper::new(ice, &self.tracks, events).await?;
        Ok(Box::new(port))
    }
}

/// Одно WebRTC соединение: треки только на отправку и канал `robotControl`.
pub struct ConnectionWrapper {
    peer_connection: Arc<RTCPeerConnection>,
    /// Может быть заменён каналом, открытым зрителем.
    control: ControlSlot,
}

impl ConnectionWrapper {
    pub async fn new(ice: &IceConfig, tracks: &LocalTracks, events: PeerEventSink) -> Result<Self> {
        // 1. Кодеки по умолчанию и интерцепторы (RTCP отчеты, NACK)
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // 2. Только STUN. Без серверов остаются host-кандидаты
        let ice_servers = if ice.stun_servers.is_empty() {
            Vec::new()
        } else {
            vec![RTCIceServer {
                urls: ice.stun_servers.clone(),
                ..Default::default()
            }]
        };
        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        // 3. Треки только на отправку: offer не просит у зрителя ни аудио, ни видео
        for track in [tracks.video.clone(), tracks.audio.clone()] {
            let track: Arc<dyn TrackLocal + Send + Sync> = track;
            peer_connection
                .add_transceiver_from_track(
                    track,
                    Some(RTCRtpTransceiverInit {
                        direction: RTCRtpTransceiverDirection::Sendonly,
                        send_encodings: vec![],
                    }),
                )
                .await
                .context("Failed to add send-only transceiver")?;
        }

        // 4. Канал управления создаём сами, упорядоченный и надёжный
        let dc = peer_connection
            .create_data_channel(
                CONTROL_CHANNEL_LABEL,
                Some(RTCDataChannelInit {
                    ordered: Some(true),
                    ..Default::default()
                }),
            )
            .await
            .context("Failed to create control channel")?;
        let control: ControlSlot = Arc::new(Mutex::new(Some(dc.clone())));
        wire_control_channel(&dc, control.clone(), events.clone());

        // --- Callbacks ---

        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Failed to serialize local candidate: {}", e);
                        return;
                    }
                };
                let candidate = IceCandidate {
                    sdp_mid: init.sdp_mid.unwrap_or_default(),
                    sdp_m_line_index: init.sdp_mline_index.unwrap_or(0),
                    candidate: init.candidate,
                };
                events.emit(PeerEventKind::LocalCandidate(candidate)).await;
            })
        }));

        let state_events = events.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let events = state_events.clone();

                Box::pin(async move {
                    info!("ICE state for session {}: {}", events.session(), s);
                    events
                        .emit(PeerEventKind::IceConnectionState(ice_state(s)))
                        .await;
                })
            },
        ));

        let nego_events = events.clone();
        peer_connection.on_negotiation_needed(Box::new(move || {
            let events = nego_events.clone();
            Box::pin(async move {
                events.emit(PeerEventKind::RenegotiationNeeded).await;
            })
        }));

        // Канал, открытый зрителем, обрабатываем так же, как свой
        let remote_events = events.clone();
        let remote_control = control.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let events = remote_events.clone();
            let control = remote_control.clone();

            Box::pin(async move {
                if dc.label() != CONTROL_CHANNEL_LABEL {
                    debug!("Ignoring data channel '{}'", dc.label());
                    return;
                }
                info!("Viewer opened its own '{}' channel", CONTROL_CHANNEL_LABEL);
                let replaced = control.lock().await.replace(dc.clone());
                wire_control_channel(&dc, control, events);

                // Старый канал уже не текущий, его on_close никуда не попадёт
                if let Some(old) = replaced {
                    if let Err(e) = old.close().await {
                        warn!("Failed to close replaced control channel: {}", e);
                    }
                }
            })
        }));

        Ok(Self {
            peer_connection,
            control,
        })
    }

    async fn control_channel(&self) -> Result<Arc<RTCDataChannel>> {
        self.control
            .lock()
            .await
            .clone()
            .ok_or_else(|| anyhow!("Control channel is closed"))
    }
}

#[async_trait]
impl MediaPort for ConnectionWrapper {
    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("Failed to set local description")?;
        Ok(offer.sdp)
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to set remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: Some(candidate.sdp_mid),
            sdp_mline_index: Some(candidate.sdp_m_line_index),
            username_fragment: None,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn send_control(&self, text: String) -> Result<()> {
        let dc = self.control_channel().await?;
        dc.send_text(text).await?;
        Ok(())
    }

    async fn close_control(&self) -> Result<()> {
        let Some(dc) = self.control.lock().await.take() else {
            return Ok(());
        };
        dc.close().await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn wire_control_channel(dc: &Arc<RTCDataChannel>, control: ControlSlot, events: PeerEventSink) {
    let me = Arc::downgrade(dc);

    let open_gate = (control.clone(), me.clone());
    let open_events = events.clone();
    dc.on_open(Box::new(move || {
        let (control, me) = open_gate.clone();
        let events = open_events.clone();
        Box::pin(async move {
            if is_current(&control, &me).await {
                events.emit(PeerEventKind::ControlChannelOpen).await;
            }
        })
    }));

    let close_gate = (control.clone(), me.clone());
    let close_events = events.clone();
    dc.on_close(Box::new(move || {
        let (control, me) = close_gate.clone();
        let events = close_events.clone();
        Box::pin(async move {
            if is_current(&control, &me).await {
                events.emit(PeerEventKind::ControlChannelClosed).await;
            } else {
                debug!("Superseded control channel closed");
            }
        })
    }));

    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let (control, me) = (control.clone(), me.clone());
        let events = events.clone();
        Box::pin(async move {
            if !is_current(&control, &me).await {
                return;
            }
            match String::from_utf8(msg.data.to_vec()) {
                Ok(text) => {
                    events.emit(PeerEventKind::ControlMessage(text)).await;
                }
                Err(e) => warn!("Non UTF-8 control frame dropped: {}", e),
            }
        })
    }));
}

async fn is_current(control: &ControlSlot, dc: &Weak<RTCDataChannel>) -> bool {
    control
        .lock()
        .await
        .as_ref()
        .is_some_and(|current| std::ptr::eq(Arc::as_ptr(current), dc.as_ptr()))
}

fn ice_state(s: RTCIceConnectionState) -> IceState {
    match s {
        RTCIceConnectionState::Checking => IceState::Checking,
        RTCIceConnectionState::Connected => IceState::Connected,
        RTCIceConnectionState::Completed => IceState::Completed,
        RTCIceConnectionState::Disconnected => IceState::Disconnected,
        RTCIceConnectionState::Failed => IceState::Failed,
        RTCIceConnectionState::Closed => IceState::Closed,
        _ => IceState::New,
    }
}
