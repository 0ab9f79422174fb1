use crate::coordinator::{
    BridgeConfig, BridgeStatus, CoordinatorCommand, CoordinatorError, CoordinatorHandle,
};
use crate::dispatcher::Dispatcher;
use crate::ports::{MediaConnector, RobotEvent, RobotPort};
use crate::session::{IceOutcome, PeerEvent, PeerEventKind, PeerEventSink, Session, SessionError};
use crate::signaling::{SignalingEvent, SignalingOutput};
use std::sync::Arc;
use telebridge_core::codec::decode_command;
use telebridge_core::{ControlMessage, SessionId, SignalingMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Внешние зависимости координатора.
pub struct CoordinatorParts {
    pub robot: Arc<dyn RobotPort>,
    pub media: Arc<dyn MediaConnector>,
    pub signaling: Arc<dyn SignalingOutput>,
    pub signaling_rx: mpsc::Receiver<SignalingEvent>,
    pub robot_rx: mpsc::Receiver<RobotEvent>,
}

/// Основной актор стримера.
/// Единственный владелец состояния протокола: сессии, флагов готовности и диспетчера команд.
pub struct Coordinator {
    config: BridgeConfig,
    dispatcher: Dispatcher,
    media: Arc<dyn MediaConnector>,
    /// Интерфейс для отправки signaling-сообщений брокеру.
    signaling: Arc<dyn SignalingOutput>,
    /// Текущая сессия. После закрытия не переиспользуется, следующая создаётся заново.
    session: Option<Session>,
    viewer_ready: bool,
    signaling_connected: bool,
    command_rx: mpsc::Receiver<CoordinatorCommand>,
    signaling_rx: mpsc::Receiver<SignalingEvent>,
    robot_rx: mpsc::Receiver<RobotEvent>,
    peer_rx: mpsc::Receiver<PeerEvent>,
    /// Клонируется в `PeerEventSink` каждой новой сессии.
    peer_tx: mpsc::Sender<PeerEvent>,
}

impl Coordinator {
    pub fn new(config: BridgeConfig, parts: CoordinatorParts) -> (Self, CoordinatorHandle) {
        let (command_tx, command_rx) = mpsc::channel(100);
        let (peer_tx, peer_rx) = mpsc::channel(256);

        let coordinator = Self {
            config,
            dispatcher: Dispatcher::new(parts.robot),
            media: parts.media,
            signaling: parts.signaling,
            session: None,
            viewer_ready: false,
            signaling_connected: false,
            command_rx,
            signaling_rx: parts.signaling_rx,
            robot_rx: parts.robot_rx,
            peer_rx,
            peer_tx,
        };

        (coordinator, CoordinatorHandle::new(command_tx))
    }

    /// Запуск главного цикла. Должен быть запущен через tokio::spawn.
    pub async fn run(mut self) {
        info!("Coordinator event loop started");

        let mut signaling_open = true;
        let mut robot_open = true;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(CoordinatorCommand::Shutdown { reply }) => {
                            self.stop_session("shutdown").await;
                            let _ = reply.send(());
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Shutting down coordinator.");
                            self.stop_session("all handles dropped").await;
                            break;
                        }
                    }
                }

                evt = self.signaling_rx.recv(), if signaling_open => {
                    match evt {
                        Some(e) => self.handle_signaling_event(e).await,
                        None => {
                            warn!("Signaling event channel closed");
                            signaling_open = false;
                            self.on_signaling_lost("signaling client stopped").await;
                        }
                    }
                }

                evt = self.robot_rx.recv(), if robot_open => {
                    match evt {
                        Some(e) => self.handle_robot_event(e).await,
                        None => {
                            warn!("Robot event channel closed");
                            robot_open = false;
                        }
                    }
                }

                // peer_tx живёт в самом координаторе, так что канал не закрывается
                Some(evt) = self.peer_rx.recv() => self.handle_peer_event(evt).await,
            }
        }

        info!("Coordinator event loop finished");
    }

    // --- Local commands ---

    async fn handle_command(&mut self, cmd: CoordinatorCommand) {
        match cmd {
            CoordinatorCommand::Start { reply } => {
                let res = self.start().await;
                if let Err(e) = &res {
                    warn!("Start rejected: {}", e);
                }
                let _ = reply.send(res);
            }
            CoordinatorCommand::Stop { reply } => {
                self.stop_session("stop requested").await;
                let _ = reply.send(());
            }
            CoordinatorCommand::Status { reply } => {
                let _ = reply.send(self.status());
            }
            CoordinatorCommand::Shutdown { reply } => {
                // Обрабатывается в run
                let _ = reply.send(());
            }
        }
    }

    async fn start(&mut self) -> Result<(), CoordinatorError> {
        if self.session.is_some() {
            return Err(CoordinatorError::AlreadyStreaming);
        }
        if !(self.viewer_ready && self.dispatcher.is_ready()) {
            return Err(CoordinatorError::NotReady);
        }

        let id = SessionId::new();
        info!("Starting session {}", id);
        self.dispatcher.begin_session();

        let sink = PeerEventSink::new(id, self.peer_tx.clone());
        let media = self
            .media
            .connect(&self.config.ice, sink)
            .await
            .map_err(|e| SessionError::Negotiation(format!("{e:#}")))?;

        let mut session = Session::new(id, media);
        if let Err(e) = session.create_offer(self.signaling.as_ref()).await {
            error!("Session {} failed to offer: {}", id, e);
            session.close().await;
            return Err(e.into());
        }

        self.session = Some(session);
        Ok(())
    }

    /// Закрыть сессию (Closing -> Closed) и остановить робота, если он едет.
    async fn stop_session(&mut self, reason: &str) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        info!("Stopping session {}: {}", session.id(), reason);

        session.close().await;
        self.dispatcher.begin_session();

        if let Err(e) = self.dispatcher.halt_motion() {
            warn!("Failed to stop robot movement: {}", e);
        }
    }

    async fn maybe_auto_start(&mut self) {
        if !self.config.auto_start || self.session.is_some() {
            return;
        }
        if !(self.viewer_ready && self.dispatcher.is_ready()) {
            return;
        }
        info!("Viewer and robot ready, auto-starting stream");
        if let Err(e) = self.start().await {
            warn!("Auto-start failed: {}", e);
        }
    }

    fn status(&self) -> BridgeStatus {
        let robot = self.dispatcher.state();

        BridgeStatus {
            signaling_connected: self.signaling_connected,
            viewer_ready: self.viewer_ready,
            robot_ready: robot.robot_ready,
            streaming: self.session.is_some(),
            peer_state: self.session.as_ref().map(Session::peer_state),
            control_state: self.session.as_ref().map(Session::control_state),
            is_moving: robot.is_moving,
            tilt: robot.tilt,
            locations: robot.locations.clone(),
        }
    }

    // --- Signaling ---

    async fn handle_signaling_event(&mut self, event: SignalingEvent) {
        match event {
            SignalingEvent::Connected => {
                info!("Registered with broker as streamer");
                self.signaling_connected = true;
            }

            SignalingEvent::Disconnected(reason) => {
                self.on_signaling_lost(&reason).await;
            }

            SignalingEvent::Message(msg) => self.handle_signaling_message(msg).await,
        }
    }

    async fn on_signaling_lost(&mut self, reason: &str) {
        self.signaling_connected = false;
        self.viewer_ready = false;
        self.stop_session(reason).await;
    }

    async fn handle_signaling_message(&mut self, msg: SignalingMessage) {
        match msg {
            SignalingMessage::ViewerReady => {
                info!("Viewer ready");
                self.viewer_ready = true;
                self.maybe_auto_start().await;
            }

            SignalingMessage::ViewerDisconnected => {
                info!("Viewer disconnected");
                self.viewer_ready = false;
            }

            SignalingMessage::Answer { answer } => {
                let Some(session) = self.session.as_mut() else {
                    warn!("Answer received without a session");
                    return;
                };
                match session.apply_answer(answer.sdp).await {
                    Ok(()) => {}
                    Err(e @ SessionError::IllegalTransition { .. }) => {
                        warn!("Answer ignored: {}", e);
                    }
                    Err(e) => {
                        error!("Failed to apply answer: {}", e);
                        self.stop_session("negotiation failed").await;
                    }
                }
            }

            SignalingMessage::Candidate { candidate } => {
                let Some(session) = self.session.as_mut() else {
                    debug!("Remote candidate without a session dropped");
                    return;
                };
                if let Err(e) = session.add_remote_candidate(candidate).await {
                    warn!("Remote candidate rejected: {}", e);
                }
            }

            SignalingMessage::RobotCommand(cmd) => {
                info!("Command {} arrived through the broker", cmd.command);
                let dispatch = self.dispatcher.handle(&cmd);
                if let Some(response) = dispatch.response {
                    if let Err(e) = self
                        .signaling
                        .send(SignalingMessage::RobotResponse(response))
                    {
                        error!("Command response not sent: {}", e);
                        self.stop_session("signaling send failed").await;
                        return;
                    }
                }
                if let Some(session) = self.session.as_ref() {
                    for msg in &dispatch.followups {
                        session.send_control(msg).await;
                    }
                }
            }

            other => debug!("Ignoring signaling message {:?}", other),
        }
    }

    // --- Peer connection ---

    async fn handle_peer_event(&mut self, event: PeerEvent) {
        let Some(session) = self.session.as_mut() else {
            debug!("Peer event from closed session {} dropped", event.session);
            return;
        };
        if session.id() != event.session {
            debug!("Stale peer event from session {} dropped", event.session);
            return;
        }

        match event.kind {
            PeerEventKind::LocalCandidate(candidate) => {
                if let Err(e) = session.on_local_candidate(candidate, self.signaling.as_ref()) {
                    error!("Local candidate not sent: {}", e);
                    self.stop_session("signaling send failed").await;
                }
            }

            PeerEventKind::IceConnectionState(state) => match session.on_ice_state(state) {
                IceOutcome::Connected => {
                    let update = self.dispatcher.state().location_update();
                    session
                        .send_control(&ControlMessage::LocationUpdate(update))
                        .await;
                }
                IceOutcome::Failed => self.stop_session("ICE failed").await,
                IceOutcome::Unchanged => {}
            },

            PeerEventKind::ControlChannelOpen => {
                if session.on_control_open() {
                    let update = self.dispatcher.state().location_update();
                    session
                        .send_control(&ControlMessage::LocationUpdate(update))
                        .await;
                }
            }

            PeerEventKind::ControlChannelClosed => session.on_control_closed(),

            PeerEventKind::ControlMessage(text) => {
                let cmd = match decode_command(&text) {
                    Ok(Some(cmd)) => cmd,
                    Ok(None) => return,
                    Err(e) => {
                        warn!("Malformed control frame dropped: {}", e);
                        return;
                    }
                };

                let dispatch = self.dispatcher.handle(&cmd);
                if let Some(response) = dispatch.response {
                    session
                        .send_control(&ControlMessage::RobotResponse(response))
                        .await;
                }
                for msg in &dispatch.followups {
                    session.send_control(msg).await;
                }
            }

            PeerEventKind::RenegotiationNeeded => {
                debug!("Renegotiation requested for session {}, ignored", event.session);
            }
        }
    }

    // --- Robot ---

    async fn handle_robot_event(&mut self, event: RobotEvent) {
        let became_ready = matches!(event, RobotEvent::Ready(true));
        let messages = self.dispatcher.on_robot_event(event);

        if let Some(session) = self.session.as_ref() {
            for msg in &messages {
                session.send_control(msg).await;
            }
        }

        if became_ready {
            self.maybe_auto_start().await;
        }
    }
}
