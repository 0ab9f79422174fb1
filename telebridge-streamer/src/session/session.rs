use crate::ports::MediaPort;
use crate::session::{ControlState, IceState, PeerState, SessionError};
use crate::signaling::SignalingOutput;
use std::collections::VecDeque;
use telebridge_core::codec::encode;
use telebridge_core::{ControlMessage, IceCandidate, SessionId, SignalingMessage};
use tracing::{debug, info, warn};

/// Что координатору делать после смены состояния ICE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceOutcome {
    Unchanged,
    /// Сессия перешла в `Connected`.
    Connected,
    /// ICE упал, сессию надо закрыть.
    Failed,
}

/// Одна попытка соединения со зрителем.
/// Владеет медиа-соединением и каналом управления; после `Closed` не переиспользуется.
pub struct Session {
    id: SessionId,
    peer_state: PeerState,
    control_state: ControlState,
    media: Box<dyn MediaPort>,
    remote_applied: bool,
    /// Удалённые кандидаты, пришедшие до answer. Применяются в порядке прихода.
    pending_ice_remote: VecDeque<IceCandidate>,
    /// Локальные кандидаты, сгенерированные до отправки offer.
    pending_ice_local: Vec<IceCandidate>,
}

impl Session {
    pub fn new(id: SessionId, media: Box<dyn MediaPort>) -> Self {
        Self {
            id,
            peer_state: PeerState::Idle,
            control_state: ControlState::Absent,
            media,
            remote_applied: false,
            pending_ice_remote: VecDeque::new(),
            pending_ice_local: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn peer_state(&self) -> PeerState {
        self.peer_state
    }

    pub fn control_state(&self) -> ControlState {
        self.control_state
    }

    pub fn pending_remote_candidates(&self) -> usize {
        self.pending_ice_remote.len()
    }

    fn transition(&mut self, next: PeerState) -> Result<(), SessionError> {
        if !self.peer_state.can_transition_to(next) {
            return Err(SessionError::IllegalTransition {
                from: self.peer_state,
                to: next,
            });
        }
        debug!("Session {}: {} -> {}", self.id, self.peer_state, next);
        self.peer_state = next;
        Ok(())
    }

    // --- Negotiation ---

    /// Idle -> Offering -> AwaitingAnswer. Offer уходит в сигналинг раньше любого локального кандидата.
    pub async fn create_offer(&mut self, signaling: &dyn SignalingOutput) -> Result<(), SessionError> {
        self.transition(PeerState::Offering)?;
        self.control_state = ControlState::Opening;

        let sdp = self
            .media
            .create_offer()
            .await
            .map_err(|e| SessionError::Negotiation(format!("{e:#}")))?;

        self.transition(PeerState::AwaitingAnswer)?;
        signaling.send(SignalingMessage::offer(sdp))?;
        info!("Session {}: offer sent", self.id);

        for candidate in std::mem::take(&mut self.pending_ice_local) {
            signaling.send(SignalingMessage::Candidate { candidate })?;
        }
        Ok(())
    }

    pub fn on_local_candidate(
        &mut self,
        candidate: IceCandidate,
        signaling: &dyn SignalingOutput,
    ) -> Result<(), SessionError> {
        match self.peer_state {
            PeerState::Idle | PeerState::Offering => {
                self.pending_ice_local.push(candidate);
                Ok(())
            }
            PeerState::AwaitingAnswer | PeerState::Connected => {
                signaling.send(SignalingMessage::Candidate { candidate })?;
                Ok(())
            }
            PeerState::Closing | PeerState::Closed => Ok(()),
        }
    }

    /// Применить answer зрителя и выгрузить накопленных кандидатов.
    pub async fn apply_answer(&mut self, sdp: String) -> Result<(), SessionError> {
        if self.remote_applied {
            warn!("Session {}: repeated answer ignored", self.id);
            return Ok(());
        }
        if self.peer_state != PeerState::AwaitingAnswer {
            return Err(SessionError::IllegalTransition {
                from: self.peer_state,
                to: PeerState::AwaitingAnswer,
            });
        }

        self.media
            .set_remote_answer(sdp)
            .await
            .map_err(|e| SessionError::Negotiation(format!("{e:#}")))?;
        self.remote_applied = true;
        info!(
            "Session {}: answer applied, flushing {} buffered candidates",
            self.id,
            self.pending_ice_remote.len()
        );

        while let Some(candidate) = self.pending_ice_remote.pop_front() {
            self.apply_remote_candidate(candidate).await?;
        }
        Ok(())
    }

    pub async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> Result<(), SessionError> {
        if self.peer_state.is_terminal() {
            return Ok(());
        }
        if !self.remote_applied {
            debug!("Session {}: buffering remote candidate", self.id);
            self.pending_ice_remote.push_back(candidate);
            return Ok(());
        }
        self.apply_remote_candidate(candidate).await
    }

    async fn apply_remote_candidate(&mut self, candidate: IceCandidate) -> Result<(), SessionError> {
        if !self.remote_applied {
            return Err(SessionError::CandidateBeforeRemoteDescription);
        }
        // Битый кандидат не повод рвать сессию
        if let Err(e) = self.media.add_ice_candidate(candidate).await {
            warn!("Session {}: failed to add ICE candidate: {:#}", self.id, e);
        }
        Ok(())
    }

    pub fn on_ice_state(&mut self, state: IceState) -> IceOutcome {
        match state {
            IceState::Connected | IceState::Completed
                if self.peer_state == PeerState::AwaitingAnswer && self.remote_applied =>
            {
                self.peer_state = PeerState::Connected;
                info!("Session {}: connected", self.id);
                IceOutcome::Connected
            }
            IceState::Failed if !self.peer_state.is_terminal() => {
                warn!("Session {}: ICE failed", self.id);
                IceOutcome::Failed
            }
            _ => IceOutcome::Unchanged,
        }
    }

    // --- Control channel ---

    /// Возвращает `true`, если канал только что открылся.
    pub fn on_control_open(&mut self) -> bool {
        if self.peer_state.is_terminal() || self.control_state == ControlState::Open {
            return false;
        }
        self.control_state = ControlState::Open;
        info!("Session {}: control channel open", self.id);
        true
    }

    pub fn on_control_closed(&mut self) {
        if self.control_state != ControlState::Closed {
            info!("Session {}: control channel closed", self.id);
        }
        self.control_state = ControlState::Closed;
    }

    /// Отправка в `robotControl`. Пока канал не открыт, сообщение молча отбрасывается.
    pub async fn send_control(&self, msg: &ControlMessage) -> bool {
        if self.control_state != ControlState::Open {
            debug!("Session {}: control channel not open, dropping message", self.id);
            return false;
        }

        let text = match encode(msg) {
            Ok(text) => text,
            Err(e) => {
                warn!("Session {}: failed to encode control message: {}", self.id, e);
                return false;
            }
        };

        match self.media.send_control(text).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Session {}: failed to send control message: {:#}", self.id, e);
                false
            }
        }
    }

    // --- Teardown ---

    /// Closing -> Closed. Сначала канал управления, потом само соединение.
    pub async fn close(&mut self) {
        if self.peer_state == PeerState::Closed {
            return;
        }
        if self.peer_state != PeerState::Closing {
            self.peer_state = PeerState::Closing;
        }

        if matches!(self.control_state, ControlState::Opening | ControlState::Open) {
            if let Err(e) = self.media.close_control().await {
                warn!("Session {}: failed to close control channel: {:#}", self.id, e);
            }
        }
        self.control_state = ControlState::Closed;

        if let Err(e) = self.media.close().await {
            warn!("Session {}: failed to close peer connection: {:#}", self.id, e);
        }

        self.pending_ice_remote.clear();
        self.pending_ice_local.clear();
        self.peer_state = PeerState::Closed;
        info!("Session {}: closed", self.id);
    }
}
