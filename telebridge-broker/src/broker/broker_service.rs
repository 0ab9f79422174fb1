use crate::broker::{
    BrokerNotice, CommandLog, CommandRecord, CommandSource, Connections, Health, LastCommand,
    LinkState, PeerRole, RobotStatus, SERVER_VERSION,
};
use axum::extract::ws::Message;
use dashmap::DashMap;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use telebridge_core::codec::{encode, message_type};
use telebridge_core::{PeerId, now_millis};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Сколько команд отдаётся по `get_command_history`.
pub const HISTORY_FRAME_LIMIT: usize = 20;
/// Сколько последних команд попадает в `/health`.
pub const HEALTH_RECENT_COMMANDS: usize = 5;

#[derive(Debug, Default)]
struct RobotLedger {
    status: RobotStatus,
    log: CommandLog,
}

struct BrokerInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
    roles: DashMap<PeerRole, PeerId>,
    ledger: Mutex<RobotLedger>,
    started: Instant,
}

/// Частота команд за последний час, для `/stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandStats {
    pub total: usize,
    pub last_hour: usize,
    pub breakdown: BTreeMap<String, usize>,
}

/// Пара "стример + зритель". Кадры пересылаются как есть, разбирается только `type`,
/// а у `robot_command` ещё имя и параметры для журнала.
#[derive(Clone)]
pub struct BrokerService {
    inner: Arc<BrokerInner>,
}

impl BrokerService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BrokerInner {
                peers: DashMap::new(),
                roles: DashMap::new(),
                ledger: Mutex::new(RobotLedger::default()),
                started: Instant::now(),
            }),
        }
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
        self.notify(
            peer_id,
            &BrokerNotice::ConnectionEstablished {
                timestamp: now_millis(),
                server_version: SERVER_VERSION,
            },
        );
    }

    /// Удалить сокет. Если он держал роль, вторая сторона получает уведомление.
    pub fn remove_peer(&self, peer_id: &PeerId) -> Option<PeerRole> {
        self.inner.peers.remove(peer_id);

        let role = self.role_of(peer_id)?;
        self.inner.roles.remove_if(&role, |_, holder| holder == peer_id);
        info!("{} {} disconnected", role, peer_id);

        {
            let mut ledger = self.ledger();
            ledger.status.connected = false;
            if role == PeerRole::Streamer {
                ledger.status.streaming = false;
            }
        }

        let notice = match role {
            PeerRole::Viewer => BrokerNotice::ViewerDisconnected,
            PeerRole::Streamer => BrokerNotice::StreamerDisconnected,
        };
        self.notify_role(role.other(), &notice);
        Some(role)
    }

    pub fn role_of(&self, peer_id: &PeerId) -> Option<PeerRole> {
        self.inner
            .roles
            .iter()
            .find(|entry| entry.value() == peer_id)
            .map(|entry| *entry.key())
    }

    pub fn is_connected(&self, role: PeerRole) -> bool {
        self.holder(role).is_some()
    }

    pub fn connections(&self) -> Connections {
        let link = |role| {
            if self.is_connected(role) {
                LinkState::Connected
            } else {
                LinkState::Disconnected
            }
        };
        Connections {
            viewer: link(PeerRole::Viewer),
            streamer: link(PeerRole::Streamer),
        }
    }

    pub fn health(&self) -> Health {
        let ledger = self.ledger();
        Health {
            status: "ok",
            timestamp: now_millis(),
            connections: self.connections(),
            robot_status: ledger.status.clone(),
            recent_commands: ledger.log.recent(HEALTH_RECENT_COMMANDS),
            uptime: self.uptime().as_secs_f64(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }

    pub fn robot_status(&self) -> RobotStatus {
        self.ledger().status.clone()
    }

    /// Последние `limit` команд журнала и его полный размер.
    pub fn command_history(&self, limit: usize) -> (Vec<CommandRecord>, usize) {
        let ledger = self.ledger();
        (ledger.log.recent(limit), ledger.log.len())
    }

    pub fn command_stats(&self, window: Duration) -> CommandStats {
        let since = now_millis().saturating_sub(window.as_millis() as u64);
        let ledger = self.ledger();
        let breakdown = ledger.log.breakdown_since(since);
        CommandStats {
            total: ledger.log.len(),
            last_hour: breakdown.values().sum(),
            breakdown,
        }
    }

    /// Команда не от зрителя (HTTP API). `false`, если стримера нет: тогда она и не журналируется.
    pub fn inject_command(&self, command: &str, params: Value, source: CommandSource) -> bool {
        let timestamp = now_millis();
        let mut frame = json!({
            "type": "robot_command",
            "command": command,
            "params": params,
            "timestamp": timestamp,
        });
        match source {
            CommandSource::ApiEmergency => frame["priority"] = json!("emergency"),
            _ => frame["source"] = json!("api"),
        }

        if !self.send_to_role(PeerRole::Streamer, frame.to_string()) {
            warn!("No robot available to receive {} from {:?}", command, source);
            return false;
        }
        info!("Injected {} ({:?})", command, source);

        self.ledger().log.push(CommandRecord {
            command: command.to_owned(),
            params: Some(params),
            timestamp,
            source,
        });
        true
    }

    /// Маршрутизация одного текстового кадра от `from`.
    pub fn handle_text(&self, from: PeerId, text: &str) {
        let kind = match message_type(text) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Invalid frame from {}: {}", from, e);
                return;
            }
        };
        debug!("Received {} from {}", kind, from);

        match kind.as_str() {
            "viewer" => self.register(from, PeerRole::Viewer),
            "streamer" => self.register(from, PeerRole::Streamer),

            "offer" => {
                self.ledger().status.streaming = true;
                self.relay(PeerRole::Viewer, text, &kind);
            }
            "robot_response" => self.relay(PeerRole::Viewer, text, &kind),
            "answer" => self.relay(PeerRole::Streamer, text, &kind),

            "candidate" => match self.role_of(&from) {
                Some(role) => self.relay(role.other(), text, &kind),
                None => warn!("Candidate from unregistered peer {} dropped", from),
            },

            "robot_command" => self.on_robot_command(text),
            "robot_status_update" => self.on_status_update(text),

            "get_robot_status" => {
                let status = self.robot_status();
                self.notify(from, &BrokerNotice::RobotStatus { status });
            }
            "get_command_history" => {
                let (commands, _) = self.command_history(HISTORY_FRAME_LIMIT);
                self.notify(from, &BrokerNotice::CommandHistory { commands });
            }

            "ping" => self.notify(
                from,
                &BrokerNotice::Pong {
                    timestamp: now_millis(),
                },
            ),

            other => debug!("Unknown message type {} from {}", other, from),
        }
    }

    // --- Internal ---

    fn ledger(&self) -> MutexGuard<'_, RobotLedger> {
        self.inner
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, peer_id: PeerId, role: PeerRole) {
        // Сокет может сменить роль: старую освобождаем
        if let Some(previous) = self.role_of(&peer_id).filter(|r| *r != role) {
            self.inner.roles.remove_if(&previous, |_, holder| *holder == peer_id);
        }
        if let Some(replaced) = self.inner.roles.insert(role, peer_id) {
            if replaced != peer_id {
                info!("{} {} replaced by {}", role, replaced, peer_id);
            }
        }
        info!("{} registered: {}", role, peer_id);

        match role {
            PeerRole::Viewer => {
                let status = self.robot_status();
                self.notify(peer_id, &BrokerNotice::RobotStatus { status });
                if self.notify_role(PeerRole::Streamer, &BrokerNotice::ViewerReady) {
                    self.ledger().status.connected = true;
                }
            }
            PeerRole::Streamer => {
                {
                    let mut ledger = self.ledger();
                    ledger.status.connected = true;
                    ledger.status.streaming = false;
                }
                self.notify_role(PeerRole::Viewer, &BrokerNotice::StreamerReady);
            }
        }
    }

    fn on_robot_command(&self, text: &str) {
        let data: Value = serde_json::from_str(text).unwrap_or_default();
        let command = data
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let params = data.get("params").cloned();
        info!("Robot command received: {}", command);

        {
            let mut ledger = self.ledger();
            let timestamp = data
                .get("timestamp")
                .and_then(Value::as_u64)
                .unwrap_or_else(now_millis);
            ledger.status.record_command(LastCommand {
                command: command.clone(),
                params: params.clone(),
                timestamp,
            });
            ledger.log.push(CommandRecord {
                command,
                params,
                timestamp: now_millis(),
                source: CommandSource::Viewer,
            });
        }

        if self.send_to_role(PeerRole::Streamer, text.to_owned()) {
            return;
        }
        warn!("No robot available to receive command");
        let command_id = data
            .get("commandId")
            .and_then(Value::as_str)
            .map(str::to_owned);
        self.notify_role(PeerRole::Viewer, &BrokerNotice::robot_unavailable(command_id));
    }

    fn on_status_update(&self, text: &str) {
        let update = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(mut data)) => match data.remove("status") {
                Some(Value::Object(status)) => status,
                _ => Map::new(),
            },
            _ => Map::new(),
        };

        let status = {
            let mut ledger = self.ledger();
            if let Err(e) = ledger.status.merge(&update) {
                warn!("Robot status update rejected: {}", e);
            }
            ledger.status.clone()
        };
        self.notify_role(PeerRole::Viewer, &BrokerNotice::RobotStatus { status });
    }

    fn relay(&self, to: PeerRole, text: &str, kind: &str) {
        if !self.send_to_role(to, text.to_owned()) {
            warn!("No {} available to receive {}", to, kind);
        }
    }

    fn holder(&self, role: PeerRole) -> Option<PeerId> {
        self.inner.roles.get(&role).map(|entry| *entry.value())
    }

    fn notify_role(&self, role: PeerRole, notice: &BrokerNotice) -> bool {
        match encode(notice) {
            Ok(text) => self.send_to_role(role, text),
            Err(e) => {
                error!("Failed to serialize broker notice: {}", e);
                false
            }
        }
    }

    fn notify(&self, peer_id: PeerId, notice: &BrokerNotice) {
        match encode(notice) {
            Ok(text) => {
                self.send(peer_id, text);
            }
            Err(e) => error!("Failed to serialize broker notice: {}", e),
        }
    }

    fn send_to_role(&self, role: PeerRole, text: String) -> bool {
        match self.holder(role) {
            Some(peer_id) => self.send(peer_id, text),
            None => false,
        }
    }

    fn send(&self, peer_id: PeerId, text: String) -> bool {
        let Some(peer) = self.inner.peers.get(&peer_id) else {
            warn!("Attempted to send to disconnected peer {}", peer_id);
            return false;
        };
        if let Err(e) = peer.send(Message::Text(text.into())) {
            error!("Failed to send WS message to {}: {:?}", peer_id, e);
            return false;
        }
        true
    }
}

impl Default for BrokerService {
    fn default() -> Self {
        Self::new()
    }
}
