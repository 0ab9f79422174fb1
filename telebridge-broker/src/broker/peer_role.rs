use std::fmt;

/// Роль соединения на брокере. Каждую роль держит не более одного сокета.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerRole {
    Viewer,
    Streamer,
}

impl PeerRole {
    pub fn other(self) -> Self {
        match self {
            PeerRole::Viewer => PeerRole::Streamer,
            PeerRole::Streamer => PeerRole::Viewer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeerRole::Viewer => "viewer",
            PeerRole::Streamer => "streamer",
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
