use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Idle,
    Offering,
    AwaitingAnswer,
    Connected,
    Closing,
    Closed,
}

impl PeerState {
    /// Таблица переходов. Движение только вперёд, к `Closed`.
    pub fn can_transition_to(self, next: PeerState) -> bool {
        use PeerState::*;

        matches!(
            (self, next),
            (Idle, Offering)
                | (Offering, AwaitingAnswer)
                | (AwaitingAnswer, Connected)
                | (Idle | Offering | AwaitingAnswer | Connected, Closing)
                | (Closing, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PeerState::Closing | PeerState::Closed)
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Absent,
    Opening,
    Open,
    Closed,
}
