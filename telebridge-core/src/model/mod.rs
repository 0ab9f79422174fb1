mod control;
mod peer;
mod position;
mod session;
mod signaling;

pub use control::{
    ControlMessage, LocationUpdate, NavigationStatus, PositionSnapshot, PositionUpdate,
    RobotCommand, RobotResponse,
};
pub use peer::PeerId;
pub use position::{Position, TiltAngle};
pub use session::SessionId;
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalingMessage};
