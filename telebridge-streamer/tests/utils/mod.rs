//! Test utilities for telebridge-streamer.

mod mock_signaling;

pub use mock_media::*;
pub use mock_robot::*;
pub use mock_signaling::*;
pub use viewer_client::*;

use telebridge_core::IceCandidate;

/// A host candidate for the given index, as a browser would send it.
pub fn candidate(n: u16) -> IceCandidate {
    IceCandidate {
        sdp_mid: "0".to_owned(),
        sdp_m_line_index: 0,
        candidate: format!("candidate:{n} 1 udp 2122260223 192.168.1.{n} 5000{n} typ host"),
    }
}
