use std::time::Duration;
use tiller_core::{PeerId, RoomId};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key handed to the credential issuer; in production the
    /// operator's account key.
    pub room_key: RoomId,
    /// Identity the robot joins the channel under.
    pub peer_identity: PeerId,
    /// Fixed backoff between peer-presence probes.
    pub probe_interval: Duration,
    /// Period of the status poll once the peer is ready.
    pub telemetry_interval: Duration,
    /// Upper bound on any single RPC exchange. `None` lets calls hang
    /// on an unresponsive peer.
    pub rpc_timeout: Option<Duration>,
    /// A cached credential is reused only while it stays valid for at
    /// least this much longer.
    pub credential_margin: Duration,
}

impl SessionConfig {
    pub fn new(room_key: RoomId) -> Self {
        Self {
            room_key,
            peer_identity: PeerId::from("Android"),
            probe_interval: Duration::from_secs(10),
            telemetry_interval: Duration::from_secs(1),
            rpc_timeout: Some(Duration::from_secs(5)),
            credential_margin: Duration::from_secs(60),
        }
    }
}
