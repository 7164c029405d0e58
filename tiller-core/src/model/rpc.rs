use std::fmt;

/// RPC methods the robot registers on the real-time channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// Peer-readiness handshake; the response lists available cameras.
    ClientConnected,
    /// Continuous drive command.
    DriveCmd,
    /// Discrete command token.
    Cmd,
    /// Telemetry snapshot read.
    Status,
    /// Waypoint mission upload.
    WaypointCmd,
    /// Active camera switch.
    SwitchCamera,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientConnected => "client-connected",
            Self::DriveCmd => "drive-cmd",
            Self::Cmd => "cmd",
            Self::Status => "status",
            Self::WaypointCmd => "waypoint-cmd",
            Self::SwitchCamera => "switch-camera",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
