mod command;
mod credential;
mod drive;
mod peer;
mod relay;
mod rpc;
mod waypoint;

pub use command::DiscreteCommand;
pub use credential::SessionCredential;
pub use drive::{DriveCommand, DriveValue};
pub use peer::{ConnId, PeerId, RoomId};
pub use relay::RelayMessage;
pub use rpc::RpcMethod;
pub use waypoint::Waypoint;

/// Decoded payload of a `status` RPC: an opaque telemetry document
/// assembled by the robot (battery, location, whatever it reports).
pub type Telemetry = serde_json::Value;
