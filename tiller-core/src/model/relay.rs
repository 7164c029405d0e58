use crate::model::DriveCommand;
use serde::{Deserialize, Serialize};

/// Wire message on the room relay channel. The original protocol
/// dispatched on the top-level key set of a JSON object, so this is an
/// untagged enum: the variant is picked by which key is present.
/// Decoded once at the boundary; the broker relays the raw text, never
/// a re-serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RelayMessage {
    /// Binds the sending connection to a room slot.
    RoomClaim {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Continuous drive command for the robot.
    Drive {
        #[serde(rename = "driveCmd")]
        drive_cmd: DriveCommand,
    },
    /// Discrete command token (opaque to the broker).
    Discrete { command: String },
    /// Anything else a paired client chooses to relay (telemetry,
    /// mission payloads). Must parse as JSON to be forwarded.
    Other(serde_json::Value),
}

impl RelayMessage {
    /// The room id if this message is a claim.
    pub fn claimed_room(&self) -> Option<&str> {
        match self {
            Self::RoomClaim { room_id } => Some(room_id),
            _ => None,
        }
    }
}
