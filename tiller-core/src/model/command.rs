use serde::{Deserialize, Serialize};

/// Fire-and-forget command with no payload. The vocabulary is fixed by
/// the robot firmware; repeats are meaningful, so these are never
/// deduplicated on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscreteCommand {
    Noise,
    Logs,
    IndicatorLeft,
    IndicatorRight,
    IndicatorStop,
    Network,
    DriveMode,
    SpeedDown,
    SpeedUp,
}

impl DiscreteCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noise => "NOISE",
            Self::Logs => "LOGS",
            Self::IndicatorLeft => "INDICATOR_LEFT",
            Self::IndicatorRight => "INDICATOR_RIGHT",
            Self::IndicatorStop => "INDICATOR_STOP",
            Self::Network => "NETWORK",
            Self::DriveMode => "DRIVE_MODE",
            Self::SpeedDown => "SPEED_DOWN",
            Self::SpeedUp => "SPEED_UP",
        }
    }
}
