use serde::{Deserialize, Serialize};

const MAX: f32 = 1.0;
const MIN: f32 = -1.0;

/// One bounded motion axis. Every write is clamped to [-1, 1], so a
/// value read back from a `DriveValue` is always safe to put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveValue(f32);

impl DriveValue {
    pub fn write(&mut self, value: f32) -> f32 {
        self.0 = value.clamp(MIN, MAX);
        self.0
    }

    pub fn reset(&mut self) -> f32 {
        self.0 = 0.0;
        self.0
    }

    pub fn read(&self) -> f32 {
        self.0
    }
}

/// Instantaneous target velocity pair sent to the robot's motor
/// controller. The wire fields are named `l`/`r` for protocol
/// compatibility; this deployment interprets them as (linear, angular).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    #[serde(rename = "l")]
    pub linear: f32,
    #[serde(rename = "r")]
    pub angular: f32,
}

impl DriveCommand {
    /// Builds a command with both axes clamped to [-1, 1].
    pub fn new(linear: f32, angular: f32) -> Self {
        Self {
            linear: linear.clamp(MIN, MAX),
            angular: angular.clamp(MIN, MAX),
        }
    }

    pub fn stop() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn is_stop(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}
