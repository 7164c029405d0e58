use tiller_core::DriveCommand;

/// Joystick axis carrying steering.
const STEER_AXIS: usize = 0;
/// Analog trigger indices: right trigger drives forward thrust, left
/// trigger backward.
const FORWARD_TRIGGER: usize = 7;
const BACKWARD_TRIGGER: usize = 6;

/// One gamepad poll: axis positions plus button pressure values.
#[derive(Debug, Clone, Default)]
pub struct GamepadSample {
    pub axes: Vec<f32>,
    pub buttons: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct GamepadConfig {
    /// Axis magnitudes below this are forced to exactly zero.
    pub deadzone: f32,
    /// Net thrust magnitude above which steering authority is reduced.
    pub thrust_threshold: f32,
    /// Steering gain at low thrust.
    pub steering_gain: f32,
    /// Steering gain above the thrust threshold.
    pub steering_gain_at_speed: f32,
    /// Below this on both outputs an explicit zero command is emitted.
    pub input_epsilon: f32,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.05,
            thrust_threshold: 0.1,
            steering_gain: 0.75,
            steering_gain_at_speed: 0.5,
            input_epsilon: 0.01,
        }
    }
}

impl GamepadConfig {
    fn apply_deadzone(&self, value: f32) -> f32 {
        if value.abs() < self.deadzone { 0.0 } else { value }
    }
}

/// Converts one gamepad sample into a drive command.
///
/// Net thrust is forward trigger minus backward trigger. Steering is
/// the joystick axis scaled by a gain that drops at speed, with its
/// direction inverted while reversing. A sample with no significant
/// input yields an explicit zero command rather than nothing, so the
/// robot stops even without a release event.
pub fn normalize(cfg: &GamepadConfig, sample: &GamepadSample) -> DriveCommand {
    let steer = cfg.apply_deadzone(sample.axes.get(STEER_AXIS).copied().unwrap_or(0.0));
    let forward = sample.buttons.get(FORWARD_TRIGGER).copied().unwrap_or(0.0);
    let backward = sample.buttons.get(BACKWARD_TRIGGER).copied().unwrap_or(0.0);

    let net_thrust = (forward - backward).clamp(-1.0, 1.0);

    let steering_direction = if net_thrust >= 0.0 { 1.0 } else { -1.0 };
    let steering_gain = if net_thrust.abs() > cfg.thrust_threshold {
        cfg.steering_gain_at_speed
    } else {
        cfg.steering_gain
    };

    let linear = net_thrust;
    let angular = (steer * steering_gain * steering_direction).clamp(-1.0, 1.0);

    if linear.abs() > cfg.input_epsilon || angular.abs() > cfg.input_epsilon {
        DriveCommand::new(linear, angular)
    } else {
        DriveCommand::stop()
    }
}
