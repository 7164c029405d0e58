mod gamepad;
mod gamepad_monitor;
mod keyboard;

pub use gamepad::*;
pub use gamepad_monitor::*;
pub use keyboard::*;
