pub mod command;
pub mod input;
pub mod session;

pub use command::{CommandDispatcher, CommandSink, DriveCommandReducer};
pub use input::{
    GamepadConfig, GamepadEvent, GamepadMonitor, GamepadSample, GamepadSource, KeyEvent, Keyboard,
    KeyboardConfig,
};
pub use session::{
    CredentialIssuer, ObserverId, PeerSession, SessionConfig, SessionError, SessionState,
    SessionTransport, TelemetryHub,
};
