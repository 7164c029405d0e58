mod broker;
mod broker_command;
mod relay_output;
mod room;

pub use broker::*;
pub use broker_command::*;
pub use relay_output::*;
pub use room::*;
