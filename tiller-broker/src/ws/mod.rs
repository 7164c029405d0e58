mod connection_registry;
mod ws_handler;

pub use connection_registry::*;
pub use ws_handler::*;
