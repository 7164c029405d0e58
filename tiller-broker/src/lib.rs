pub mod broker;
pub mod ws;

pub use broker::*;
pub use ws::*;
