mod dispatcher;
mod reducer;
mod sink;

pub use dispatcher::*;
pub use reducer::*;
pub use sink::*;
