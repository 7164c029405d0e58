mod config;
mod error;
mod manager;
mod telemetry;
mod transport;

pub use config::*;
pub use error::*;
pub use manager::*;
pub use telemetry::*;
pub use transport::*;
