pub use tiller_core::model::{DriveCommand, PeerId, RoomId};

pub mod model {
    pub use tiller_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use tiller_client::*;
}

#[cfg(feature = "broker")]
pub mod broker {
    pub use tiller_broker::*;
}
