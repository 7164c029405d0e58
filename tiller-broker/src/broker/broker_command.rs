use tiller_core::ConnId;

/// Commands flowing from the WebSocket layer into the broker actor.
#[derive(Debug)]
pub enum BrokerCommand {
    /// A client connected and is registered for outbound delivery.
    Connected { conn_id: ConnId },

    /// Raw text frame from a client.
    Message { conn_id: ConnId, text: String },

    /// The client's socket is gone.
    Disconnected { conn_id: ConnId },
}
