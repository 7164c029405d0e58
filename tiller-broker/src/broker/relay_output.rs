use async_trait::async_trait;
use tiller_core::ConnId;

/// Outbound port of the broker actor: the WebSocket layer (or a test
/// double) implements this so the broker can reach its clients.
#[async_trait]
pub trait RelayOutput: Send + Sync {
    /// Deliver a raw text frame to one connection.
    async fn send_text(&self, conn_id: ConnId, text: String);

    /// Ask the connection's socket to close.
    async fn close(&self, conn_id: ConnId);
}
