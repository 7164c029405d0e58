use async_trait::async_trait;
use bytes::Bytes;
use tiller_core::{PeerId, RoomId, SessionCredential};

/// Token-issuing collaborator: trades a room key for a channel
/// descriptor with a validity window.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn issue(&self, room_key: &RoomId) -> anyhow::Result<SessionCredential>;
}

/// The real-time channel the session manager owns. One logical channel,
/// RPC-addressed by peer identity; the implementation is external
/// (browser, native SDK, test double).
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn connect(&self, endpoint: &str, credential: &str) -> anyhow::Result<()>;

    /// One request/response exchange. No ordering is guaranteed across
    /// concurrently in-flight calls to different methods.
    async fn call(&self, method: &str, payload: Bytes, destination: &PeerId)
    -> anyhow::Result<Bytes>;

    /// Whether the named peer currently holds an addressable session
    /// slot, independent of our own connectivity.
    async fn is_peer_present(&self, identity: &PeerId) -> bool;

    async fn close(&self);
}
