use thiserror::Error;
use tiller_core::{PeerId, RpcMethod};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,

    #[error("session is not connected")]
    NotConnected,

    /// One-shot action requests surface this so the operator learns the
    /// action did not take effect.
    #[error("peer '{0}' has not joined the session")]
    PeerUnavailable(PeerId),

    /// Fatal to session start; reauthentication is the caller's call.
    #[error("credential issuance failed")]
    Credential(#[source] anyhow::Error),

    #[error("channel connect failed")]
    Connect(#[source] anyhow::Error),

    #[error("rpc '{method}' failed")]
    Rpc {
        method: RpcMethod,
        #[source]
        source: anyhow::Error,
    },

    #[error("rpc '{0}' timed out")]
    RpcTimeout(RpcMethod),

    #[error("payload codec error")]
    Codec(#[from] serde_json::Error),
}
