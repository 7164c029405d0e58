pub mod session_tests;

use std::sync::Arc;
use tiller_client::session::{PeerSession, SessionConfig};
use tiller_core::RoomId;
use tracing::Level;

use crate::utils::{MockIssuer, MockTransport};

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> SessionConfig {
    SessionConfig::new(RoomId::from("operator@example.com"))
}

pub fn create_session(issuer: MockIssuer) -> (Arc<PeerSession>, MockTransport) {
    init_tracing();
    let transport = MockTransport::new();
    let session = PeerSession::new(
        test_config(),
        Arc::new(issuer),
        Arc::new(transport.clone()),
    );
    (session, transport)
}
