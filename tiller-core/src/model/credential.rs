use std::time::{Duration, Instant};

/// Channel descriptor handed out by the token issuer: where to connect
/// and the credential to present, valid until `expires_at`.
#[derive(Debug, Clone)]
pub struct SessionCredential {
    pub endpoint: String,
    pub credential: String,
    pub expires_at: Instant,
}

impl SessionCredential {
    pub fn new(endpoint: String, credential: String, ttl: Duration) -> Self {
        Self {
            endpoint,
            credential,
            expires_at: Instant::now() + ttl,
        }
    }

    /// True while the credential remains usable with at least `margin`
    /// of validity left.
    pub fn is_fresh(&self, margin: Duration) -> bool {
        Instant::now() + margin < self.expires_at
    }
}
