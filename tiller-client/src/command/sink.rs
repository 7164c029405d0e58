use async_trait::async_trait;
use tiller_core::{DiscreteCommand, DriveCommand};

/// Transport-facing end of the command pipeline. The dispatcher forwards
/// here and performs no retries; failure reporting belongs to the
/// implementation behind this trait.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn drive(&self, command: DriveCommand);

    async fn discrete(&self, command: DiscreteCommand);
}
