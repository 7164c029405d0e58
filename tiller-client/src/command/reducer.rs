use tiller_core::DriveCommand;

/// Bounds the outbound message rate under a fixed-interval polling
/// source: most polls repeat the previous value, and a command equal to
/// the last forwarded one is dropped without a transport call.
#[derive(Debug, Default)]
pub struct DriveCommandReducer {
    last: Option<DriveCommand>,
}

impl DriveCommandReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the command to forward, or `None` if it matches the last
    /// forwarded command field-for-field. The first command always
    /// forwards.
    pub fn reduce(&mut self, command: DriveCommand) -> Option<DriveCommand> {
        if self.last == Some(command) {
            return None;
        }
        self.last = Some(command);
        Some(command)
    }

    pub fn last(&self) -> Option<DriveCommand> {
        self.last
    }
}
