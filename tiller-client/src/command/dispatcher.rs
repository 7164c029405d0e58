use crate::command::{CommandSink, DriveCommandReducer};
use std::sync::Arc;
use tiller_core::{DiscreteCommand, DriveCommand, DriveValue};
use tokio::sync::Mutex;
use tracing::trace;

struct AxisState {
    linear: DriveValue,
    angular: DriveValue,
    reducer: DriveCommandReducer,
}

/// Public command API for the input normalizers. Continuous drive
/// commands funnel through the reducer; discrete commands bypass it,
/// since repeats of those are meaningful.
pub struct CommandDispatcher {
    state: Mutex<AxisState>,
    sink: Arc<dyn CommandSink>,
}

impl CommandDispatcher {
    pub fn new(sink: Arc<dyn CommandSink>) -> Self {
        Self {
            state: Mutex::new(AxisState {
                linear: DriveValue::default(),
                angular: DriveValue::default(),
                reducer: DriveCommandReducer::new(),
            }),
            sink,
        }
    }

    /// Clamps both axes, deduplicates against the last transmitted
    /// command, and forwards at most once.
    pub async fn drive(&self, linear: f32, angular: f32) {
        let forwarded = {
            let mut state = self.state.lock().await;
            let command =
                DriveCommand::new(state.linear.write(linear), state.angular.write(angular));
            state.reducer.reduce(command)
        };

        if let Some(command) = forwarded {
            trace!(linear = command.linear, angular = command.angular, "drive");
            self.sink.drive(command).await;
        }
    }

    pub async fn command(&self, command: DiscreteCommand) {
        self.sink.discrete(command).await;
    }

    /// Zeroes both axes and sends a stop command.
    pub async fn reset(&self) {
        let forwarded = {
            let mut state = self.state.lock().await;
            state.linear.reset();
            state.angular.reset();
            state.reducer.reduce(DriveCommand::stop())
        };

        if let Some(command) = forwarded {
            self.sink.drive(command).await;
        }
    }

    /// Last command handed to the transport, if any.
    pub async fn last_drive(&self) -> Option<DriveCommand> {
        self.state.lock().await.reducer.last()
    }
}
