use crate::command::CommandDispatcher;
use crate::input::{GamepadConfig, GamepadSample, normalize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Connect/disconnect notifications from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadEvent {
    Connected(usize),
    Disconnected(usize),
}

/// Pollable view of the platform's gamepads, enumerated by a stable
/// index. `sample` returns `None` once the pad at that index is gone.
pub trait GamepadSource: Send + Sync + 'static {
    fn sample(&self, index: usize) -> Option<GamepadSample>;

    /// Index of a currently connected gamepad, if any.
    fn connected_index(&self) -> Option<usize>;
}

/// Drives the continuous sampling loop for one gamepad.
///
/// Presence is a dual signal: whichever arrives first — a connect event
/// or a positive poll at startup — activates sampling. Every disconnect
/// path aborts the sampling task; a recurring callback must never
/// outlive the pad it samples.
pub struct GamepadMonitor {
    source: Arc<dyn GamepadSource>,
    cfg: GamepadConfig,
    sample_rate: Duration,
    dispatcher: Arc<CommandDispatcher>,
    events: mpsc::Receiver<GamepadEvent>,
    /// Internal channel for sampling tasks to report a vanished pad.
    /// Kept separate from `events` so dropping the external sender
    /// still ends `run`.
    vanished_tx: mpsc::Sender<usize>,
    vanished_rx: mpsc::Receiver<usize>,
    connected: watch::Sender<bool>,
    active: Option<(usize, JoinHandle<()>)>,
}

impl GamepadMonitor {
    /// Returns the monitor and the sender the platform layer pushes
    /// connect/disconnect events into.
    pub fn new(
        source: Arc<dyn GamepadSource>,
        dispatcher: Arc<CommandDispatcher>,
        cfg: GamepadConfig,
        sample_rate: Duration,
    ) -> (Self, mpsc::Sender<GamepadEvent>) {
        let (events_tx, events) = mpsc::channel(16);
        let (vanished_tx, vanished_rx) = mpsc::channel(16);
        let (connected, _) = watch::channel(false);

        let monitor = Self {
            source,
            cfg,
            sample_rate,
            dispatcher,
            events,
            vanished_tx,
            vanished_rx,
            connected,
            active: None,
        };

        (monitor, events_tx)
    }

    /// Observe gamepad connectivity (for input-mode UI).
    pub fn connection_state(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Runs until the event sender side is dropped. Cancels any active
    /// sampling task on the way out.
    pub async fn run(mut self) {
        // A pad may already be connected before any event arrives.
        if let Some(index) = self.source.connected_index() {
            self.activate(index);
        }

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        GamepadEvent::Connected(index) => self.activate(index),
                        GamepadEvent::Disconnected(index) => self.deactivate(index),
                    }
                }
                Some(index) = self.vanished_rx.recv() => {
                    self.deactivate(index);
                }
            }
        }

        if let Some((_, handle)) = self.active.take() {
            handle.abort();
        }
    }

    fn activate(&mut self, index: usize) {
        if let Some((active, _)) = self.active {
            if active == index {
                return;
            }
            self.deactivate(active);
        }

        info!(index, "gamepad connected, starting sampling loop");
        let source = self.source.clone();
        let dispatcher = self.dispatcher.clone();
        let cfg = self.cfg.clone();
        let sample_rate = self.sample_rate;
        let vanished_tx = self.vanished_tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sample_rate);
            loop {
                ticker.tick().await;
                match source.sample(index) {
                    Some(sample) => {
                        let command = normalize(&cfg, &sample);
                        dispatcher.drive(command.linear, command.angular).await;
                    }
                    None => {
                        // Pad vanished between events; report it so the
                        // monitor tears this task down.
                        let _ = vanished_tx.send(index).await;
                        break;
                    }
                }
            }
        });

        self.active = Some((index, handle));
        self.connected.send_replace(true);
    }

    fn deactivate(&mut self, index: usize) {
        let Some((active, handle)) = self.active.take() else {
            return;
        };

        if active != index {
            self.active = Some((active, handle));
            return;
        }

        debug!(index, "gamepad disconnected, cancelling sampling loop");
        handle.abort();
        self.connected.send_replace(false);
    }
}

impl Drop for GamepadMonitor {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.active.take() {
            handle.abort();
        }
    }
}
