use crate::command::CommandDispatcher;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tiller_core::{DiscreteCommand, DriveCommand};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Raw keyboard event as delivered by the page layer.
#[derive(Debug, Clone)]
pub enum KeyEvent {
    Down(String),
    Up(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveKey {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(Self::Forward),
            "s" => Some(Self::Backward),
            "a" => Some(Self::Left),
            "d" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyboardConfig {
    /// Repeat interval while any movement key is held.
    pub poll_rate: Duration,
    /// Linear velocity in axis units per second; one repeat tick covers
    /// `poll_rate` worth of it.
    pub base_velocity: f32,
    /// Angular magnitude as a multiple of the per-tick linear magnitude.
    pub turn_gain: f32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            poll_rate: Duration::from_millis(25),
            base_velocity: 8.0,
            turn_gain: 5.0,
        }
    }
}

impl KeyboardConfig {
    fn linear_step(&self) -> f32 {
        self.base_velocity * self.poll_rate.as_secs_f32()
    }

    fn angular_step(&self) -> f32 {
        self.turn_gain * self.linear_step()
    }
}

/// Resolves the full pressed set into one of the nine command shapes.
/// Opposing keys resolve last-writer (s over w, d over a); a diagonal
/// combination keeps both components, never collapsing to plain
/// forward or plain rotate.
fn resolve(pressed: &HashSet<MoveKey>, cfg: &KeyboardConfig) -> DriveCommand {
    let mut linear = 0.0;
    let mut angular = 0.0;

    if pressed.contains(&MoveKey::Forward) {
        linear = cfg.linear_step();
    }
    if pressed.contains(&MoveKey::Backward) {
        linear = -cfg.linear_step();
    }
    if pressed.contains(&MoveKey::Left) {
        angular = -cfg.angular_step();
    }
    if pressed.contains(&MoveKey::Right) {
        angular = cfg.angular_step();
    }

    DriveCommand::new(linear, angular)
}

fn discrete_for_key(key: &str) -> Option<DiscreteCommand> {
    match key {
        "n" => Some(DiscreteCommand::Noise),
        " " => Some(DiscreteCommand::Logs),
        "ArrowRight" => Some(DiscreteCommand::IndicatorRight),
        "ArrowLeft" => Some(DiscreteCommand::IndicatorLeft),
        "ArrowUp" => Some(DiscreteCommand::IndicatorStop),
        "ArrowDown" => Some(DiscreteCommand::Network),
        "m" => Some(DiscreteCommand::DriveMode),
        "q" => Some(DiscreteCommand::SpeedDown),
        "e" => Some(DiscreteCommand::SpeedUp),
        _ => None,
    }
}

/// Normalizes raw key events into drive and discrete commands.
///
/// While any movement key is held, the current shape is re-emitted on a
/// fixed interval; releasing the last movement key cancels the repeat
/// task and emits exactly one stop command.
pub struct Keyboard {
    cfg: KeyboardConfig,
    pressed: HashSet<MoveKey>,
    dispatcher: Arc<CommandDispatcher>,
    current: watch::Sender<DriveCommand>,
    repeat: Option<JoinHandle<()>>,
}

impl Keyboard {
    pub fn new(dispatcher: Arc<CommandDispatcher>, cfg: KeyboardConfig) -> Self {
        let (current, _) = watch::channel(DriveCommand::stop());
        Self {
            cfg,
            pressed: HashSet::new(),
            dispatcher,
            current,
            repeat: None,
        }
    }

    pub async fn process_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(key) => {
                if let Some(movement) = MoveKey::from_key(&key) {
                    self.pressed.insert(movement);
                    let shape = resolve(&self.pressed, &self.cfg);
                    self.current.send_replace(shape);
                    self.start_repeat();
                } else if let Some(command) = discrete_for_key(&key) {
                    self.dispatcher.command(command).await;
                } else if key == "Escape" {
                    self.dispatcher.reset().await;
                }
                // Unrecognized keys are ignored.
            }
            KeyEvent::Up(key) => {
                let Some(movement) = MoveKey::from_key(&key) else {
                    return;
                };
                self.pressed.remove(&movement);

                if self.pressed.is_empty() {
                    self.stop_repeat().await;
                } else {
                    self.current.send_replace(resolve(&self.pressed, &self.cfg));
                }
            }
        }
    }

    fn start_repeat(&mut self) {
        if self.repeat.is_some() {
            return;
        }

        debug!("movement key held, starting repeat timer");
        let dispatcher = self.dispatcher.clone();
        let rx = self.current.subscribe();
        let poll_rate = self.cfg.poll_rate;

        self.repeat = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_rate);
            loop {
                ticker.tick().await;
                let shape = *rx.borrow();
                dispatcher.drive(shape.linear, shape.angular).await;
            }
        }));
    }

    async fn stop_repeat(&mut self) {
        if let Some(handle) = self.repeat.take() {
            handle.abort();
            debug!("last movement key released, stopping");
            self.dispatcher.drive(0.0, 0.0).await;
        }
    }
}

impl Drop for Keyboard {
    fn drop(&mut self) {
        if let Some(handle) = self.repeat.take() {
            handle.abort();
        }
    }
}
