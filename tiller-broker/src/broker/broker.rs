use crate::broker::{BrokerCommand, RelayOutput, Room};
use std::collections::HashMap;
use std::sync::Arc;
use tiller_core::{ConnId, RelayMessage, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Sent to every new connection: the original protocol's prompt asking
/// the client to claim its room.
const CLAIM_PROMPT: &str = r#"{"roomId":"request-roomId"}"#;

/// Single-writer owner of the room table. All mutation happens inside
/// `run`, fed by one command channel, so no lock guards the table.
pub struct Broker {
    command_rx: mpsc::Receiver<BrokerCommand>,
    output: Arc<dyn RelayOutput>,
    rooms: HashMap<RoomId, Room>,
    /// Every live connection and the room it claimed, if any.
    conns: HashMap<ConnId, Option<RoomId>>,
}

impl Broker {
    pub fn new(command_rx: mpsc::Receiver<BrokerCommand>, output: Arc<dyn RelayOutput>) -> Self {
        Self {
            command_rx,
            output,
            rooms: HashMap::new(),
            conns: HashMap::new(),
        }
    }

    /// Spawns the broker loop and returns its command sender.
    pub fn spawn(output: Arc<dyn RelayOutput>) -> mpsc::Sender<BrokerCommand> {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(Broker::new(rx, output).run());
        tx
    }

    pub async fn run(mut self) {
        info!("broker event loop started");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                BrokerCommand::Connected { conn_id } => self.handle_connected(conn_id).await,
                BrokerCommand::Message { conn_id, text } => {
                    self.handle_message(conn_id, text).await
                }
                BrokerCommand::Disconnected { conn_id } => self.handle_disconnected(conn_id).await,
            }
        }

        info!("broker event loop finished");
    }

    async fn handle_connected(&mut self, conn_id: ConnId) {
        info!(%conn_id, total = self.conns.len() + 1, "client connected");
        self.conns.insert(conn_id, None);
        self.output.send_text(conn_id, CLAIM_PROMPT.to_string()).await;
    }

    /// A bad frame never crashes the loop or touches the room table;
    /// unrelated clients keep being served.
    async fn handle_message(&mut self, conn_id: ConnId, text: String) {
        let message: RelayMessage = match serde_json::from_str(&text) {
            Ok(message) => message,
            Err(e) => {
                warn!(%conn_id, "unparseable message dropped: {e}");
                return;
            }
        };

        if let RelayMessage::Drive { drive_cmd } = &message {
            debug!(%conn_id, ?drive_cmd, "relaying drive command");
        }

        match self.conns.get(&conn_id).and_then(|room| room.clone()) {
            Some(room_id) => self.relay_to_room(&room_id, conn_id, &text).await,
            None => {
                if let Some(room_id) = message.claimed_room() {
                    self.claim(conn_id, RoomId::from(room_id));
                } else {
                    // Legacy single-room deployment: no claim, relay to
                    // everyone else on the server.
                    self.broadcast_to_all(conn_id, &text).await;
                }
            }
        }
    }

    async fn handle_disconnected(&mut self, conn_id: ConnId) {
        let claimed = self.conns.remove(&conn_id).flatten();
        info!(%conn_id, total = self.conns.len(), "client disconnected");

        let Some(room_id) = claimed else {
            return;
        };

        // Rooms never linger half-populated: drop the whole entry and
        // push the survivor out.
        let Some(room) = self.rooms.remove(&room_id) else {
            return;
        };

        for other in room.others(conn_id) {
            if let Some(association) = self.conns.get_mut(&other) {
                *association = None;
            }
            self.output.close(other).await;
        }

        info!(%room_id, "room reclaimed");
    }

    fn claim(&mut self, conn_id: ConnId, room_id: RoomId) {
        match self.rooms.get_mut(&room_id) {
            None => {
                info!(%room_id, %conn_id, "creating room");
                self.rooms.insert(room_id.clone(), Room::new(conn_id));
                self.conns.insert(conn_id, Some(room_id));
            }
            Some(room) => {
                if room.claim(conn_id) {
                    info!(%room_id, %conn_id, "joined room, pair complete");
                    self.conns.insert(conn_id, Some(room_id));
                } else {
                    warn!(%room_id, %conn_id, "room is full, claim rejected");
                }
            }
        }
    }

    async fn relay_to_room(&self, room_id: &RoomId, sender: ConnId, text: &str) {
        let Some(room) = self.rooms.get(room_id) else {
            warn!(%room_id, "no room for associated connection");
            return;
        };

        for other in room.others(sender) {
            self.output.send_text(other, text.to_string()).await;
        }
    }

    async fn broadcast_to_all(&self, sender: ConnId, text: &str) {
        for other in self.conns.keys().copied() {
            if other != sender {
                self.output.send_text(other, text.to_string()).await;
            }
        }
    }
}
