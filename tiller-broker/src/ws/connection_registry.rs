use crate::broker::{BrokerCommand, RelayOutput};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tiller_core::ConnId;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Frame handed to a connection's writer task.
#[derive(Debug)]
pub enum Outbound {
    Text(String),
    Close,
}

/// Holds the outbound sender of every live WebSocket and bridges the
/// broker actor back to them.
#[derive(Clone)]
pub struct ConnectionRegistry {
    conns: Arc<DashMap<ConnId, mpsc::UnboundedSender<Outbound>>>,
    pub(crate) broker_tx: mpsc::Sender<BrokerCommand>,
}

impl ConnectionRegistry {
    pub fn new(broker_tx: mpsc::Sender<BrokerCommand>) -> Self {
        Self {
            conns: Arc::new(DashMap::new()),
            broker_tx,
        }
    }

    pub fn add_conn(&self, conn_id: ConnId, tx: mpsc::UnboundedSender<Outbound>) {
        self.conns.insert(conn_id, tx);
    }

    pub fn remove_conn(&self, conn_id: &ConnId) {
        self.conns.remove(conn_id);
    }
}

#[async_trait]
impl RelayOutput for ConnectionRegistry {
    async fn send_text(&self, conn_id: ConnId, text: String) {
        if let Some(conn) = self.conns.get(&conn_id) {
            if let Err(e) = conn.send(Outbound::Text(text)) {
                error!(%conn_id, "failed to queue outbound frame: {e}");
            }
        } else {
            warn!(%conn_id, "send to unregistered connection");
        }
    }

    async fn close(&self, conn_id: ConnId) {
        if let Some(conn) = self.conns.get(&conn_id) {
            let _ = conn.send(Outbound::Close);
        }
    }
}
