use crate::broker::BrokerCommand;
use crate::ws::{ConnectionRegistry, Outbound};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tiller_core::ConnId;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(registry): State<ConnectionRegistry>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

async fn handle_socket(socket: WebSocket, registry: ConnectionRegistry) {
    let conn_id = ConnId::new();
    info!(%conn_id, "new WebSocket connection");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();

    registry.add_conn(conn_id, tx);

    if registry
        .broker_tx
        .send(BrokerCommand::Connected { conn_id })
        .await
        .is_err()
    {
        error!("broker is gone, dropping connection");
        registry.remove_conn(&conn_id);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(out) = rx.recv().await {
            let (msg, closing) = match out {
                Outbound::Text(text) => (Message::Text(text.into()), false),
                Outbound::Close => (Message::Close(None), true),
            };
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let registry = registry.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        let cmd = BrokerCommand::Message {
                            conn_id,
                            text: text.to_string(),
                        };
                        if registry.broker_tx.send(cmd).await.is_err() {
                            error!("broker died");
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    registry.remove_conn(&conn_id);
    let _ = registry
        .broker_tx
        .send(BrokerCommand::Disconnected { conn_id })
        .await;
    info!(%conn_id, "WebSocket disconnected");
}
