//! WebSocket handler for real-time table communication.
//!
//! Clients connect to `GET /ws` and speak JSON both ways. Each connection
//! gets a fresh `ClientId`, a `Connect` registration with the table actor,
//! and then a two-way pump: incoming commands are forwarded with a oneshot
//! ack that becomes an `{ok, error?}` reply, while the actor pushes this
//! client's own projection of the table after every mutation.
//!
//! # Client messages
//!
//! ```json
//! {"type": "set_username", "name": "alice"}
//! {"type": "claim_owner"}
//! {"type": "sit", "seat": 2, "buy_in": 1000}
//! {"type": "stand"}
//! {"type": "kick", "seat": 2}
//! {"type": "start_hand"}
//! {"type": "action", "action": {"type": "raise", "amount": 40}}
//! ```
//!
//! # Server messages
//!
//! ```json
//! {"type": "ack", "ok": false, "error": "not-your-turn"}
//! {"type": "state", "view": { ... }}
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use nl_holdem::game::entities::{Action, Chips, ClientId, SeatIndex};
use nl_holdem::game::{TableError, TableView};
use nl_holdem::table::{TableCommand, TableEvent, TableHandle};

/// Shared state for all WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    table: TableHandle,
    next_client_id: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(table: TableHandle) -> Self {
        Self {
            table,
            next_client_id: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_client_id(&self) -> ClientId {
        self.next_client_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Build the server router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Client messages received via WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    SetUsername { name: String },
    ClaimOwner,
    Sit { seat: SeatIndex, buy_in: Chips },
    Stand,
    Kick { seat: SeatIndex },
    StartHand,
    Action { action: Action },
}

/// Messages pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Ack {
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    State {
        view: TableView,
    },
}

impl ServerMessage {
    fn ack(result: Result<(), TableError>) -> Self {
        match result {
            Ok(()) => Self::Ack {
                ok: true,
                error: None,
            },
            Err(error) => Self::Ack {
                ok: false,
                error: Some(error.to_string()),
            },
        }
    }
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pump one connection until it closes, then tell the table.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let client = state.next_client_id();
    info!("websocket connected: client={client}");

    let (sender, receiver) = socket.split();
    let (event_tx, event_rx) = mpsc::channel::<TableEvent>(32);
    if state
        .table
        .send(TableCommand::Connect {
            client,
            subscriber: event_tx,
        })
        .await
        .is_err()
    {
        return;
    }

    pump(&state.table, client, sender, receiver, event_rx).await;

    let _ = state.table.send(TableCommand::Disconnect { client }).await;
    info!("websocket disconnected: client={client}");
}

async fn pump(
    table: &TableHandle,
    client: ClientId,
    mut sender: SplitSink<WebSocket, Message>,
    mut receiver: SplitStream<WebSocket>,
    mut events: mpsc::Receiver<TableEvent>,
) {
    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let Some(reply) = handle_text(table, client, &text).await else {
                            break;
                        };
                        if send_json(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // pings are answered by axum; binary is ignored
                    Some(Err(e)) => {
                        debug!("websocket error for client {client}: {e}");
                        break;
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Some(TableEvent::State(view)) => {
                        if send_json(&mut sender, &ServerMessage::State { view }).await.is_err() {
                            break;
                        }
                    }
                    // The actor dropped us (e.g. table shut down).
                    None => break,
                }
            }
        }
    }
}

/// Parse and dispatch a client message. Returns `None` when the table actor
/// is gone and the connection should close.
async fn handle_text(table: &TableHandle, client: ClientId, text: &str) -> Option<ServerMessage> {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            debug!("client {client} sent unparseable message: {e}");
            return Some(ServerMessage::ack(Err(TableError::UnknownAction)));
        }
    };

    let (ack, rx) = oneshot::channel();
    let command = match message {
        ClientMessage::SetUsername { name } => TableCommand::SetUsername { client, name, ack },
        ClientMessage::ClaimOwner => TableCommand::ClaimOwner { client, ack },
        ClientMessage::Sit { seat, buy_in } => TableCommand::Sit {
            client,
            seat,
            buy_in,
            ack,
        },
        ClientMessage::Stand => TableCommand::Stand { client, ack },
        ClientMessage::Kick { seat } => TableCommand::Kick { client, seat, ack },
        ClientMessage::StartHand => TableCommand::StartHand { client, ack },
        ClientMessage::Action { action } => TableCommand::TakeAction {
            client,
            action,
            ack,
        },
    };

    table.send(command).await.ok()?;
    let result = rx.await.ok()?;
    Some(ServerMessage::ack(result))
}

async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(message).unwrap_or_default();
    sender.send(Message::Text(payload)).await
}
