//! Table actor implementation with async message handling.

use log::{debug, info, warn};
use std::collections::HashMap;
use tokio::{
    sync::mpsc,
    time::{sleep_until, Duration, Instant},
};

use super::{
    config::TableConfig,
    messages::{Ack, TableCommand, TableEvent},
};
use crate::game::entities::{ClientId, DeckSource, HandPhase, ShuffledDeckSource};
use crate::game::{render_view, TableError, TableState};

/// Table actor handle for sending commands.
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableCommand>,
}

impl TableHandle {
    /// Send a command to the table.
    pub async fn send(&self, command: TableCommand) -> Result<(), String> {
        self.sender
            .send(command)
            .await
            .map_err(|_| "Table is closed".to_string())
    }
}

/// The single writer that owns the table.
///
/// All mutations flow through the inbox, so command processing is strictly
/// sequential. The post-showdown pause is a timer inside the same loop;
/// when it fires, the idle transition runs as just another serialized step.
pub struct TableActor {
    state: TableState,

    /// Command inbox
    inbox: mpsc::Receiver<TableCommand>,

    /// Per-client channels for projected state snapshots
    subscribers: HashMap<ClientId, mpsc::Sender<TableEvent>>,

    /// When to fold the current showdown back to idle
    showdown_deadline: Option<Instant>,

    showdown_pause: Duration,
}

impl TableActor {
    /// Create a table actor and the handle for talking to it.
    #[must_use]
    pub fn new(config: TableConfig) -> (Self, TableHandle) {
        Self::with_deck_source(config, Box::new(ShuffledDeckSource))
    }

    /// Same, but with an injected deck source for deterministic play.
    #[must_use]
    pub fn with_deck_source(
        config: TableConfig,
        deck_source: Box<dyn DeckSource>,
    ) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(100);
        let actor = Self {
            state: TableState::new(config.settings(), deck_source),
            inbox,
            subscribers: HashMap::new(),
            showdown_deadline: None,
            showdown_pause: Duration::from_millis(config.showdown_pause_ms),
        };
        (actor, TableHandle { sender })
    }

    /// Run the table event loop until every handle is dropped.
    pub async fn run(mut self) {
        info!("table starting");

        loop {
            tokio::select! {
                command = self.inbox.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }

                () = sleep_until(self.showdown_deadline.unwrap_or_else(Instant::now)),
                    if self.showdown_deadline.is_some() =>
                {
                    self.showdown_deadline = None;
                    self.state.finish_showdown();
                    self.broadcast();
                }
            }

            // Arm the idle transition whenever a command lands us in
            // showdown; disarm if the hand went away some other way.
            match self.state.phase() {
                HandPhase::Showdown => {
                    if self.showdown_deadline.is_none() {
                        self.showdown_deadline = Some(Instant::now() + self.showdown_pause);
                    }
                }
                _ => self.showdown_deadline = None,
            }
        }

        info!("table closed");
    }

    fn handle_command(&mut self, command: TableCommand) {
        match command {
            TableCommand::Connect { client, subscriber } => {
                let view = render_view(&self.state, Some(client));
                let _ = subscriber.try_send(TableEvent::State(view));
                self.subscribers.insert(client, subscriber);
                debug!("client {client} connected");
            }

            TableCommand::Disconnect { client } => {
                self.subscribers.remove(&client);
                self.state.disconnect(client);
                debug!("client {client} disconnected");
                self.broadcast();
            }

            TableCommand::SetUsername { client, name, ack } => {
                let result = self.state.set_username(client, &name);
                self.ack_and_broadcast(ack, result);
            }

            TableCommand::ClaimOwner { client, ack } => {
                self.state.claim_owner(client);
                self.ack_and_broadcast(ack, Ok(()));
            }

            TableCommand::Sit {
                client,
                seat,
                buy_in,
                ack,
            } => {
                let result = self.state.sit(client, seat, buy_in);
                self.ack_and_broadcast(ack, result);
            }

            TableCommand::Stand { client, ack } => {
                let result = self.state.stand(client);
                self.ack_and_broadcast(ack, result);
            }

            TableCommand::Kick { client, seat, ack } => {
                let result = self.state.kick(client, seat);
                self.ack_and_broadcast(ack, result);
            }

            TableCommand::StartHand { client, ack } => {
                let result = self.state.start_hand(client);
                self.ack_and_broadcast(ack, result);
            }

            TableCommand::TakeAction {
                client,
                action,
                ack,
            } => {
                let result = self.state.take_action(client, action);
                self.ack_and_broadcast(ack, result);
            }
        }
    }

    /// Reply on the ack channel; a rejected command changed nothing, so
    /// only successes are worth a broadcast.
    fn ack_and_broadcast(&mut self, ack: Ack, result: Result<(), TableError>) {
        let ok = result.is_ok();
        let _ = ack.send(result);
        if ok {
            self.broadcast();
        }
    }

    /// Send every subscriber its own projection of the current state.
    fn broadcast(&mut self) {
        let state = &self.state;
        self.subscribers.retain(|&client, subscriber| {
            let view = render_view(state, Some(client));
            match subscriber.try_send(TableEvent::State(view)) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("subscriber {client} channel full, dropping snapshot");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("subscriber {client} gone, removing");
                    false
                }
            }
        });
    }
}
