//! Table actor message types.

use tokio::sync::{mpsc, oneshot};

use crate::game::entities::{Action, Chips, ClientId, SeatIndex};
use crate::game::{TableError, TableView};

/// Acknowledgement channel carried by every mutating command. `Ok(())`
/// means the command was applied; `Err` names the rejection and implies
/// no state change.
pub type Ack = oneshot::Sender<Result<(), TableError>>;

/// Commands a client (or the transport on its behalf) can send to a table.
#[derive(Debug)]
pub enum TableCommand {
    /// Register a connection and its event channel. The subscriber
    /// immediately receives a snapshot projected for this client.
    Connect {
        client: ClientId,
        subscriber: mpsc::Sender<TableEvent>,
    },

    /// Connection closed. Frees the client's seat mid-hand as a fold and
    /// releases the owner role if it held it.
    Disconnect { client: ClientId },

    /// Associate a display name with the connection
    SetUsername {
        client: ClientId,
        name: String,
        ack: Ack,
    },

    /// Claim the owner role; the most recent claimant wins
    ClaimOwner { client: ClientId, ack: Ack },

    /// Occupy an empty seat with a clamped buy-in
    Sit {
        client: ClientId,
        seat: SeatIndex,
        buy_in: Chips,
        ack: Ack,
    },

    /// Leave the current seat
    Stand { client: ClientId, ack: Ack },

    /// Owner-only forced stand
    Kick {
        client: ClientId,
        seat: SeatIndex,
        ack: Ack,
    },

    /// Owner-only; begin a new hand
    StartHand { client: ClientId, ack: Ack },

    /// Betting action for the client's own seat
    TakeAction {
        client: ClientId,
        action: Action,
        ack: Ack,
    },
}

/// Events pushed to subscribers. Each subscriber gets its own projection,
/// so a `State` event never contains another player's hole cards.
#[derive(Clone, Debug)]
pub enum TableEvent {
    State(TableView),
}
