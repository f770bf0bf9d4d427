//! # NL Hold'em
//!
//! A real-time multiplayer No-Limit Texas Hold'em table.
//!
//! The crate has two layers:
//!
//! - [`game`]: the engine proper. Deck and cards, a 7-card hand evaluator,
//!   layered side-pot construction, the hand state machine (blinds, betting
//!   rounds, street advancement, showdown settlement), and a pure per-viewer
//!   view projection that hides hole cards.
//! - [`table`]: a single-writer actor owning one [`game::TableState`].
//!   Clients talk to it through a [`table::TableHandle`]; every mutation is a
//!   serialized command with an acknowledgement, and each subscriber receives
//!   its own projected snapshot after every change.
//!
//! Transports stay outside this crate; `nlh_server` speaks JSON over
//! WebSocket on top of the handle.
//!
//! ## Example
//!
//! ```
//! use nl_holdem::game::{GameSettings, TableState};
//! use nl_holdem::game::entities::ShuffledDeckSource;
//!
//! let mut table = TableState::new(GameSettings::default(), Box::new(ShuffledDeckSource));
//! table.set_username(1, "alice").unwrap();
//! table.sit(1, 0, 500).unwrap();
//! ```

pub mod game;
pub use game::{
    constants::{self, BIG_BLIND, MAX_BUY_IN, MAX_SEATS, MIN_BUY_IN, SMALL_BLIND},
    entities, functional, GameSettings, TableError, TableState, TableView,
};

pub mod table;
pub use table::{TableActor, TableCommand, TableConfig, TableEvent, TableHandle};
