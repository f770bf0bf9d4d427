//! The Hold'em engine: cards, evaluation, pots, and the hand state machine.
//!
//! Everything here is synchronous and transport-free. The table actor in
//! [`crate::table`] wraps a [`state_machine::TableState`] behind a message
//! channel; tests can drive the state machine directly.

pub mod constants;
pub mod entities;
pub mod functional;
pub mod pots;
pub mod state_machine;
pub mod views;

pub use state_machine::{GameSettings, TableError, TableState};
pub use views::{render_view, SeatCards, SeatView, TableView};
