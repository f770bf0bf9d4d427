//! Table-wide constants.

use super::entities::Chips;

/// Number of seats at the table.
pub const MAX_SEATS: usize = 6;

/// Forced bet posted by the seat after the dealer.
pub const SMALL_BLIND: Chips = 10;

/// Forced bet posted by the seat after the small blind.
pub const BIG_BLIND: Chips = 20;

/// Smallest stack a player may sit down with.
pub const MIN_BUY_IN: Chips = 100;

/// Largest stack a player may sit down with.
pub const MAX_BUY_IN: Chips = 1_000_000;

/// Display names are truncated to this many characters.
pub const MAX_USERNAME_LEN: usize = 32;

/// How long the table lingers in showdown before returning to idle,
/// so clients can render the result.
pub const SHOWDOWN_PAUSE_MS: u64 = 2_500;
