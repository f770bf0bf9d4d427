//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::constants::{
    BIG_BLIND, MAX_BUY_IN, MAX_SEATS, MIN_BUY_IN, SHOWDOWN_PAUSE_MS, SMALL_BLIND,
};
use crate::game::entities::Chips;
use crate::game::GameSettings;

/// Table configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    /// Small blind amount
    pub small_blind: Chips,

    /// Big blind amount
    pub big_blind: Chips,

    /// Minimum buy-in in chips
    pub min_buy_in: Chips,

    /// Maximum buy-in in chips
    pub max_buy_in: Chips,

    /// Number of seats at the table
    pub max_seats: usize,

    /// How long showdown stays on screen before the table goes idle
    pub showdown_pause_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: SMALL_BLIND,
            big_blind: BIG_BLIND,
            min_buy_in: MIN_BUY_IN,
            max_buy_in: MAX_BUY_IN,
            max_seats: MAX_SEATS,
            showdown_pause_ms: SHOWDOWN_PAUSE_MS,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.small_blind == 0 {
            return Err("Small blind must be greater than 0".to_string());
        }

        if self.big_blind <= self.small_blind {
            return Err("Big blind must be greater than small blind".to_string());
        }

        if self.min_buy_in < self.big_blind {
            return Err("Min buy-in must cover at least the big blind".to_string());
        }

        if self.max_buy_in <= self.min_buy_in {
            return Err("Max buy-in must be greater than min buy-in".to_string());
        }

        if self.max_seats < 2 || self.max_seats > 23 {
            return Err("Max seats must be between 2 and 23".to_string());
        }

        Ok(())
    }

    /// Engine-level settings for this configuration.
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            min_buy_in: self.min_buy_in,
            max_buy_in: self.max_buy_in,
            max_seats: self.max_seats,
        }
    }
}
