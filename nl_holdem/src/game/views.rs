//! Per-viewer snapshots of the table.
//!
//! [`render_view`] is a pure function of the table state and a viewer
//! identity, so the hole-card hiding policy can be tested without any
//! transport. The actor fans a fresh projection out to every subscriber
//! after each mutation.

use serde::{Deserialize, Serialize};

use super::entities::{Card, Chips, ClientId, HandPhase, SeatIndex, Username};
use super::state_machine::TableState;

/// What a viewer may know about a seat's hole cards.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "visibility", content = "cards", rename_all = "lowercase")]
pub enum SeatCards {
    /// The seat holds cards this hand, but the viewer may not see them.
    Hidden,
    /// The viewer's own cards, or any live hand at a contested showdown.
    Revealed([Card; 2]),
}

/// One seat as a given viewer sees it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatView {
    pub name: Username,
    pub stack: Chips,
    pub current_bet: Chips,
    pub contribution: Chips,
    pub folded: bool,
    /// Absent when the seat was not dealt into the current hand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<SeatCards>,
}

/// Everything a client needs to render the table.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableView {
    pub phase: HandPhase,
    pub community: Vec<Card>,
    pub pot_total: Chips,
    pub turn_seat: Option<SeatIndex>,
    pub min_raise: Chips,
    pub dealer_button: Option<SeatIndex>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub owner_present: bool,
    pub seats: Vec<Option<SeatView>>,
}

/// Project the table for one observer. `viewer` of `None` renders the
/// spectator view, which never reveals anything the showdown would not.
#[must_use]
pub fn render_view(state: &TableState, viewer: Option<ClientId>) -> TableView {
    let phase = state.phase();
    let showdown_reveal = phase == HandPhase::Showdown && state.cards_revealed();

    let seats = state
        .seats()
        .iter()
        .enumerate()
        .map(|(seat, slot)| {
            slot.as_ref().map(|player| {
                let hole = state.hole_cards(seat).map(|cards| {
                    let own_seat = viewer == Some(player.client);
                    let folded = state.is_folded(seat);
                    if own_seat || (showdown_reveal && !folded) {
                        SeatCards::Revealed(cards)
                    } else {
                        SeatCards::Hidden
                    }
                });
                SeatView {
                    name: player.name.clone(),
                    stack: player.stack,
                    current_bet: state.current_bet(seat),
                    contribution: state.contribution(seat),
                    folded: state.is_folded(seat),
                    hole,
                }
            })
        })
        .collect();

    let settings = state.settings();
    TableView {
        phase,
        community: state.community().to_vec(),
        pot_total: state.pot_total(),
        turn_seat: state.turn_seat(),
        min_raise: state.min_raise(),
        dealer_button: state.dealer_button(),
        small_blind: settings.small_blind,
        big_blind: settings.big_blind,
        min_buy_in: settings.min_buy_in,
        max_buy_in: settings.max_buy_in,
        owner_present: state.owner().is_some(),
        seats,
    }
}
