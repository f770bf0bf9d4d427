//! Table state and the hand state machine.
//!
//! A [`TableState`] owns the seats, the owner role, and at most one running
//! hand. Commands validate against the current phase and turn, mutate state,
//! and then let `progress` advance the turn, the street, or the settlement.
//! Callers are expected to serialize access (see `crate::table::TableActor`).

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::constants::{BIG_BLIND, MAX_BUY_IN, MAX_SEATS, MIN_BUY_IN, SMALL_BLIND};
use super::entities::{
    Action, Card, Chips, ClientId, Deck, DeckSource, HandPhase, Player, SeatIndex, Username,
};
use super::functional::{argmax, eval, HandScore};
use super::pots::build_side_pots;

/// Why a command was rejected. The display form is the wire-level error tag.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TableError {
    #[error("not-seated")]
    NotSeated,
    #[error("not-owner")]
    NotOwner,
    #[error("not-your-turn")]
    NotYourTurn,
    #[error("already-folded")]
    AlreadyFolded,
    #[error("invalid-seat")]
    InvalidSeat,
    #[error("seat-occupied")]
    SeatOccupied,
    #[error("no-username")]
    NoUsername,
    #[error("not-enough-players")]
    NotEnoughPlayers,
    #[error("hand-in-progress")]
    HandInProgress,
    #[error("not-in-betting-phase")]
    NotInBettingPhase,
    #[error("invalid-amount")]
    InvalidAmount,
    #[error("raise-below-minimum")]
    RaiseBelowMinimum,
    #[error("insufficient-chips")]
    InsufficientChips,
    #[error("cannot-check")]
    CannotCheck,
    #[error("unknown-action")]
    UnknownAction,
}

/// Table parameters. Defaults come from [`super::constants`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub max_seats: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            small_blind: SMALL_BLIND,
            big_blind: BIG_BLIND,
            min_buy_in: MIN_BUY_IN,
            max_buy_in: MAX_BUY_IN,
            max_seats: MAX_SEATS,
        }
    }
}

/// Ephemeral per-hand state. Bookkeeping is indexed by seat so that a seat
/// vacated mid-hand keeps its folded flag and contributions.
#[derive(Debug)]
struct Hand {
    deck: Deck,
    community: Vec<Card>,
    phase: HandPhase,
    hole_cards: HashMap<SeatIndex, [Card; 2]>,
    /// Seats dealt into this hand, clockwise starting after the button.
    active_seats: Vec<SeatIndex>,
    folded: Vec<bool>,
    contributions: Vec<Chips>,
    current_bets: Vec<Chips>,
    pot_total: Chips,
    turn_seat: Option<SeatIndex>,
    min_raise: Chips,
    last_aggressor: Option<SeatIndex>,
    /// Whether a seat has voluntarily acted in the current round. Posting a
    /// blind does not count, which is exactly the big blind's preflop option.
    acted: Vec<bool>,
    /// Hole cards become public only at a contested showdown, never on an
    /// uncontested win.
    revealed: bool,
}

/// The single shared table: seats, owner role, dealer button, and the
/// current hand if one is running.
pub struct TableState {
    settings: GameSettings,
    seats: Vec<Option<Player>>,
    usernames: HashMap<ClientId, Username>,
    owner: Option<ClientId>,
    dealer_button: Option<SeatIndex>,
    hand: Option<Hand>,
    /// (client, stack) per seat at hand start, for abort recovery.
    pre_hand_stacks: Vec<Option<(ClientId, Chips)>>,
    /// Seated chips plus pot at hand start; adjusted when players come or go.
    chip_total: Chips,
    deck_source: Box<dyn DeckSource>,
}

impl TableState {
    #[must_use]
    pub fn new(settings: GameSettings, deck_source: Box<dyn DeckSource>) -> Self {
        let max_seats = settings.max_seats;
        Self {
            settings,
            seats: vec![None; max_seats],
            usernames: HashMap::new(),
            owner: None,
            dealer_button: None,
            hand: None,
            pre_hand_stacks: vec![None; max_seats],
            chip_total: 0,
            deck_source,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn seats(&self) -> &[Option<Player>] {
        &self.seats
    }

    #[must_use]
    pub fn phase(&self) -> HandPhase {
        self.hand.as_ref().map_or(HandPhase::Idle, |h| h.phase)
    }

    #[must_use]
    pub fn pot_total(&self) -> Chips {
        self.hand.as_ref().map_or(0, |h| h.pot_total)
    }

    #[must_use]
    pub fn community(&self) -> &[Card] {
        self.hand.as_ref().map_or(&[], |h| h.community.as_slice())
    }

    #[must_use]
    pub fn turn_seat(&self) -> Option<SeatIndex> {
        self.hand.as_ref().and_then(|h| h.turn_seat)
    }

    #[must_use]
    pub fn min_raise(&self) -> Chips {
        self.hand
            .as_ref()
            .map_or(self.settings.big_blind, |h| h.min_raise)
    }

    #[must_use]
    pub fn last_aggressor(&self) -> Option<SeatIndex> {
        self.hand.as_ref().and_then(|h| h.last_aggressor)
    }

    #[must_use]
    pub fn dealer_button(&self) -> Option<SeatIndex> {
        self.dealer_button
    }

    #[must_use]
    pub fn owner(&self) -> Option<ClientId> {
        self.owner
    }

    #[must_use]
    pub fn seat_of(&self, client: ClientId) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|seat| seat.as_ref().is_some_and(|p| p.client == client))
    }

    #[must_use]
    pub fn username_of(&self, client: ClientId) -> Option<&Username> {
        self.usernames.get(&client)
    }

    #[must_use]
    pub fn stack_of(&self, seat: SeatIndex) -> Option<Chips> {
        self.seats.get(seat)?.as_ref().map(|p| p.stack)
    }

    #[must_use]
    pub fn current_bet(&self, seat: SeatIndex) -> Chips {
        self.hand
            .as_ref()
            .map_or(0, |h| h.current_bets.get(seat).copied().unwrap_or(0))
    }

    #[must_use]
    pub fn contribution(&self, seat: SeatIndex) -> Chips {
        self.hand
            .as_ref()
            .map_or(0, |h| h.contributions.get(seat).copied().unwrap_or(0))
    }

    #[must_use]
    pub fn is_folded(&self, seat: SeatIndex) -> bool {
        self.hand
            .as_ref()
            .is_some_and(|h| h.folded.get(seat).copied().unwrap_or(false))
    }

    /// True iff the seat was dealt into the current hand.
    #[must_use]
    pub fn was_dealt(&self, seat: SeatIndex) -> bool {
        self.hand
            .as_ref()
            .is_some_and(|h| h.hole_cards.contains_key(&seat))
    }

    /// The seat's hole cards, regardless of viewer. Visibility policy lives
    /// in the view projection, not here.
    #[must_use]
    pub fn hole_cards(&self, seat: SeatIndex) -> Option<[Card; 2]> {
        self.hand.as_ref()?.hole_cards.get(&seat).copied()
    }

    /// Whether showdown reached a contested reveal. False on an uncontested
    /// win, where the remaining player's cards stay private.
    #[must_use]
    pub fn cards_revealed(&self) -> bool {
        self.hand.as_ref().is_some_and(|h| h.revealed)
    }

    // === Seating and roles ===

    pub fn set_username(&mut self, client: ClientId, name: &str) -> Result<(), TableError> {
        let name = Username::new(name);
        if name.is_empty() {
            return Err(TableError::NoUsername);
        }
        self.usernames.insert(client, name);
        Ok(())
    }

    /// The most recent claimant holds the owner role.
    pub fn claim_owner(&mut self, client: ClientId) {
        if let Some(previous) = self.owner.replace(client) {
            if previous != client {
                info!("owner role moved from client {previous} to {client}");
            }
        }
    }

    pub fn sit(
        &mut self,
        client: ClientId,
        seat: SeatIndex,
        buy_in: Chips,
    ) -> Result<(), TableError> {
        let name = self
            .usernames
            .get(&client)
            .cloned()
            .ok_or(TableError::NoUsername)?;
        if seat >= self.settings.max_seats {
            return Err(TableError::InvalidSeat);
        }
        if self.seats[seat].is_some() || self.seat_of(client).is_some() {
            return Err(TableError::SeatOccupied);
        }
        if buy_in == 0 {
            return Err(TableError::InvalidAmount);
        }
        let buy_in = buy_in.clamp(self.settings.min_buy_in, self.settings.max_buy_in);
        self.chip_total += buy_in;
        info!("{name} sits at seat {seat} with {buy_in}");
        self.seats[seat] = Some(Player::new(client, name, buy_in));
        Ok(())
    }

    pub fn stand(&mut self, client: ClientId) -> Result<(), TableError> {
        let seat = self.seat_of(client).ok_or(TableError::NotSeated)?;
        self.vacate(seat);
        Ok(())
    }

    /// Owner-only forced stand.
    pub fn kick(&mut self, client: ClientId, seat: SeatIndex) -> Result<(), TableError> {
        if self.owner != Some(client) {
            return Err(TableError::NotOwner);
        }
        if seat >= self.settings.max_seats || self.seats[seat].is_none() {
            return Err(TableError::InvalidSeat);
        }
        self.vacate(seat);
        Ok(())
    }

    /// A disconnect is a stand plus loss of username and owner role.
    pub fn disconnect(&mut self, client: ClientId) {
        if let Some(seat) = self.seat_of(client) {
            self.vacate(seat);
        }
        self.usernames.remove(&client);
        if self.owner == Some(client) {
            self.owner = None;
        }
    }

    /// Free a slot. A seat dealt into the running hand folds first; its
    /// contributions stay in the pot.
    fn vacate(&mut self, seat: SeatIndex) {
        let Some(player) = self.seats[seat].take() else {
            return;
        };
        self.chip_total = self.chip_total.saturating_sub(player.stack);
        info!("{} leaves seat {seat} with {}", player.name, player.stack);

        let mut folded = false;
        if let Some(hand) = self.hand.as_mut() {
            if hand.phase.is_betting()
                && hand.hole_cards.contains_key(&seat)
                && !hand.folded[seat]
            {
                hand.folded[seat] = true;
                folded = true;
            }
        }
        if folded {
            self.progress(None);
        }
    }

    // === Hand lifecycle ===

    /// Begin a new hand: rotate the button, post blinds, deal hole cards,
    /// and hand the turn to the seat after the big blind.
    pub fn start_hand(&mut self, client: ClientId) -> Result<(), TableError> {
        if self.owner != Some(client) {
            return Err(TableError::NotOwner);
        }
        if self.hand.is_some() {
            return Err(TableError::HandInProgress);
        }
        let n = self.settings.max_seats;
        let funded = self
            .seats
            .iter()
            .filter(|s| s.as_ref().is_some_and(|p| p.stack > 0))
            .count();
        if funded < 2 {
            return Err(TableError::NotEnoughPlayers);
        }

        self.pre_hand_stacks = self
            .seats
            .iter()
            .map(|s| s.as_ref().map(|p| (p.client, p.stack)))
            .collect();
        self.chip_total = self.seats.iter().flatten().map(|p| p.stack).sum();

        let from = self.dealer_button.unwrap_or(n - 1);
        let Some(button) = self.next_funded_after(from) else {
            return Err(TableError::NotEnoughPlayers);
        };
        self.dealer_button = Some(button);

        // Seats dealt in, clockwise starting left of the button.
        let active_seats: Vec<SeatIndex> = (1..=n)
            .map(|offset| (button + offset) % n)
            .filter(|&s| self.seats[s].as_ref().is_some_and(|p| p.stack > 0))
            .collect();
        let small_blind_seat = active_seats[0];
        let big_blind_seat = active_seats[1];

        let mut hand = Hand {
            deck: self.deck_source.next_deck(),
            community: Vec::with_capacity(5),
            phase: HandPhase::Preflop,
            hole_cards: HashMap::with_capacity(active_seats.len()),
            active_seats,
            folded: vec![false; n],
            contributions: vec![0; n],
            current_bets: vec![0; n],
            pot_total: 0,
            turn_seat: None,
            min_raise: self.settings.big_blind,
            last_aggressor: None,
            acted: vec![false; n],
            revealed: false,
        };

        // Short stacks post what they can and are all-in for it.
        commit(
            &mut self.seats,
            &mut hand,
            small_blind_seat,
            self.settings.small_blind,
        );
        commit(
            &mut self.seats,
            &mut hand,
            big_blind_seat,
            self.settings.big_blind,
        );

        for i in 0..hand.active_seats.len() {
            let seat = hand.active_seats[i];
            let (Some(first), Some(second)) = (hand.deck.draw(), hand.deck.draw()) else {
                error!("deck exhausted while dealing hole cards");
                self.hand = Some(hand);
                self.abort_hand();
                return Ok(());
            };
            hand.hole_cards.insert(seat, [first, second]);
        }

        info!(
            "hand started: button seat {button}, blind seats {small_blind_seat}/{big_blind_seat}, {} players",
            hand.hole_cards.len()
        );
        self.hand = Some(hand);

        if !self.conservation_holds() {
            error!("chip conservation violated posting blinds");
            self.abort_hand();
            return Ok(());
        }
        self.progress(Some(big_blind_seat));
        Ok(())
    }

    /// Validate and apply a betting action for the client's seat.
    pub fn take_action(&mut self, client: ClientId, action: Action) -> Result<(), TableError> {
        let seat = self.seat_of(client).ok_or(TableError::NotSeated)?;
        let hand = self.hand.as_mut().ok_or(TableError::NotInBettingPhase)?;
        if !hand.phase.is_betting() {
            return Err(TableError::NotInBettingPhase);
        }
        if hand.hole_cards.contains_key(&seat) && hand.folded[seat] {
            return Err(TableError::AlreadyFolded);
        }
        if hand.turn_seat != Some(seat) {
            return Err(TableError::NotYourTurn);
        }

        let stack = self.seats[seat].as_ref().map_or(0, |p| p.stack);
        let max_bet = hand.current_bets.iter().copied().max().unwrap_or(0);
        let owed = max_bet - hand.current_bets[seat];

        match action {
            Action::Fold => {
                hand.folded[seat] = true;
            }
            Action::Check => {
                if owed > 0 {
                    return Err(TableError::CannotCheck);
                }
            }
            Action::Call => {
                if owed == 0 {
                    return Err(TableError::InvalidAmount);
                }
                // Capped at the stack; a short call is an all-in.
                commit(&mut self.seats, hand, seat, owed);
            }
            Action::Bet(amount) | Action::Raise(amount) => {
                if amount == 0 {
                    return Err(TableError::InvalidAmount);
                }
                // A seat that already acted sees the action again only after
                // a short all-in, and that does not reopen the betting.
                if hand.acted[seat] {
                    return Err(TableError::RaiseBelowMinimum);
                }
                if amount < hand.min_raise {
                    return Err(TableError::RaiseBelowMinimum);
                }
                let required = owed + amount;
                if required > stack {
                    return Err(TableError::InsufficientChips);
                }
                commit(&mut self.seats, hand, seat, required);
                hand.min_raise = hand.min_raise.max(amount);
                hand.last_aggressor = Some(seat);
                reopen_betting(hand, seat);
            }
            Action::AllIn => {
                if stack == 0 {
                    return Err(TableError::InsufficientChips);
                }
                commit(&mut self.seats, hand, seat, stack);
                let raise_portion = hand.current_bets[seat].saturating_sub(max_bet);
                if raise_portion >= hand.min_raise {
                    hand.min_raise = raise_portion;
                    hand.last_aggressor = Some(seat);
                    reopen_betting(hand, seat);
                }
            }
        }

        hand.acted[seat] = true;
        if !self.conservation_holds() {
            error!("chip conservation violated after {action}");
            self.abort_hand();
            return Ok(());
        }
        self.progress(Some(seat));
        Ok(())
    }

    /// Scheduled transition out of showdown, delivered by the owning actor's
    /// timer as an ordinary serialized command.
    pub fn finish_showdown(&mut self) {
        if self.phase() == HandPhase::Showdown {
            self.hand = None;
        }
    }

    // === Internals ===

    /// Drive the hand forward after any mutation: uncontested wins, turn
    /// advancement, street transitions, and showdown settlement.
    ///
    /// `cursor` is the seat whose turn just ended; `None` means the turn
    /// holder may be unchanged (an out-of-turn fold happened).
    fn progress(&mut self, mut cursor: Option<SeatIndex>) {
        loop {
            let seats = &mut self.seats;
            let Some(hand) = self.hand.as_mut() else {
                return;
            };
            if !hand.phase.is_betting() {
                return;
            }

            let unfolded: Vec<SeatIndex> = hand
                .active_seats
                .iter()
                .copied()
                .filter(|&s| !hand.folded[s])
                .collect();
            if unfolded.len() <= 1 {
                if let Some(&winner) = unfolded.first() {
                    if let Some(player) = seats[winner].as_mut() {
                        player.stack += hand.pot_total;
                        info!("{} wins {} uncontested", player.name, hand.pot_total);
                    }
                }
                hand.pot_total = 0;
                hand.phase = HandPhase::Showdown;
                hand.turn_seat = None;
                return;
            }

            if !round_complete(seats, hand) {
                match cursor {
                    Some(from) => {
                        hand.turn_seat = next_actionable(seats, hand, from);
                    }
                    None => {
                        // Keep the turn unless its holder just became invalid.
                        if let Some(turn) = hand.turn_seat {
                            if !is_actionable(seats, hand, turn) {
                                hand.turn_seat = next_actionable(seats, hand, turn);
                            }
                        }
                    }
                }
                return;
            }

            let next_phase = match hand.phase {
                HandPhase::Preflop => HandPhase::Flop,
                HandPhase::Flop => HandPhase::Turn,
                HandPhase::Turn => HandPhase::River,
                _ => {
                    self.settle_showdown();
                    return;
                }
            };
            let count = if next_phase == HandPhase::Flop { 3 } else { 1 };

            // Burn one, then deal the street.
            let mut dealt = hand.deck.draw().is_some();
            for _ in 0..count {
                match hand.deck.draw() {
                    Some(card) => hand.community.push(card),
                    None => dealt = false,
                }
            }
            if !dealt {
                error!("deck exhausted while dealing {next_phase}");
                self.abort_hand();
                return;
            }

            hand.phase = next_phase;
            hand.current_bets.fill(0);
            hand.acted.fill(false);
            hand.min_raise = self.settings.big_blind;
            hand.last_aggressor = None;
            hand.turn_seat = None;
            info!("dealing {next_phase}, board has {} cards", hand.community.len());

            // First to act post-flop sits left of the button. Loop again:
            // with fewer than two seats able to act the round is already
            // complete and the next street follows immediately.
            cursor = self.dealer_button;
        }
    }

    /// Contested showdown: score every live seat, slice the pot into side
    /// pots, and pay each one out to its best hand(s).
    fn settle_showdown(&mut self) {
        let seats = &mut self.seats;
        let Some(hand) = self.hand.as_mut() else {
            return;
        };
        hand.phase = HandPhase::Showdown;
        hand.turn_seat = None;
        hand.revealed = true;

        let n = seats.len();
        let eligible: Vec<bool> = (0..n)
            .map(|s| hand.hole_cards.contains_key(&s) && !hand.folded[s])
            .collect();

        let mut scores: HashMap<SeatIndex, HandScore> = HashMap::new();
        for (&seat, hole) in &hand.hole_cards {
            if hand.folded[seat] {
                continue;
            }
            let mut cards = hole.to_vec();
            cards.extend_from_slice(&hand.community);
            scores.insert(seat, eval(&cards));
        }

        let button = self.dealer_button.unwrap_or(0);
        for pot in build_side_pots(&hand.contributions, &eligible) {
            let pot_scores: Vec<HandScore> =
                pot.eligible.iter().map(|s| scores[s].clone()).collect();
            let winners: Vec<SeatIndex> = argmax(&pot_scores)
                .into_iter()
                .map(|i| pot.eligible[i])
                .collect();
            if winners.is_empty() {
                warn!("pot of {} had no winner", pot.amount);
                continue;
            }

            let share = pot.amount / winners.len() as Chips;
            let remainder = pot.amount % winners.len() as Chips;
            // Odd chips go to the winner closest left of the button.
            let first = winners
                .iter()
                .copied()
                .min_by_key(|&s| (s + n - button - 1) % n);
            for &winner in &winners {
                let mut won = share;
                if Some(winner) == first {
                    won += remainder;
                }
                if let Some(player) = seats[winner].as_mut() {
                    player.stack += won;
                    info!("{} wins {won} with {}", player.name, scores[&winner]);
                }
            }
        }
        hand.pot_total = 0;
    }

    /// Programming-error escape hatch: drop the hand and put every unchanged
    /// seat back on its pre-hand stack.
    fn abort_hand(&mut self) {
        error!("aborting hand, restoring pre-hand stacks");
        for (seat, snapshot) in self.pre_hand_stacks.iter().enumerate() {
            if let (Some((client, stack)), Some(player)) = (snapshot, self.seats[seat].as_mut())
            {
                if player.client == *client {
                    player.stack = *stack;
                }
            }
        }
        self.hand = None;
    }

    fn conservation_holds(&self) -> bool {
        let Some(hand) = self.hand.as_ref() else {
            return true;
        };
        let stacks: Chips = self.seats.iter().flatten().map(|p| p.stack).sum();
        stacks + hand.pot_total == self.chip_total
    }

    fn next_funded_after(&self, from: SeatIndex) -> Option<SeatIndex> {
        let n = self.settings.max_seats;
        (1..=n)
            .map(|offset| (from + offset) % n)
            .find(|&s| self.seats[s].as_ref().is_some_and(|p| p.stack > 0))
    }
}

/// Move chips from a stack into the hand, capped at what the stack holds.
fn commit(seats: &mut [Option<Player>], hand: &mut Hand, seat: SeatIndex, amount: Chips) {
    if let Some(player) = seats[seat].as_mut() {
        let amount = amount.min(player.stack);
        player.stack -= amount;
        hand.current_bets[seat] += amount;
        hand.contributions[seat] += amount;
        hand.pot_total += amount;
    }
}

/// A full raise puts every other live seat back on the clock.
fn reopen_betting(hand: &mut Hand, raiser: SeatIndex) {
    for (seat, acted) in hand.acted.iter_mut().enumerate() {
        if seat != raiser {
            *acted = false;
        }
    }
}

/// Can this seat still be asked for an action?
fn is_actionable(seats: &[Option<Player>], hand: &Hand, seat: SeatIndex) -> bool {
    hand.hole_cards.contains_key(&seat)
        && !hand.folded[seat]
        && seats[seat].as_ref().is_some_and(|p| p.stack > 0)
}

/// Next actionable seat clockwise after `from`, if any.
fn next_actionable(seats: &[Option<Player>], hand: &Hand, from: SeatIndex) -> Option<SeatIndex> {
    let n = seats.len();
    (1..=n)
        .map(|offset| (from + offset) % n)
        .find(|&s| is_actionable(seats, hand, s))
}

/// A betting round is over once nobody owes chips and every seat that can
/// still act has done so. All-in seats are skipped; with at most one seat
/// able to act and nothing owed there is no betting left to do.
fn round_complete(seats: &[Option<Player>], hand: &Hand) -> bool {
    let max_bet = hand.current_bets.iter().copied().max().unwrap_or(0);
    let actionable: Vec<SeatIndex> = hand
        .active_seats
        .iter()
        .copied()
        .filter(|&s| is_actionable(seats, hand, s))
        .collect();
    if actionable.iter().any(|&s| hand.current_bets[s] != max_bet) {
        return false;
    }
    if actionable.len() <= 1 {
        return true;
    }
    actionable.iter().all(|&s| hand.acted[s])
}
