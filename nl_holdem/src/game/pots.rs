//! Side-pot construction.
//!
//! Contributions are sliced into layers at each distinct all-in level; a
//! seat contests every layer its contribution reaches, folded seats leave
//! their chips behind but contest nothing.

use log::warn;
use serde::{Deserialize, Serialize};

use super::entities::{Chips, SeatIndex};

/// One layer of the pot and the seats allowed to win it. The main pot is
/// the first element of the builder's output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible: Vec<SeatIndex>,
}

/// Slice per-seat contributions into ordered pots.
///
/// Each iteration takes the smallest remaining contribution `m`, collects
/// `m` chips from every seat still owing, and opens those chips to the
/// contributing seats that have not folded. A layer nobody can win carries
/// its chips into the next layer; a final such layer is forfeited.
#[must_use]
pub fn build_side_pots(contributions: &[Chips], eligible: &[bool]) -> Vec<SidePot> {
    debug_assert_eq!(contributions.len(), eligible.len());

    let mut rem: Vec<Chips> = contributions.to_vec();
    let mut pots: Vec<SidePot> = Vec::new();
    let mut carried: Chips = 0;

    loop {
        let contributing: Vec<SeatIndex> = rem
            .iter()
            .enumerate()
            .filter(|(_, &chips)| chips > 0)
            .map(|(seat, _)| seat)
            .collect();
        if contributing.is_empty() {
            break;
        }

        let layer = contributing
            .iter()
            .map(|&seat| rem[seat])
            .min()
            .unwrap_or(0);
        let mut amount = layer * contributing.len() as Chips;
        for &seat in &contributing {
            rem[seat] -= layer;
        }

        let winners: Vec<SeatIndex> = contributing
            .into_iter()
            .filter(|&seat| eligible[seat])
            .collect();

        amount += carried;
        carried = 0;
        if winners.is_empty() {
            carried = amount;
            continue;
        }
        pots.push(SidePot {
            amount,
            eligible: winners,
        });
    }

    if carried > 0 {
        warn!("{carried} chips with no eligible winner forfeited");
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pot_equal_contributions() {
        let pots = build_side_pots(&[50, 50, 50], &[true, true, true]);
        assert_eq!(
            pots,
            vec![SidePot {
                amount: 150,
                eligible: vec![0, 1, 2],
            }]
        );
    }

    #[test]
    fn test_three_way_all_in_layers() {
        // Stacks A < B < C all-in: pots of 3A, 2(B-A), C-B.
        let pots = build_side_pots(&[100, 200, 500], &[true, true, true]);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible, vec![0, 1, 2]);
        assert_eq!(pots[1].amount, 200);
        assert_eq!(pots[1].eligible, vec![1, 2]);
        assert_eq!(pots[2].amount, 300);
        assert_eq!(pots[2].eligible, vec![2]);
    }

    #[test]
    fn test_folded_chips_stay_but_cannot_win() {
        let pots = build_side_pots(&[60, 60, 60], &[true, false, true]);
        assert_eq!(
            pots,
            vec![SidePot {
                amount: 180,
                eligible: vec![0, 2],
            }]
        );
    }

    #[test]
    fn test_folded_overcall_layer_carries_forward() {
        // Seat 1 folded after contributing past seat 0's all-in; its extra
        // layer has only eligible seat 2 above it.
        let pots = build_side_pots(&[100, 150, 150], &[true, false, true]);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible, vec![0, 2]);
        assert_eq!(pots[1].amount, 100);
        assert_eq!(pots[1].eligible, vec![2]);
    }

    #[test]
    fn test_top_layer_with_no_eligible_seat_is_forfeited() {
        // Seats 1 and 2 folded after outcontributing seat 0's all-in; the
        // layer above 100 has no possible winner and is dropped.
        let pots = build_side_pots(&[100, 150, 150], &[true, false, false]);
        assert_eq!(
            pots,
            vec![SidePot {
                amount: 300,
                eligible: vec![0],
            }]
        );
    }

    #[test]
    fn test_everyone_folded_forfeits() {
        let pots = build_side_pots(&[30, 30], &[false, false]);
        assert!(pots.is_empty());
    }

    #[test]
    fn test_zero_contributions_ignored() {
        let pots = build_side_pots(&[0, 80, 80, 0], &[true, true, true, false]);
        assert_eq!(
            pots,
            vec![SidePot {
                amount: 160,
                eligible: vec![1, 2],
            }]
        );
    }

    #[test]
    fn test_amounts_sum_to_contributions() {
        let contributions = [25, 100, 75, 0, 300, 300];
        let eligible = [true, true, false, false, true, true];
        let pots = build_side_pots(&contributions, &eligible);
        let total: Chips = pots.iter().map(|p| p.amount).sum();
        assert_eq!(total, contributions.iter().sum::<Chips>());
    }
}
