/// Property-based tests for hand evaluation using proptest
///
/// These tests verify that the evaluator produces a total order with the
/// right category structure across randomly generated card sets.
use nl_holdem::game::entities::{Card, Suit, Value};
use nl_holdem::game::functional::{argmax, eval, Rank};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;

// Strategy to generate a valid card (values 2-14, ace is 14)
fn card_strategy() -> impl Strategy<Value = Card> {
    (2u8..=14, 0u8..=3).prop_map(|(value, suit_idx)| {
        let suit = match suit_idx {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            _ => Suit::Spade,
        };
        Card(value, suit)
    })
}

// Strategy to generate a vec of unique cards (no duplicates)
fn unique_cards_strategy(count: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), count..=count).prop_filter(
        "Cards must be unique",
        |cards| {
            let set: BTreeSet<_> = cards.iter().collect();
            set.len() == cards.len()
        },
    )
}

fn seven_card_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(7)
}

proptest! {
    #[test]
    fn test_eval_deterministic(cards in seven_card_hand_strategy()) {
        prop_assert_eq!(eval(&cards), eval(&cards));
    }

    #[test]
    fn test_eval_order_independent(cards in seven_card_hand_strategy()) {
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(eval(&cards), eval(&reversed));
    }

    #[test]
    fn test_eval_tiebreak_length_fixed_per_rank(cards in seven_card_hand_strategy()) {
        let score = eval(&cards);
        let expected = match score.rank {
            Rank::StraightFlush | Rank::Straight => 1,
            Rank::FourOfAKind | Rank::FullHouse => 2,
            Rank::ThreeOfAKind | Rank::TwoPair => 3,
            Rank::OnePair => 4,
            Rank::Flush | Rank::HighCard => 5,
        };
        prop_assert_eq!(score.values.len(), expected);
    }

    #[test]
    fn test_compare_antisymmetric(
        a in seven_card_hand_strategy(),
        b in seven_card_hand_strategy(),
    ) {
        let (sa, sb) = (eval(&a), eval(&b));
        match sa.cmp(&sb) {
            Ordering::Less => prop_assert_eq!(sb.cmp(&sa), Ordering::Greater),
            Ordering::Greater => prop_assert_eq!(sb.cmp(&sa), Ordering::Less),
            Ordering::Equal => prop_assert_eq!(sb.cmp(&sa), Ordering::Equal),
        }
    }

    #[test]
    fn test_compare_transitive(
        a in seven_card_hand_strategy(),
        b in seven_card_hand_strategy(),
        c in seven_card_hand_strategy(),
    ) {
        let (sa, sb, sc) = (eval(&a), eval(&b), eval(&c));
        if sa <= sb && sb <= sc {
            prop_assert!(sa <= sc);
        }
    }

    #[test]
    fn test_adding_cards_never_weakens_a_hand(cards in seven_card_hand_strategy()) {
        // The 7-card score must be at least as strong as any 5-card subset,
        // since the evaluator picks the best five.
        let five = eval(&cards[..5]);
        let seven = eval(&cards);
        prop_assert!(seven >= five);
    }

    #[test]
    fn test_argmax_agrees_with_pairwise_comparison(
        a in seven_card_hand_strategy(),
        b in seven_card_hand_strategy(),
    ) {
        let (sa, sb) = (eval(&a), eval(&b));
        let winners = argmax(&[sa.clone(), sb.clone()]);
        match sa.cmp(&sb) {
            Ordering::Greater => prop_assert_eq!(winners, vec![0]),
            Ordering::Less => prop_assert_eq!(winners, vec![1]),
            Ordering::Equal => prop_assert_eq!(winners, vec![0, 1]),
        }
    }

    #[test]
    fn test_pair_in_hand_scores_at_least_one_pair(
        value in 2u8..=14,
        rest in unique_cards_strategy(5),
    ) {
        let mut cards = vec![Card(value, Suit::Club), Card(value, Suit::Heart)];
        for card in rest {
            if card.0 != value || (card.1 != Suit::Club && card.1 != Suit::Heart) {
                cards.push(card);
            }
        }
        prop_assume!(cards.len() >= 5);
        let score = eval(&cards);
        prop_assert!(score.rank >= Rank::OnePair);
    }

    #[test]
    fn test_flush_suited_five_scores_at_least_flush(
        values in proptest::sample::subsequence((2u8..=14).collect::<Vec<Value>>(), 5),
    ) {
        let cards: Vec<Card> = values.iter().map(|&v| Card(v, Suit::Spade)).collect();
        let score = eval(&cards);
        prop_assert!(score.rank >= Rank::Flush);
    }
}

/// Category dominance spot check: one representative hand per category,
/// each strictly stronger than the previous.
#[test]
fn test_category_ladder() {
    use Suit::{Club, Diamond, Heart, Spade};
    let ladder = [
        // high card
        vec![
            Card(14, Spade),
            Card(12, Heart),
            Card(10, Diamond),
            Card(7, Club),
            Card(3, Spade),
        ],
        // one pair
        vec![
            Card(9, Spade),
            Card(9, Heart),
            Card(13, Diamond),
            Card(7, Club),
            Card(4, Spade),
        ],
        // two pair
        vec![
            Card(12, Spade),
            Card(12, Heart),
            Card(5, Diamond),
            Card(5, Club),
            Card(2, Spade),
        ],
        // trips
        vec![
            Card(7, Spade),
            Card(7, Heart),
            Card(7, Diamond),
            Card(12, Club),
            Card(3, Spade),
        ],
        // straight (the wheel, weakest of them)
        vec![
            Card(14, Heart),
            Card(2, Club),
            Card(3, Diamond),
            Card(4, Spade),
            Card(5, Heart),
        ],
        // flush
        vec![
            Card(13, Club),
            Card(11, Club),
            Card(8, Club),
            Card(5, Club),
            Card(3, Club),
        ],
        // full house
        vec![
            Card(10, Spade),
            Card(10, Heart),
            Card(10, Diamond),
            Card(6, Club),
            Card(6, Spade),
        ],
        // quads
        vec![
            Card(8, Spade),
            Card(8, Heart),
            Card(8, Diamond),
            Card(8, Club),
            Card(2, Spade),
        ],
        // straight flush
        vec![
            Card(9, Heart),
            Card(8, Heart),
            Card(7, Heart),
            Card(6, Heart),
            Card(5, Heart),
        ],
    ];

    let scores: Vec<_> = ladder.iter().map(|hand| eval(hand)).collect();
    for pair in scores.windows(2) {
        assert!(pair[0] < pair[1], "{} should lose to {}", pair[0], pair[1]);
    }
}
