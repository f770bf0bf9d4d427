//! Hand Evaluation Example
//!
//! Demonstrates scoring and comparing poker hands with `eval` and `argmax`.

use nl_holdem::game::entities::{
    Card,
    Suit::{Club, Diamond, Heart, Spade},
};
use nl_holdem::game::functional::{argmax, eval};

fn main() {
    // Example 1: score a 7-card hand (2 hole cards + 5 board cards).
    let hand = vec![
        Card(14, Heart),
        Card(13, Heart),
        Card(12, Heart),
        Card(11, Heart),
        Card(10, Heart),
        Card(9, Spade),
        Card(2, Club),
    ];
    let score = eval(&hand);
    println!("royal cards score as: {score}");

    // Example 2: compare two made hands.
    let aces = eval(&[
        Card(14, Spade),
        Card(14, Heart),
        Card(10, Club),
        Card(9, Diamond),
        Card(2, Spade),
    ]);
    let kings = eval(&[
        Card(13, Spade),
        Card(13, Heart),
        Card(10, Club),
        Card(9, Diamond),
        Card(2, Spade),
    ]);
    println!("{aces} vs {kings}:");
    match argmax(&[aces.clone(), kings.clone()]).as_slice() {
        [0] => println!("  the aces win"),
        [1] => println!("  the kings win"),
        _ => println!("  split pot"),
    }

    // Example 3: a three-way showdown with a tie.
    let hands = [
        vec![
            Card(10, Heart),
            Card(10, Diamond),
            Card(5, Club),
            Card(3, Spade),
            Card(2, Heart),
        ],
        vec![
            Card(10, Spade),
            Card(10, Club),
            Card(5, Heart),
            Card(3, Diamond),
            Card(2, Club),
        ],
        vec![
            Card(9, Heart),
            Card(9, Diamond),
            Card(5, Club),
            Card(3, Spade),
            Card(2, Heart),
        ],
    ];
    let scores: Vec<_> = hands.iter().map(|h| eval(h)).collect();
    for (i, score) in scores.iter().enumerate() {
        println!("hand {}: {score}", i + 1);
    }
    let winners: Vec<usize> = argmax(&scores).iter().map(|&i| i + 1).collect();
    println!("winner(s): hands {winners:?}");
}
