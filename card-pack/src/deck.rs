//! Card identifiers and deck construction.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const SUITS: [&str; 4] = ["C", "D", "H", "S"];
const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

/// The 52 card identifiers, suit-major then rank-major, unshuffled.
pub fn ordered_deck() -> Vec<String> {
    let mut deck = Vec::with_capacity(SUITS.len() * RANKS.len());
    for suit in SUITS {
        for rank in RANKS {
            deck.push(format!("{rank}{suit}"));
        }
    }
    deck
}

/// A freshly built and shuffled 52-card deck. `seed` gives a
/// reproducible shuffle (`StdRng::seed_from_u64`); `None` shuffles with
/// OS entropy (`rand::thread_rng`).
pub fn shuffled_deck(seed: Option<u64>) -> Vec<String> {
    let mut deck = ordered_deck();
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            deck.shuffle(&mut rng);
        }
        None => {
            let mut rng = rand::thread_rng();
            deck.shuffle(&mut rng);
        }
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_deck_has_52_unique_cards() {
        let deck = ordered_deck();
        assert_eq!(deck.len(), 52);
        let unique: std::collections::HashSet<_> = deck.iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn same_seed_shuffles_identically() {
        let a = shuffled_deck(Some(42));
        let b = shuffled_deck(Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = shuffled_deck(Some(1));
        let b = shuffled_deck(Some(2));
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_preserves_the_52_cards() {
        let ordered = ordered_deck();
        let shuffled = shuffled_deck(Some(7));
        let mut sorted_shuffled = shuffled.clone();
        sorted_shuffled.sort();
        let mut sorted_ordered = ordered.clone();
        sorted_ordered.sort();
        assert_eq!(sorted_shuffled, sorted_ordered);
    }
}
