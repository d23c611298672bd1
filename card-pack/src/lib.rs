//! The reference `GamePackRules` implementation: a shuffled 52-card deck,
//! per-player hands, a shared discard pile, and per-player scores.

mod data;
mod deck;
mod rules;

pub use data::SimpleCardGameData;
pub use deck::{ordered_deck, shuffled_deck};
pub use rules::SimpleCardGameRules;
