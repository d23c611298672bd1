//! Turn bookkeeping within an `InGame` session.

use serde::{Deserialize, Serialize};

/// Where the active player is within their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStep {
    Start,
    Main,
    End,
}

/// `{round >= 1, turnIndex in [0, |playerOrder|), activePlayerId, step,
/// actionCountThisTurn >= 0}`. Always `None` while `phase == Lobby`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub round: u32,
    pub turn_index: usize,
    pub active_player_id: String,
    pub step: TurnStep,
    pub action_count_this_turn: u32,
}
