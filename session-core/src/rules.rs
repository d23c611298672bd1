//! The `GamePackRules` contract: the seam between session plumbing and
//! one game's actual rules.
//!
//! Implementations must be pure: no mutable state, no reading the clock,
//! every method takes and returns [`crate::GameSessionState`] by value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::GameSessionState;

/// One action the active player may submit verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowedAction {
    pub action_type: String,
    pub label: String,
    #[serde(default)]
    pub params: Value,
}

/// Result of `check_game_end`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameEndResult {
    pub ended: bool,
    pub winner_ids: Vec<String>,
}

/// A pure rules pack. No method may suspend or retain state across calls
/// beyond what's passed in and returned via `session`.
pub trait GamePackRules: Send + Sync {
    /// Stable identifier used to select this pack at game start.
    fn pack_id(&self) -> &str;

    /// Transitions `session` to `InGame`: populates `game_state` and a
    /// fresh `TurnState`, bumps `version`.
    fn create_initial_game_state(&self, session: GameSessionState) -> GameSessionState;

    /// Empty unless `session` is `InGame` and `player_id` is the active
    /// player.
    fn get_allowed_actions(&self, session: &GameSessionState, player_id: &str) -> Vec<AllowedAction>;

    /// Applies one action. The caller guarantees `action_type` was present
    /// in `get_allowed_actions` for `player_id`.
    fn apply_action(
        &self,
        session: GameSessionState,
        player_id: &str,
        action_type: &str,
        data: &Value,
    ) -> GameSessionState;

    /// Whether the game has ended, and who (if anyone) won.
    fn check_game_end(&self, session: &GameSessionState) -> GameEndResult;

    /// The public snapshot broadcast to every connection. Must not carry
    /// any datum derivable only from another player's private state.
    fn build_board_view(&self, session: &GameSessionState) -> Value;

    /// `player_id`'s private snapshot: public data plus exactly their own
    /// private data.
    fn build_player_view(&self, session: &GameSessionState, player_id: &str) -> Value;
}
