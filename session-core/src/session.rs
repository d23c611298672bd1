//! The authoritative session snapshot and its invariants.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::log::{GameLogEntry, push_bounded};
use crate::phase::SessionPhase;
use crate::player::PlayerSessionState;
use crate::turn::TurnState;

/// `GameSessionState` is a value type: every method that mutates session
/// state takes `self` by value and returns a new instance, the way
/// `serde`-derived snapshot types are cloned-and-replaced rather than
/// mutated in place. Seat records (sink, connection flag) are the one
/// piece of genuinely mutable server-owned state, and live outside this
/// type entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSessionState {
    pub session_id: String,
    pub phase: SessionPhase,
    pub players: HashMap<String, PlayerSessionState>,
    pub player_order: Vec<String>,
    pub turn_state: Option<TurnState>,
    pub game_state: Option<Value>,
    pub log: Vec<GameLogEntry>,
    pub version: u64,
}

impl GameSessionState {
    /// A fresh lobby-phase session with no players yet.
    pub fn new_lobby(session_id: impl Into<String>) -> Self {
        GameSessionState {
            session_id: session_id.into(),
            phase: SessionPhase::Lobby,
            players: HashMap::new(),
            player_order: Vec::new(),
            turn_state: None,
            game_state: None,
            log: Vec::new(),
            version: 0,
        }
    }

    /// Every semantic mutation bumps the version exactly once. Call this as
    /// the very last step of any function that returns a new
    /// `GameSessionState`, after all other field changes have been applied.
    pub fn bump_version(mut self) -> Self {
        self.version += 1;
        self
    }

    /// Appends a log entry, evicting the oldest once `max_len` is reached.
    pub fn with_log_entry(mut self, entry: GameLogEntry, max_len: usize) -> Self {
        push_bounded(&mut self.log, entry, max_len);
        self
    }

    /// During `InGame`, every id in `player_order` must exist in `players`,
    /// and the active player must match `player_order[turn_index]`.
    pub fn check_player_order_consistency(&self) -> bool {
        if self.phase != SessionPhase::InGame {
            return true;
        }
        let Some(turn) = &self.turn_state else {
            return false;
        };
        if self.player_order.iter().any(|id| !self.players.contains_key(id)) {
            return false;
        }
        match self.player_order.get(turn.turn_index) {
            Some(id) => *id == turn.active_player_id,
            None => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
