//! Per-seat session state.

use serde::{Deserialize, Serialize};

/// Snapshot of one seat. Owned by [`crate::GameSessionState::players`];
/// the authoritative live copy (sink, connection flag) lives in
/// [`crate::SessionManager`] and gets hydrated into here at game start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSessionState {
    pub player_id: String,
    pub nickname: String,
    pub is_connected: bool,
    pub is_ready: bool,
    pub reconnect_token: String,
}
