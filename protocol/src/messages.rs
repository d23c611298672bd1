//! Per-type payload shapes. Every envelope's `payload` field deserializes
//! into exactly one of these depending on the envelope's `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wire::{ActionRejectedCode, JoinRoomErrorCode};

/// `JOIN` (C->S).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub player_id: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_token: Option<String>,
}

/// `LEAVE` (C->S, or S->broadcast).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePayload {
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// `JOIN_ROOM_ACK` (S->C).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomAckPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<JoinRoomErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// `SET_READY` (C->S).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetReadyPayload {
    pub player_id: String,
    pub is_ready: bool,
}

/// One seat entry inside a `LOBBY_STATE` snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayerEntry {
    pub player_id: String,
    pub nickname: String,
    pub is_ready: bool,
    pub is_connected: bool,
}

/// `LOBBY_STATE` (S->broadcast).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyStatePayload {
    pub players: Vec<LobbyPlayerEntry>,
    pub can_start: bool,
}

/// `ACTION` (C->S).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    pub player_id: String,
    pub action_type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_action_id: Option<String>,
}

/// `ACTION_REJECTED` (S->C, sender only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRejectedPayload {
    pub reason: String,
    pub code: ActionRejectedCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_action_id: Option<String>,
}

/// `BOARD_VIEW` (S->broadcast). `board_view` is opaque to the core; the
/// active `GamePackRules` implementation defines its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardViewPayload {
    pub board_view: Value,
}

/// `PLAYER_VIEW` (S->C, individual).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerViewPayload {
    pub player_view: Value,
}

/// `PING` (C->S) / `PONG` (S->C, echoed verbatim).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    pub timestamp: i64,
}

/// `ERROR` (S->C).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub reason: String,
}

/// `STATE_UPDATE` (S->broadcast, legacy lobby-phase fallback only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdatePayload {
    pub state: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
}

/// `START_GAME`: begins the game with the currently connected seats.
/// Not normally sent by a player-facing client, but kept as a typed
/// payload since the envelope format is uniform across every `MessageType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGamePayload {
    pub pack_id: String,
}
