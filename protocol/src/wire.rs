//! Wire-level constants and the closed set of envelope message types.
//!
//! These are shared verbatim between the server and any client implementation,
//! the way the relay's old binary command bytes used to be shared via this crate.

use serde::{Deserialize, Serialize};

/// Service discovery identity for an external mDNS registrar. The core
/// never advertises this itself, it only hands the bound port to whatever
/// process owns discovery.
pub const SERVICE_TYPE: &str = "_boardgo._tcp";
/// Default instance name advertised for the service.
pub const DEFAULT_INSTANCE_NAME: &str = "Board Go";

/// Path of the single duplex websocket endpoint.
pub const WS_PATH: &str = "/ws";

/// Bound on `GameSessionState.log`'s length.
pub const MAX_LOG_ENTRIES: usize = 50;

/// Default capacity of the idempotency cache before the oldest id is evicted.
pub const DEFAULT_IDEMPOTENCY_CAPACITY: usize = 1000;

/// The closed set of wire message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "ACTION")]
    Action,
    #[serde(rename = "STATE_UPDATE")]
    StateUpdate,
    #[serde(rename = "JOIN")]
    Join,
    #[serde(rename = "LEAVE")]
    Leave,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "JOIN_ROOM_ACK")]
    JoinRoomAck,
    #[serde(rename = "LOBBY_STATE")]
    LobbyState,
    #[serde(rename = "SET_READY")]
    SetReady,
    #[serde(rename = "PING")]
    Ping,
    #[serde(rename = "PONG")]
    Pong,
    #[serde(rename = "PLAYER_VIEW")]
    PlayerView,
    #[serde(rename = "BOARD_VIEW")]
    BoardView,
    #[serde(rename = "ACTION_REJECTED")]
    ActionRejected,
    #[serde(rename = "START_GAME")]
    StartGame,
}

impl MessageType {
    /// The exact wire string for this type.
    pub fn as_wire_str(self) -> &'static str {
        match self {
            MessageType::Action => "ACTION",
            MessageType::StateUpdate => "STATE_UPDATE",
            MessageType::Join => "JOIN",
            MessageType::Leave => "LEAVE",
            MessageType::Error => "ERROR",
            MessageType::JoinRoomAck => "JOIN_ROOM_ACK",
            MessageType::LobbyState => "LOBBY_STATE",
            MessageType::SetReady => "SET_READY",
            MessageType::Ping => "PING",
            MessageType::Pong => "PONG",
            MessageType::PlayerView => "PLAYER_VIEW",
            MessageType::BoardView => "BOARD_VIEW",
            MessageType::ActionRejected => "ACTION_REJECTED",
            MessageType::StartGame => "START_GAME",
        }
    }
}

/// Codes the server attaches to `ACTION_REJECTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRejectedCode {
    #[serde(rename = "DUPLICATE_ACTION")]
    DuplicateAction,
    #[serde(rename = "PHASE_MISMATCH")]
    PhaseMismatch,
    #[serde(rename = "NOT_YOUR_TURN")]
    NotYourTurn,
    #[serde(rename = "INVALID_ACTION")]
    InvalidAction,
}

/// Error codes for a failed `JOIN_ROOM_ACK`. `InvalidToken` is never
/// emitted by this server (an unrecognized reconnect token just starts a
/// fresh join) but the variant stays part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinRoomErrorCode {
    #[serde(rename = "ROOM_FULL")]
    RoomFull,
    #[serde(rename = "INVALID_TOKEN")]
    InvalidToken,
    #[serde(rename = "NICKNAME_TAKEN")]
    NicknameTaken,
}
