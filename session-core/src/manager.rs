//! The seat registry: playerId <-> (nickname, sink, ready, token,
//! connected). Owned exclusively by the session thread; external callers
//! reach it only through `GameServer` operations.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use protocol::{LobbyPlayerEntry, LobbyStatePayload};

/// Outbound channel to one connection. Frames are pre-encoded JSON
/// strings; sends are non-blocking so a slow consumer is dropped rather
/// than stalling the session thread.
pub type Outbound = mpsc::Sender<String>;

struct SeatRecord {
    nickname: String,
    is_connected: bool,
    is_ready: bool,
    sink: Option<Outbound>,
}

/// Snapshot of one seat for hydrating `GameSessionState.players` at game
/// start.
pub struct SeatSnapshot {
    pub nickname: String,
    pub is_connected: bool,
    pub is_ready: bool,
    pub reconnect_token: String,
}

#[derive(Default)]
pub struct SessionManager {
    seats: HashMap<String, SeatRecord>,
    /// playerId -> token. Preserved across `unregister` so a player who
    /// leaves can still reconnect with the same token later.
    player_tokens: HashMap<String, String>,
    token_to_player: HashMap<String, String>,
    /// Outbound channels for connections that haven't sent `JOIN` yet, so
    /// the session thread can attach them to a seat once the playerId is
    /// known. Keyed by the transport layer's own connection id, which is
    /// foreign to this registry otherwise.
    pending: HashMap<u64, Outbound>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing seat for `player_id`. Closing the prior sink
    /// reference is the caller's problem. Does not mint a reconnect token;
    /// `get_reconnect_token` handles that lazily.
    pub fn register(&mut self, player_id: &str, nickname: &str, sink: Outbound) {
        self.seats.insert(
            player_id.to_string(),
            SeatRecord {
                nickname: nickname.to_string(),
                is_connected: true,
                is_ready: false,
                sink: Some(sink),
            },
        );
    }

    /// Drops the seat and its ready flag. Token mapping is preserved (see
    /// `player_tokens` doc comment above).
    pub fn unregister(&mut self, player_id: &str) {
        self.seats.remove(player_id);
    }

    /// No-op if unknown.
    pub fn mark_disconnected(&mut self, player_id: &str) {
        if let Some(seat) = self.seats.get_mut(player_id) {
            seat.is_connected = false;
            seat.sink = None;
        }
    }

    /// No-op if unknown (there is no seat to reconnect into — a seat is
    /// only created by `register`).
    pub fn reconnect(&mut self, player_id: &str, new_sink: Outbound) {
        if let Some(seat) = self.seats.get_mut(player_id) {
            seat.is_connected = true;
            seat.sink = Some(new_sink);
        }
    }

    /// Delivers `frame` to `player_id` if connected. Non-blocking: a full
    /// or closed channel is logged and dropped, never awaited.
    pub fn send(&self, player_id: &str, frame: &str) {
        let Some(seat) = self.seats.get(player_id) else {
            return;
        };
        if !seat.is_connected {
            return;
        }
        if let Some(sink) = &seat.sink
            && let Err(err) = sink.try_send(frame.to_string())
        {
            warn!(player_id, ?err, "dropped outbound frame for slow or closed consumer");
        }
    }

    /// Delivers `frame` to every connected seat except `exclude_player_id`.
    pub fn broadcast(&self, frame: &str, exclude_player_id: Option<&str>) {
        for (player_id, seat) in &self.seats {
            if Some(player_id.as_str()) == exclude_player_id || !seat.is_connected {
                continue;
            }
            if let Some(sink) = &seat.sink
                && let Err(err) = sink.try_send(frame.to_string())
            {
                warn!(player_id, ?err, "dropped broadcast frame for slow or closed consumer");
            }
        }
    }

    pub fn set_ready(&mut self, player_id: &str, is_ready: bool) {
        if let Some(seat) = self.seats.get_mut(player_id) {
            seat.is_ready = is_ready;
        }
    }

    pub fn is_ready(&self, player_id: &str) -> bool {
        self.seats.get(player_id).is_some_and(|seat| seat.is_ready)
    }

    /// Returns the existing token for `player_id` or mints a fresh
    /// high-entropy one (UUID v4) on first call.
    pub fn get_reconnect_token(&mut self, player_id: &str) -> String {
        if let Some(token) = self.player_tokens.get(player_id) {
            return token.clone();
        }
        let token = Uuid::new_v4().to_string();
        self.player_tokens.insert(player_id.to_string(), token.clone());
        self.token_to_player.insert(token.clone(), player_id.to_string());
        token
    }

    pub fn find_player_by_reconnect_token(&self, token: &str) -> Option<String> {
        self.token_to_player.get(token).cloned()
    }

    /// True iff at least one connected seat exists and every connected
    /// seat is ready.
    pub fn is_ready_to_start(&self) -> bool {
        let mut any_connected = false;
        for seat in self.seats.values() {
            if seat.is_connected {
                any_connected = true;
                if !seat.is_ready {
                    return false;
                }
            }
        }
        any_connected
    }

    pub fn build_lobby_state(&self) -> LobbyStatePayload {
        let players = self
            .seats
            .iter()
            .map(|(player_id, seat)| LobbyPlayerEntry {
                player_id: player_id.clone(),
                nickname: seat.nickname.clone(),
                is_ready: seat.is_ready,
                is_connected: seat.is_connected,
            })
            .collect();
        LobbyStatePayload {
            players,
            can_start: self.is_ready_to_start(),
        }
    }

    /// The connected seat ids, in registry iteration order — used to fix
    /// `playerOrder` at game start.
    pub fn connected_player_ids(&self) -> Vec<String> {
        self.seats
            .iter()
            .filter(|(_, seat)| seat.is_connected)
            .map(|(player_id, _)| player_id.clone())
            .collect()
    }

    pub fn seat_snapshot(&mut self, player_id: &str) -> Option<SeatSnapshot> {
        let token = self.get_reconnect_token(player_id);
        let seat = self.seats.get(player_id)?;
        Some(SeatSnapshot {
            nickname: seat.nickname.clone(),
            is_connected: seat.is_connected,
            is_ready: seat.is_ready,
            reconnect_token: token,
        })
    }

    pub fn is_connected(&self, player_id: &str) -> bool {
        self.seats.get(player_id).is_some_and(|seat| seat.is_connected)
    }

    /// Stashes `outbound` until the connection's `JOIN` frame resolves it
    /// to a playerId.
    pub fn register_pending(&mut self, connection_id: u64, outbound: Outbound) {
        self.pending.insert(connection_id, outbound);
    }

    /// Claims the pending outbound channel for `connection_id`, if any.
    pub fn take_pending(&mut self, connection_id: u64) -> Option<Outbound> {
        self.pending.remove(&connection_id)
    }

    /// Drops a pending outbound channel that never sent `JOIN` before
    /// disconnecting.
    pub fn drop_pending(&mut self, connection_id: u64) {
        self.pending.remove(&connection_id);
    }
}
