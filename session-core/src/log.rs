//! The bounded audit log carried on [`crate::GameSessionState`].

use serde::{Deserialize, Serialize};

/// One entry in `GameSessionState.log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLogEntry {
    pub event_type: String,
    pub description: String,
    pub timestamp: i64,
}

/// Appends `entry` to `log`, discarding the oldest entry first if the log
/// is already at the `max_len` cap. Kept as a free function (rather than a
/// wrapper type) since `GameSessionState.log` is serialized as a plain
/// `Vec` on the wire and round-trips through `serde_json` unchanged.
pub fn push_bounded(log: &mut Vec<GameLogEntry>, entry: GameLogEntry, max_len: usize) {
    if log.len() >= max_len {
        log.remove(0);
    }
    log.push(entry);
}
