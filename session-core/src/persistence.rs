//! The persistence port: a minimal key/value contract keyed on `sessionId`.
//! Save errors are swallowed by the caller, never propagated into the
//! action pipeline — persistence is a best-effort audit channel, not a
//! consistency barrier.

use std::future::Future;

use crate::session::GameSessionState;

/// A key/value store for `GameSessionState` snapshots. Optional: when no
/// implementation is wired up, the caller simply skips saves.
///
/// Methods return `impl Future<..> + Send` rather than being declared
/// `async fn` directly: plain `async fn` in a trait doesn't let callers
/// require the returned future be `Send`, which `tokio::spawn`ing a save
/// (see `board-server::SessionActor::persist_fire_and_forget`) needs.
/// Implementations still just write ordinary `async fn`s below.
pub trait PersistencePort: Send + Sync {
    /// Opens the store. Called once at server startup.
    fn open(&self) -> impl Future<Output = Result<(), String>> + Send;

    /// Closes the store. Called once at server shutdown.
    fn close(&self) -> impl Future<Output = Result<(), String>> + Send;

    /// Upserts `session`, replacing any prior snapshot for its `session_id`.
    fn save(&self, session: &GameSessionState) -> impl Future<Output = Result<(), String>> + Send;

    /// Loads the snapshot for `session_id`, if one exists.
    fn load(&self, session_id: &str) -> impl Future<Output = Result<Option<GameSessionState>, String>> + Send;

    /// Removes the snapshot for `session_id`, if one exists.
    fn delete(&self, session_id: &str) -> impl Future<Output = Result<(), String>> + Send;
}

/// A port that does nothing. Used when persistence is not configured;
/// `save` never errors so callers never have anything to swallow.
pub struct NullPersistence;

impl PersistencePort for NullPersistence {
    async fn open(&self) -> Result<(), String> {
        Ok(())
    }

    async fn close(&self) -> Result<(), String> {
        Ok(())
    }

    async fn save(&self, _session: &GameSessionState) -> Result<(), String> {
        Ok(())
    }

    async fn load(&self, _session_id: &str) -> Result<Option<GameSessionState>, String> {
        Ok(None)
    }

    async fn delete(&self, _session_id: &str) -> Result<(), String> {
        Ok(())
    }
}
