//! Session-phase plumbing shared by every game pack: the authoritative
//! snapshot, the seat registry, the idempotency cache, and the seams
//! (`GamePackRules`, `PersistencePort`) a concrete game or storage backend
//! plugs into.

mod idempotency;
mod log;
mod manager;
mod persistence;
mod phase;
mod player;
mod rules;
mod session;
mod turn;

pub use idempotency::IdempotencyCache;
pub use log::{GameLogEntry, push_bounded};
pub use manager::{Outbound, SeatSnapshot, SessionManager};
pub use persistence::{NullPersistence, PersistencePort};
pub use phase::SessionPhase;
pub use player::PlayerSessionState;
pub use rules::{AllowedAction, GameEndResult, GamePackRules};
pub use session::GameSessionState;
pub use turn::{TurnState, TurnStep};
