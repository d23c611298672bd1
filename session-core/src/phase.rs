//! The top-level phase a [`crate::GameSessionState`] moves through.

use serde::{Deserialize, Serialize};

/// `Lobby | InGame | RoundEnd | Finished`. Transitions only happen via the
/// explicit operations in `session-core::rules`/the action pipeline, never
/// by direct field assignment from outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Lobby,
    InGame,
    RoundEnd,
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant() {
        for phase in [
            SessionPhase::Lobby,
            SessionPhase::InGame,
            SessionPhase::RoundEnd,
            SessionPhase::Finished,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            let back: SessionPhase = serde_json::from_str(&json).unwrap();
            assert_eq!(phase, back);
        }
    }

    #[test]
    fn unknown_variant_fails_to_parse() {
        let result: Result<SessionPhase, _> = serde_json::from_str("\"UNKNOWN\"");
        assert!(result.is_err());
    }

    #[test]
    fn default_is_lobby() {
        assert_eq!(SessionPhase::default(), SessionPhase::Lobby);
    }
}
