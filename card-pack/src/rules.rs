//! `SimpleCardGameRules`: the reference `GamePackRules` implementation.
//! Deals a hand to each seat from a shuffled deck, lets the active player
//! play or draw cards and end their turn, and scores a point per card
//! played.

use std::collections::HashMap;

use serde_json::{Value, json};
use session_core::{
    AllowedAction, GameEndResult, GameLogEntry, GamePackRules, GameSessionState, SessionPhase,
    TurnState, TurnStep, push_bounded,
};

use crate::data::SimpleCardGameData;
use crate::deck::shuffled_deck;

/// This pack doesn't append to `session.log` directly (the action pipeline
/// owns that), but caps the discard pile tail shown in the board view the
/// same way the session log is capped.
const DISCARD_TAIL: usize = 5;
const RECENT_LOG: usize = 10;
const DEFAULT_DEAL_SIZE: usize = 5;
const DEFAULT_MAX_ROUNDS: u32 = 3;

pub struct SimpleCardGameRules {
    pack_id: String,
    deal_size: usize,
    max_rounds: u32,
    seed: Option<u64>,
}

impl SimpleCardGameRules {
    pub fn new(seed: Option<u64>) -> Self {
        SimpleCardGameRules {
            pack_id: "simple-card-game".to_string(),
            deal_size: DEFAULT_DEAL_SIZE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed,
        }
    }

    pub fn with_config(pack_id: impl Into<String>, deal_size: usize, max_rounds: u32, seed: Option<u64>) -> Self {
        SimpleCardGameRules {
            pack_id: pack_id.into(),
            deal_size,
            max_rounds,
            seed,
        }
    }
}

impl Default for SimpleCardGameRules {
    fn default() -> Self {
        SimpleCardGameRules::new(None)
    }
}

impl GamePackRules for SimpleCardGameRules {
    fn pack_id(&self) -> &str {
        &self.pack_id
    }

    fn create_initial_game_state(&self, mut session: GameSessionState) -> GameSessionState {
        let mut deck = shuffled_deck(self.seed);
        let mut hands = HashMap::new();
        let mut scores = HashMap::new();
        for player_id in &session.player_order {
            let hand = deck.split_off(deck.len().saturating_sub(self.deal_size));
            hands.insert(player_id.clone(), hand);
            scores.insert(player_id.clone(), 0);
        }

        let data = SimpleCardGameData {
            hands,
            deck,
            discard_pile: Vec::new(),
            scores,
        };

        session.phase = SessionPhase::InGame;
        session.game_state = Some(data.to_value());
        session.turn_state = Some(TurnState {
            round: 1,
            turn_index: 0,
            active_player_id: session.player_order[0].clone(),
            step: TurnStep::Main,
            action_count_this_turn: 0,
        });
        session.bump_version()
    }

    fn get_allowed_actions(&self, session: &GameSessionState, player_id: &str) -> Vec<AllowedAction> {
        if session.phase != SessionPhase::InGame {
            return Vec::new();
        }
        let Some(turn) = &session.turn_state else {
            return Vec::new();
        };
        if turn.active_player_id != player_id {
            return Vec::new();
        }
        let Some(game_state) = &session.game_state else {
            return Vec::new();
        };
        let data = SimpleCardGameData::from_value(game_state);

        let mut actions = Vec::new();
        if let Some(hand) = data.hands.get(player_id) {
            for card_id in hand {
                actions.push(AllowedAction {
                    action_type: "PLAY_CARD".to_string(),
                    label: format!("Play {card_id}"),
                    params: json!({ "cardId": card_id }),
                });
            }
        }
        if !data.deck.is_empty() {
            actions.push(AllowedAction {
                action_type: "DRAW_CARD".to_string(),
                label: "Draw a card".to_string(),
                params: Value::Null,
            });
        }
        actions.push(AllowedAction {
            action_type: "END_TURN".to_string(),
            label: "End turn".to_string(),
            params: Value::Null,
        });
        actions
    }

    fn apply_action(
        &self,
        mut session: GameSessionState,
        player_id: &str,
        action_type: &str,
        data: &Value,
    ) -> GameSessionState {
        let Some(game_state) = session.game_state.clone() else {
            return session;
        };
        let mut state = SimpleCardGameData::from_value(&game_state);

        match action_type {
            "PLAY_CARD" => {
                let Some(card_id) = data.get("cardId").and_then(Value::as_str) else {
                    return session;
                };
                if let Some(hand) = state.hands.get_mut(player_id)
                    && let Some(pos) = hand.iter().position(|c| c == card_id)
                {
                    let card = hand.remove(pos);
                    state.discard_pile.push(card);
                    *state.scores.entry(player_id.to_string()).or_insert(0) += 1;
                }
                if let Some(turn) = session.turn_state.as_mut() {
                    turn.action_count_this_turn += 1;
                }
            }
            "DRAW_CARD" => {
                if !state.deck.is_empty() {
                    let card = state.deck.remove(0);
                    state.hands.entry(player_id.to_string()).or_default().push(card);
                }
                if let Some(turn) = session.turn_state.as_mut() {
                    turn.action_count_this_turn += 1;
                }
            }
            "END_TURN" => {
                if let Some(turn) = session.turn_state.as_mut() {
                    let player_count = session.player_order.len();
                    turn.turn_index = (turn.turn_index + 1) % player_count;
                    if turn.turn_index == 0 {
                        turn.round += 1;
                    }
                    turn.action_count_this_turn = 0;
                    turn.active_player_id = session.player_order[turn.turn_index].clone();
                }
            }
            _ => return session,
        }

        session.game_state = Some(state.to_value());
        session.bump_version()
    }

    fn check_game_end(&self, session: &GameSessionState) -> GameEndResult {
        let Some(game_state) = &session.game_state else {
            return GameEndResult::default();
        };
        let data = SimpleCardGameData::from_value(game_state);
        let round = session.turn_state.as_ref().map(|t| t.round).unwrap_or(0);

        let ended = data.deck.is_empty() || round > self.max_rounds;
        if !ended {
            return GameEndResult::default();
        }

        let max_score = data.scores.values().copied().max().unwrap_or(0);
        let winner_ids = data
            .scores
            .iter()
            .filter(|(_, score)| **score == max_score)
            .map(|(player_id, _)| player_id.clone())
            .collect();
        GameEndResult { ended, winner_ids }
    }

    fn build_board_view(&self, session: &GameSessionState) -> Value {
        let data = session
            .game_state
            .as_ref()
            .map(SimpleCardGameData::from_value);

        let discard_tail = data
            .as_ref()
            .map(|d| {
                let start = d.discard_pile.len().saturating_sub(DISCARD_TAIL);
                d.discard_pile[start..].to_vec()
            })
            .unwrap_or_default();
        let deck_remaining = data.as_ref().map(|d| d.deck.len()).unwrap_or(0);
        let scores = data.map(|d| d.scores).unwrap_or_default();

        let log_start = session.log.len().saturating_sub(RECENT_LOG);
        let recent_log: Vec<&GameLogEntry> = session.log[log_start..].iter().collect();

        json!({
            "phase": session.phase,
            "scores": scores,
            "turnState": session.turn_state,
            "deckRemaining": deck_remaining,
            "discardPile": discard_tail,
            "log": recent_log,
            "version": session.version,
        })
    }

    fn build_player_view(&self, session: &GameSessionState, player_id: &str) -> Value {
        let data = session
            .game_state
            .as_ref()
            .map(SimpleCardGameData::from_value);

        let hand = data
            .as_ref()
            .and_then(|d| d.hands.get(player_id).cloned())
            .unwrap_or_default();
        let scores = data.map(|d| d.scores).unwrap_or_default();
        let allowed_actions = self.get_allowed_actions(session, player_id);

        json!({
            "phase": session.phase,
            "playerId": player_id,
            "hand": hand,
            "scores": scores,
            "turnState": session.turn_state,
            "allowedActions": allowed_actions,
            "version": session.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::PlayerSessionState;

    fn two_player_lobby() -> GameSessionState {
        let mut session = GameSessionState::new_lobby("s1");
        session.player_order = vec!["p1".into(), "p2".into()];
        for id in ["p1", "p2"] {
            session.players.insert(
                id.to_string(),
                PlayerSessionState {
                    player_id: id.to_string(),
                    nickname: id.to_string(),
                    is_connected: true,
                    is_ready: true,
                    reconnect_token: "tok".into(),
                },
            );
        }
        session
    }

    #[test]
    fn initial_deal_gives_five_cards_each_and_shrinks_the_deck() {
        let rules = SimpleCardGameRules::new(Some(1));
        let session = rules.create_initial_game_state(two_player_lobby());
        let data = SimpleCardGameData::from_value(session.game_state.as_ref().unwrap());
        assert_eq!(data.hands["p1"].len(), 5);
        assert_eq!(data.hands["p2"].len(), 5);
        assert_eq!(data.deck.len(), 42);
        assert_eq!(session.turn_state.as_ref().unwrap().active_player_id, "p1");
    }

    #[test]
    fn play_card_moves_card_to_discard_and_scores_a_point() {
        let rules = SimpleCardGameRules::new(Some(1));
        let session = rules.create_initial_game_state(two_player_lobby());
        let data = SimpleCardGameData::from_value(session.game_state.as_ref().unwrap());
        let card_id = data.hands["p1"][0].clone();

        let session = rules.apply_action(session, "p1", "PLAY_CARD", &json!({ "cardId": card_id }));
        let data = SimpleCardGameData::from_value(session.game_state.as_ref().unwrap());
        assert_eq!(data.hands["p1"].len(), 4);
        assert_eq!(data.discard_pile, vec![card_id]);
        assert_eq!(data.scores["p1"], 1);
    }

    #[test]
    fn end_turn_advances_active_player_and_wraps_round() {
        let rules = SimpleCardGameRules::new(Some(1));
        let session = rules.create_initial_game_state(two_player_lobby());

        let session = rules.apply_action(session, "p1", "END_TURN", &Value::Null);
        assert_eq!(session.turn_state.as_ref().unwrap().active_player_id, "p2");
        assert_eq!(session.turn_state.as_ref().unwrap().round, 1);

        let session = rules.apply_action(session, "p2", "END_TURN", &Value::Null);
        assert_eq!(session.turn_state.as_ref().unwrap().active_player_id, "p1");
        assert_eq!(session.turn_state.as_ref().unwrap().round, 2);
    }

    #[test]
    fn draw_card_not_allowed_once_deck_is_empty() {
        let rules = SimpleCardGameRules::new(Some(1));
        let mut session = rules.create_initial_game_state(two_player_lobby());
        let mut data = SimpleCardGameData::from_value(session.game_state.as_ref().unwrap());
        data.deck.clear();
        session.game_state = Some(data.to_value());

        let actions = rules.get_allowed_actions(&session, "p1");
        assert!(!actions.iter().any(|a| a.action_type == "DRAW_CARD"));
    }

    #[test]
    fn board_view_never_carries_a_hands_key() {
        let rules = SimpleCardGameRules::new(Some(1));
        let session = rules.create_initial_game_state(two_player_lobby());
        let board_view = rules.build_board_view(&session);
        assert!(board_view.get("hands").is_none());
    }

    #[test]
    fn player_view_carries_only_that_players_hand() {
        let rules = SimpleCardGameRules::new(Some(1));
        let session = rules.create_initial_game_state(two_player_lobby());
        let view = rules.build_player_view(&session, "p1");
        let data = SimpleCardGameData::from_value(session.game_state.as_ref().unwrap());
        assert_eq!(view["hand"], json!(data.hands["p1"]));
    }

    #[test]
    fn game_ends_when_round_exceeds_the_configured_limit() {
        let rules = SimpleCardGameRules::new(Some(1));
        let mut session = rules.create_initial_game_state(two_player_lobby());
        session.turn_state.as_mut().unwrap().round = 4;
        let result = rules.check_game_end(&session);
        assert!(result.ended);
    }

    #[test]
    fn winners_are_every_player_tied_for_the_max_score() {
        let rules = SimpleCardGameRules::new(Some(1));
        let mut session = rules.create_initial_game_state(two_player_lobby());
        let mut data = SimpleCardGameData::from_value(session.game_state.as_ref().unwrap());
        data.deck.clear();
        data.scores.insert("p1".into(), 3);
        data.scores.insert("p2".into(), 3);
        session.game_state = Some(data.to_value());

        let result = rules.check_game_end(&session);
        assert!(result.ended);
        let mut winners = result.winner_ids;
        winners.sort();
        assert_eq!(winners, vec!["p1".to_string(), "p2".to_string()]);
    }
}
