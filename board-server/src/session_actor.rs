//! The single session thread: owns `SessionManager` and `GameSessionState`
//! exclusively, and runs every inbound frame through the handlers below
//! in arrival order, one at a time, on one task.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use protocol::{
    ActionPayload, ActionRejectedCode, ActionRejectedPayload, BoardViewPayload, JoinPayload,
    JoinRoomAckPayload, LeavePayload, LobbyStatePayload, MessageType, PlayerViewPayload,
    SetReadyPayload, StartGamePayload, HeartbeatPayload, DEFAULT_IDEMPOTENCY_CAPACITY,
    MAX_LOG_ENTRIES,
};
use session_core::{
    GameLogEntry, GamePackRules, GameSessionState, IdempotencyCache, PersistencePort, SessionManager,
    SessionPhase,
};

use crate::app_state::SessionEvent;
use crate::codec::encode;
use crate::time::now_millis;

/// Generic over the persistence backend rather than boxed as a trait
/// object: `PersistencePort`'s methods are native `async fn`s, which are
/// not `dyn`-safe on stable Rust. `board-server` only ever wires up one
/// concrete backend per process, so a type parameter costs nothing.
pub struct SessionActor<P: PersistencePort> {
    session_id: String,
    manager: SessionManager,
    session: GameSessionState,
    idempotency: IdempotencyCache,
    packs: HashMap<String, Arc<dyn GamePackRules>>,
    default_pack_id: String,
    active_rules: Option<Arc<dyn GamePackRules>>,
    persistence: Arc<P>,
    connection_players: HashMap<u64, String>,
}

impl<P: PersistencePort + 'static> SessionActor<P> {
    pub fn new(
        session_id: impl Into<String>,
        packs: HashMap<String, Arc<dyn GamePackRules>>,
        default_pack_id: impl Into<String>,
        persistence: Arc<P>,
    ) -> Self {
        let session_id = session_id.into();
        SessionActor {
            session: GameSessionState::new_lobby(session_id.clone()),
            session_id,
            manager: SessionManager::new(),
            idempotency: IdempotencyCache::new(DEFAULT_IDEMPOTENCY_CAPACITY),
            packs,
            default_pack_id: default_pack_id.into(),
            active_rules: None,
            persistence,
            connection_players: HashMap::new(),
        }
    }

    pub async fn run(mut self, mut inbound: mpsc::Receiver<SessionEvent>) {
        while let Some(event) = inbound.recv().await {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { connection_id, outbound } => {
                self.manager.register_pending(connection_id, outbound);
            }
            SessionEvent::Frame { connection_id, envelope } => {
                self.dispatch(connection_id, envelope);
            }
            SessionEvent::Disconnected { connection_id } => {
                self.handle_disconnected(connection_id);
            }
        }
    }

    fn dispatch(&mut self, connection_id: u64, envelope: protocol::Envelope) {
        match envelope.kind {
            MessageType::Join => {
                if let Ok(payload) = envelope.payload_as::<JoinPayload>() {
                    self.handle_join(connection_id, payload);
                }
            }
            MessageType::SetReady => {
                if let Ok(payload) = envelope.payload_as::<SetReadyPayload>() {
                    self.handle_set_ready(payload);
                }
            }
            MessageType::Ping => {
                if let Ok(payload) = envelope.payload_as::<HeartbeatPayload>() {
                    self.handle_ping(connection_id, payload);
                }
            }
            MessageType::Leave => {
                if let Ok(payload) = envelope.payload_as::<LeavePayload>() {
                    self.handle_leave(payload);
                }
            }
            MessageType::Action => {
                if let Ok(payload) = envelope.payload_as::<ActionPayload>() {
                    self.handle_action(payload);
                }
            }
            MessageType::StartGame => {
                if let Ok(payload) = envelope.payload_as::<StartGamePayload>() {
                    self.handle_start_game(payload);
                }
            }
            other => {
                tracing::warn!(?other, "ignoring server-originated or unsupported message type from client");
            }
        }
    }

    fn handle_join(&mut self, connection_id: u64, payload: JoinPayload) {
        let resolved_id = payload
            .reconnect_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .and_then(|token| self.manager.find_player_by_reconnect_token(token));

        let resolved_id = match resolved_id {
            Some(existing_id) => {
                if let Some(outbound) = self.manager.take_pending(connection_id) {
                    self.manager.reconnect(&existing_id, outbound);
                }
                existing_id
            }
            None => {
                let nickname = payload.display_name.clone().unwrap_or_else(|| payload.player_id.clone());
                if let Some(outbound) = self.manager.take_pending(connection_id) {
                    self.manager.register(&payload.player_id, &nickname, outbound);
                }
                payload.player_id.clone()
            }
        };

        self.connection_players.insert(connection_id, resolved_id.clone());
        let token = self.manager.get_reconnect_token(&resolved_id);

        let ack = encode(
            MessageType::JoinRoomAck,
            &JoinRoomAckPayload {
                success: true,
                player_id: Some(resolved_id.clone()),
                reconnect_token: Some(token),
                error_code: None,
                error_message: None,
            },
        );
        self.manager.send(&resolved_id, &ack);

        if self.session.phase == SessionPhase::InGame
            && let Some(rules) = &self.active_rules
        {
            let player_view = encode(
                MessageType::PlayerView,
                &PlayerViewPayload { player_view: rules.build_player_view(&self.session, &resolved_id) },
            );
            self.manager.send(&resolved_id, &player_view);
        }

        self.broadcast_lobby_state();
    }

    fn handle_set_ready(&mut self, payload: SetReadyPayload) {
        self.manager.set_ready(&payload.player_id, payload.is_ready);
        self.broadcast_lobby_state();
    }

    fn handle_ping(&mut self, connection_id: u64, payload: HeartbeatPayload) {
        let Some(player_id) = self.connection_players.get(&connection_id) else {
            return;
        };
        let pong = encode(MessageType::Pong, &HeartbeatPayload { timestamp: payload.timestamp });
        self.manager.send(player_id, &pong);
    }

    fn handle_leave(&mut self, payload: LeavePayload) {
        self.manager.unregister(&payload.player_id);
        self.connection_players.retain(|_, player_id| *player_id != payload.player_id);

        let notice = encode(MessageType::Leave, &LeavePayload { player_id: payload.player_id, event: None });
        self.manager.broadcast(&notice, None);
        self.broadcast_lobby_state();
    }

    fn handle_start_game(&mut self, payload: StartGamePayload) {
        if self.session.phase != SessionPhase::Lobby {
            tracing::warn!(pack_id = payload.pack_id, "ignoring START_GAME: session is not in Lobby phase");
            return;
        }
        let connected = self.manager.connected_player_ids();
        if connected.is_empty() {
            tracing::warn!("ignoring START_GAME: no connected seats");
            return;
        }

        let rules = self
            .packs
            .get(&payload.pack_id)
            .or_else(|| self.packs.get(&self.default_pack_id))
            .cloned()
            .expect("default pack is always registered");

        self.session.player_order = connected;
        self.session.players = self
            .session
            .player_order
            .iter()
            .filter_map(|player_id| {
                let snapshot = self.manager.seat_snapshot(player_id)?;
                Some((
                    player_id.clone(),
                    session_core::PlayerSessionState {
                        player_id: player_id.clone(),
                        nickname: snapshot.nickname,
                        is_connected: snapshot.is_connected,
                        is_ready: snapshot.is_ready,
                        reconnect_token: snapshot.reconnect_token,
                    },
                ))
            })
            .collect();

        self.session = rules.create_initial_game_state(self.session.clone());
        self.active_rules = Some(rules);

        self.fan_out_views();
    }

    fn handle_action(&mut self, payload: ActionPayload) {
        let ActionPayload { player_id, action_type, data, client_action_id } = payload;

        if let Some(id) = &client_action_id
            && self.idempotency.seen(id)
        {
            self.reject_action(&player_id, ActionRejectedCode::DuplicateAction, "duplicate action", client_action_id);
            return;
        }

        if self.session.phase != SessionPhase::InGame {
            self.reject_action(&player_id, ActionRejectedCode::PhaseMismatch, "session is not in progress", client_action_id);
            return;
        }

        let is_active_player = self
            .session
            .turn_state
            .as_ref()
            .is_some_and(|turn| turn.active_player_id == player_id);
        if !is_active_player {
            self.reject_action(&player_id, ActionRejectedCode::NotYourTurn, "it is not your turn", client_action_id);
            return;
        }

        let rules = self.active_rules.clone().expect("InGame implies active rules are set");
        let allowed = rules.get_allowed_actions(&self.session, &player_id);
        if !allowed.iter().any(|action| action.action_type == action_type) {
            self.reject_action(&player_id, ActionRejectedCode::InvalidAction, "action not currently allowed", client_action_id);
            return;
        }

        if let Some(id) = &client_action_id
            && !id.is_empty()
        {
            self.idempotency.add(id);
        }

        self.session = rules.apply_action(self.session.clone(), &player_id, &action_type, &data);

        let end_result = rules.check_game_end(&self.session);
        if end_result.ended {
            let mut session = self.session.clone();
            session.phase = SessionPhase::Finished;
            self.session = session
                .with_log_entry(
                    GameLogEntry {
                        event_type: "GAME_END".to_string(),
                        description: format!("winners: {:?}", end_result.winner_ids),
                        timestamp: now_millis(),
                    },
                    MAX_LOG_ENTRIES,
                )
                .bump_version();
        }

        self.fan_out_views();
        self.persist_fire_and_forget();
    }

    fn reject_action(
        &self,
        player_id: &str,
        code: ActionRejectedCode,
        reason: &str,
        client_action_id: Option<String>,
    ) {
        let frame = encode(
            MessageType::ActionRejected,
            &ActionRejectedPayload { reason: reason.to_string(), code, client_action_id },
        );
        self.manager.send(player_id, &frame);
    }

    fn fan_out_views(&self) {
        let Some(rules) = &self.active_rules else { return };

        let board_view = encode(
            MessageType::BoardView,
            &BoardViewPayload { board_view: rules.build_board_view(&self.session) },
        );
        self.manager.broadcast(&board_view, None);

        for player_id in self.session.player_order.clone() {
            if !self.manager.is_connected(&player_id) {
                continue;
            }
            let player_view = encode(
                MessageType::PlayerView,
                &PlayerViewPayload { player_view: rules.build_player_view(&self.session, &player_id) },
            );
            self.manager.send(&player_id, &player_view);
        }
    }

    fn broadcast_lobby_state(&self) {
        let lobby_state: LobbyStatePayload = self.manager.build_lobby_state();
        let frame = encode(MessageType::LobbyState, &lobby_state);
        self.manager.broadcast(&frame, None);
    }

    fn handle_disconnected(&mut self, connection_id: u64) {
        self.manager.drop_pending(connection_id);
        let Some(player_id) = self.connection_players.remove(&connection_id) else {
            return;
        };
        if !self.manager.is_connected(&player_id) {
            return;
        }
        self.manager.mark_disconnected(&player_id);
        if self.session.phase == SessionPhase::InGame {
            self.persist_fire_and_forget();
        }
        self.broadcast_lobby_state();
    }

    fn persist_fire_and_forget(&self) {
        let persistence = self.persistence.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            if let Err(err) = persistence.save(&session).await {
                tracing::warn!(error = %err, "failed to persist session snapshot");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use card_pack::SimpleCardGameRules;
    use protocol::Envelope;
    use serde_json::json;
    use session_core::NullPersistence;
    use tokio::sync::mpsc::Receiver;

    use super::*;

    fn new_actor() -> SessionActor<NullPersistence> {
        let mut packs: HashMap<String, Arc<dyn GamePackRules>> = HashMap::new();
        packs.insert(
            "simple-card-game".to_string(),
            Arc::new(SimpleCardGameRules::new(Some(7))),
        );
        SessionActor::new("test-session", packs, "simple-card-game", Arc::new(NullPersistence))
    }

    fn connect(actor: &mut SessionActor<NullPersistence>, connection_id: u64) -> Receiver<String> {
        let (tx, rx) = mpsc::channel(32);
        actor.handle_event(SessionEvent::Connected { connection_id, outbound: tx });
        rx
    }

    fn frame(kind: MessageType, payload: impl serde::Serialize) -> protocol::Envelope {
        Envelope::new(kind, &payload, 0).unwrap()
    }

    fn join(actor: &mut SessionActor<NullPersistence>, connection_id: u64, player_id: &str, token: Option<&str>) {
        actor.dispatch(
            connection_id,
            frame(
                MessageType::Join,
                JoinPayload {
                    player_id: player_id.to_string(),
                    event: "JOIN".to_string(),
                    display_name: None,
                    reconnect_token: token.map(str::to_string),
                },
            ),
        );
    }

    fn drain_all(rx: &mut Receiver<String>) -> Vec<protocol::Envelope> {
        let mut frames = Vec::new();
        while let Ok(raw) = rx.try_recv() {
            frames.push(Envelope::decode(&raw).unwrap());
        }
        frames
    }

    #[test]
    fn two_ready_players_make_the_lobby_able_to_start() {
        let mut actor = new_actor();
        let mut rx1 = connect(&mut actor, 1);
        join(&mut actor, 1, "p1", None);
        let mut rx2 = connect(&mut actor, 2);
        join(&mut actor, 2, "p2", None);

        actor.dispatch(1, frame(MessageType::SetReady, SetReadyPayload { player_id: "p1".into(), is_ready: true }));
        actor.dispatch(2, frame(MessageType::SetReady, SetReadyPayload { player_id: "p2".into(), is_ready: true }));

        assert!(actor.manager.is_ready_to_start());

        let last_lobby = drain_all(&mut rx2)
            .into_iter()
            .filter(|e| e.kind == MessageType::LobbyState)
            .last()
            .expect("at least one LOBBY_STATE broadcast");
        let payload: LobbyStatePayload = last_lobby.payload_as().unwrap();
        assert!(payload.can_start);
        drain_all(&mut rx1);
    }

    #[test]
    fn reconnect_with_the_minted_token_preserves_the_seat() {
        let mut actor = new_actor();
        let _rx1 = connect(&mut actor, 1);
        join(&mut actor, 1, "p1", None);
        let token = actor.manager.get_reconnect_token("p1");

        actor.handle_event(SessionEvent::Disconnected { connection_id: 1 });
        assert!(!actor.manager.is_connected("p1"));

        let mut rx2 = connect(&mut actor, 2);
        join(&mut actor, 2, "p1", Some(&token));

        assert!(actor.manager.is_connected("p1"));
        let ack = drain_all(&mut rx2)
            .into_iter()
            .find(|e| e.kind == MessageType::JoinRoomAck)
            .expect("JOIN_ROOM_ACK");
        let ack: JoinRoomAckPayload = ack.payload_as().unwrap();
        assert_eq!(ack.player_id.as_deref(), Some("p1"));
        assert_eq!(ack.reconnect_token.as_deref(), Some(token.as_str()));
    }

    struct StartedGame {
        rx1: Receiver<String>,
        rx2: Receiver<String>,
        active_player_id: String,
    }

    impl StartedGame {
        fn connection_and_rx_for(&mut self, player_id: &str) -> (u64, &mut Receiver<String>) {
            if player_id == "p1" { (1, &mut self.rx1) } else { (2, &mut self.rx2) }
        }

        fn other_player(&self) -> &'static str {
            if self.active_player_id == "p1" { "p2" } else { "p1" }
        }
    }

    // `connected_player_ids` walks a `HashMap`, so which seat goes first is
    // not fixed across runs; tests read back `active_player_id` instead of
    // assuming p1 moves first.
    fn start_two_player_game(actor: &mut SessionActor<NullPersistence>) -> StartedGame {
        let rx1 = connect(actor, 1);
        join(actor, 1, "p1", None);
        let rx2 = connect(actor, 2);
        join(actor, 2, "p2", None);
        actor.dispatch(1, frame(MessageType::SetReady, SetReadyPayload { player_id: "p1".into(), is_ready: true }));
        actor.dispatch(2, frame(MessageType::SetReady, SetReadyPayload { player_id: "p2".into(), is_ready: true }));
        actor.dispatch(1, frame(MessageType::StartGame, StartGamePayload { pack_id: "simple-card-game".into() }));
        assert_eq!(actor.session.phase, SessionPhase::InGame);
        let active_player_id = actor.session.turn_state.as_ref().unwrap().active_player_id.clone();
        StartedGame { rx1, rx2, active_player_id }
    }

    #[test]
    fn duplicate_client_action_id_is_rejected() {
        let mut actor = new_actor();
        let mut game = start_two_player_game(&mut actor);
        let active = game.active_player_id.clone();
        let (connection_id, rx) = game.connection_and_rx_for(&active);

        let action = ActionPayload {
            player_id: active,
            action_type: "END_TURN".into(),
            data: json!(null),
            client_action_id: Some("dup-1".into()),
        };
        actor.dispatch(connection_id, frame(MessageType::Action, action.clone()));
        actor.dispatch(connection_id, frame(MessageType::Action, action));

        let rejections: Vec<ActionRejectedPayload> = drain_all(rx)
            .into_iter()
            .filter(|e| e.kind == MessageType::ActionRejected)
            .map(|e| e.payload_as().unwrap())
            .collect();
        assert_eq!(rejections.len(), 1);
        assert!(matches!(rejections[0].code, ActionRejectedCode::DuplicateAction));
    }

    #[test]
    fn acting_out_of_turn_is_rejected() {
        let mut actor = new_actor();
        let mut game = start_two_player_game(&mut actor);
        let waiting_player = game.other_player().to_string();
        let (connection_id, rx) = game.connection_and_rx_for(&waiting_player);

        actor.dispatch(
            connection_id,
            frame(
                MessageType::Action,
                ActionPayload {
                    player_id: waiting_player,
                    action_type: "END_TURN".into(),
                    data: json!(null),
                    client_action_id: None,
                },
            ),
        );

        let rejection = drain_all(rx)
            .into_iter()
            .find(|e| e.kind == MessageType::ActionRejected)
            .map(|e| e.payload_as::<ActionRejectedPayload>().unwrap())
            .expect("ACTION_REJECTED");
        assert!(matches!(rejection.code, ActionRejectedCode::NotYourTurn));
    }

    #[test]
    fn player_views_stay_private_while_board_view_is_shared() {
        let mut actor = new_actor();
        let _channels = start_two_player_game(&mut actor);

        let board_view = actor
            .active_rules
            .as_ref()
            .unwrap()
            .build_board_view(&actor.session);
        assert!(board_view.get("hands").is_none());

        let p1_view = actor.active_rules.as_ref().unwrap().build_player_view(&actor.session, "p1");
        let p2_view = actor.active_rules.as_ref().unwrap().build_player_view(&actor.session, "p2");
        assert_ne!(p1_view["hand"], p2_view["hand"]);
    }

    #[test]
    fn ping_is_echoed_back_as_pong_with_the_same_timestamp() {
        let mut actor = new_actor();
        let mut rx1 = connect(&mut actor, 1);
        join(&mut actor, 1, "p1", None);
        drain_all(&mut rx1);

        actor.dispatch(1, frame(MessageType::Ping, HeartbeatPayload { timestamp: 4242 }));

        let pong = drain_all(&mut rx1)
            .into_iter()
            .find(|e| e.kind == MessageType::Pong)
            .map(|e| e.payload_as::<HeartbeatPayload>().unwrap())
            .expect("PONG");
        assert_eq!(pong.timestamp, 4242);
    }
}
