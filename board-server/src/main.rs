//! `board-server`: the single-room websocket host for one game in
//! progress. Loads config, wires up the reference rules pack and a file
//! persistence backend, spawns the session thread, and serves the one
//! `/ws` route.

mod app_state;
mod codec;
mod config;
mod connection;
mod persistence_file;
mod session_actor;
mod time;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use card_pack::SimpleCardGameRules;
use session_core::{GamePackRules, PersistencePort};

use crate::app_state::AppState;
use crate::config::load_config;
use crate::connection::websocket_handler;
use crate::persistence_file::JsonFilePersistence;
use crate::session_actor::SessionActor;

const INBOUND_BUFFER: usize = 256;

struct Args {
    config_path: String,
    port_override: Option<u16>,
}

fn parse_args() -> Args {
    let mut config_path = "BoardConfig.json".to_string();
    let mut port_override = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(value) = args.next() {
                    config_path = value;
                }
            }
            "--port" => {
                if let Some(value) = args.next() {
                    port_override = value.parse().ok();
                }
            }
            other => {
                tracing::warn!(arg = other, "ignoring unrecognized command-line argument");
            }
        }
    }

    Args { config_path, port_override }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .init();

    let args = parse_args();
    let mut config = match load_config(&args.config_path).await {
        Ok(config) => config,
        Err(message) => {
            tracing::error!(message, "failed to load config");
            panic!("failed to load config: {message}");
        }
    };
    if let Some(port) = args.port_override {
        config.port = port;
    }

    let persistence = Arc::new(JsonFilePersistence::new(
        config.persistence_path.clone().unwrap_or_else(|| "board-data".to_string()),
    ));
    if let Err(message) = persistence.open().await {
        tracing::error!(message, "failed to open persistence store");
        panic!("failed to open persistence store: {message}");
    }

    let mut packs: HashMap<String, Arc<dyn GamePackRules>> = HashMap::new();
    let reference_pack = Arc::new(SimpleCardGameRules::with_config(
        config.pack_id.clone(),
        config.deal_size,
        config.max_rounds,
        config.seed,
    ));
    packs.insert(config.pack_id.clone(), reference_pack);

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);
    let actor = SessionActor::new("board-go-session", packs, config.pack_id.clone(), persistence);
    tokio::spawn(actor.run(inbound_rx));

    let app_state = Arc::new(AppState::new(inbound_tx));
    let app = Router::new()
        .route(protocol::WS_PATH, get(websocket_handler))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .unwrap_or_else(|err| panic!("failed to bind {}:{}: {err}", config.host, config.port));
    let bound_addr = listener.local_addr().expect("bound listener has a local address");
    tracing::info!(%bound_addr, pack_id = %config.pack_id, "board-server listening");

    axum::serve(listener, app).await.unwrap();
}
