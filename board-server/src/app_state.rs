//! Shared axum state: just the mailbox into the single session thread
//! plus a connection-id counter used for orphan cleanup. Game state has
//! exactly one writer, so there's no shared lock here, only a channel
//! handle into the task that owns it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use protocol::Envelope;
use session_core::Outbound;

pub enum SessionEvent {
    Connected { connection_id: u64, outbound: Outbound },
    Frame { connection_id: u64, envelope: Envelope },
    Disconnected { connection_id: u64 },
}

pub struct AppState {
    pub inbound_tx: mpsc::Sender<SessionEvent>,
    next_connection_id: AtomicU64,
}

impl AppState {
    pub fn new(inbound_tx: mpsc::Sender<SessionEvent>) -> Self {
        AppState {
            inbound_tx,
            next_connection_id: AtomicU64::new(1),
        }
    }

    pub fn next_connection_id(&self) -> u64 {
        self.next_connection_id.fetch_add(1, Ordering::Relaxed)
    }
}

pub type SharedAppState = Arc<AppState>;
