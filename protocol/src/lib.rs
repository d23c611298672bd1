//! The wire protocol shared between the board server and its clients:
//! the envelope format, the closed set of message types, and the
//! per-type payload shapes.

mod envelope;
mod messages;
mod wire;

pub use envelope::{CodecError, Envelope};
pub use messages::*;
pub use wire::{
    ActionRejectedCode, DEFAULT_IDEMPOTENCY_CAPACITY, DEFAULT_INSTANCE_NAME, JoinRoomErrorCode,
    MAX_LOG_ENTRIES, MessageType, SERVICE_TYPE, WS_PATH,
};
