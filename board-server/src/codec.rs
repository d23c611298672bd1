//! Thin helper around [`protocol::Envelope`] that supplies the timestamp
//! the codec itself deliberately stays blind to.

use serde::Serialize;

use protocol::{Envelope, MessageType};

use crate::time::now_millis;

pub fn encode<P: Serialize>(kind: MessageType, payload: &P) -> String {
    let envelope =
        Envelope::new(kind, payload, now_millis()).expect("payload types always serialize");
    envelope.encode().expect("freshly built envelopes always encode")
}
