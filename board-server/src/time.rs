//! The one place that reads the wall clock. The codec itself stays pure,
//! so every call site that builds an `Envelope` fetches the current time
//! here instead.

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_millis() as i64
}
