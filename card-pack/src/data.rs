//! The typed game-state payload this pack stores in
//! `GameSessionState.game_state`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleCardGameData {
    pub hands: HashMap<String, Vec<String>>,
    pub deck: Vec<String>,
    pub discard_pile: Vec<String>,
    pub scores: HashMap<String, i64>,
}

impl SimpleCardGameData {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("SimpleCardGameData always serializes")
    }

    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone())
            .expect("game_state always holds a SimpleCardGameData once InGame")
    }
}
