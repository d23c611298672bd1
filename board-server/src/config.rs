//! `BoardConfig.json` loading: a `tokio::fs::read_to_string` +
//! `serde_json::from_str` round-trip, read once at startup.

use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default = "default_pack_id")]
    pub pack_id: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub persistence_path: Option<String>,
    #[serde(default = "default_deal_size")]
    pub deal_size: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_pack_id() -> String {
    "simple-card-game".to_string()
}

fn default_deal_size() -> usize {
    5
}

fn default_max_rounds() -> u32 {
    3
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            host: default_host(),
            port: 0,
            pack_id: default_pack_id(),
            seed: None,
            persistence_path: None,
            deal_size: default_deal_size(),
            max_rounds: default_max_rounds(),
        }
    }
}

/// Loads `path`, falling back to a default config if the file does not
/// exist — a missing config at startup isn't fatal, it just means
/// defaults.
pub async fn load_config(path: &str) -> Result<BoardConfig, String> {
    let json_content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path, "config file not found, using defaults");
            return Ok(BoardConfig::default());
        }
        Err(err) => return Err(format!("Failed to read file: {err}")),
    };
    serde_json::from_str(&json_content).map_err(|e| format!("Failed to parse JSON: {e}"))
}
