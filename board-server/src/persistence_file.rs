//! `JsonFilePersistence`: one JSON file per `sessionId` under a configured
//! directory, read and written with `tokio::fs` + `serde_json`.

use session_core::{GameSessionState, PersistencePort};
use tokio::fs;

pub struct JsonFilePersistence {
    data_dir: String,
}

impl JsonFilePersistence {
    pub fn new(data_dir: impl Into<String>) -> Self {
        JsonFilePersistence {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, session_id: &str) -> String {
        format!("{}/{}.json", self.data_dir, session_id)
    }
}

impl PersistencePort for JsonFilePersistence {
    async fn open(&self) -> Result<(), String> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| format!("Failed to create data directory: {e}"))
    }

    async fn close(&self) -> Result<(), String> {
        Ok(())
    }

    async fn save(&self, session: &GameSessionState) -> Result<(), String> {
        let json = session
            .to_json()
            .map_err(|e| format!("Failed to serialize session: {e}"))?;
        let content = serde_json::to_string_pretty(&json)
            .map_err(|e| format!("Failed to serialize session: {e}"))?;
        fs::write(self.path_for(&session.session_id), content)
            .await
            .map_err(|e| format!("Failed to write file: {e}"))
    }

    async fn load(&self, session_id: &str) -> Result<Option<GameSessionState>, String> {
        let content = match fs::read_to_string(self.path_for(session_id)).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("Failed to read file: {err}")),
        };
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| format!("Failed to parse JSON: {e}"))?;
        GameSessionState::from_json(value)
            .map(Some)
            .map_err(|e| format!("Failed to deserialize session: {e}"))
    }

    async fn delete(&self, session_id: &str) -> Result<(), String> {
        match fs::remove_file(self.path_for(session_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("Failed to delete file: {err}")),
        }
    }
}
