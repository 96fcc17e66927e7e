mod config;
pub mod database;
pub mod memory;
pub mod snapshot;

pub use config::Config;
pub use database::Database;
pub use memory::MemoryGateway;

use std::path::PathBuf;

use crate::error::StorageError;

/// Persistence gateway: opaque serialized snapshots per logical key.
///
/// No transactional guarantee is assumed across keys; the recovery engine
/// tolerates partial writes (entities saved, last-active stamp not yet
/// updated).
pub trait Gateway {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/chime[-dev]/` based on CHIME_ENV.
///
/// Set CHIME_ENV=dev to use a development data directory.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CHIME_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("chime-dev")
    } else {
        base_dir.join("chime")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
