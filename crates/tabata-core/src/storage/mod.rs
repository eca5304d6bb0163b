mod backup;
mod config;
pub mod database;

pub use backup::{Backup, BACKUP_FILE_NAME};
pub use config::{AudioConfig, Config, LibraryConfig, ProfileConfig, Theme, View, WakeLockConfig};
pub use database::{export_file_name, WorkoutStore};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `TABATA_DATA_DIR` wins when set. Otherwise `~/.config/tabata[-dev]/`,
/// with `TABATA_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TABATA_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::DataDir("home directory not found".into()))?
                .join(".config");
            let env = std::env::var("TABATA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tabata-dev")
            } else {
                base_dir.join("tabata")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
