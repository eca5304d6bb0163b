//! Whole-profile backup: settings plus every workout.

use serde::{Deserialize, Serialize};

use super::config::ProfileConfig;
use crate::error::{Result, StorageError};
use crate::workout::WorkoutDefinition;

pub const BACKUP_FILE_NAME: &str = "tabata_backup.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub settings: ProfileConfig,
    pub workouts: Vec<WorkoutDefinition>,
}

impl Backup {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a backup document. Both `settings` and a `workouts` array are
    /// required.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
        let well_formed = value.get("settings").is_some_and(|s| s.is_object())
            && value.get("workouts").is_some_and(|w| w.is_array());
        if !well_formed {
            return Err(StorageError::InvalidFormat(
                "expected an object with settings and a workouts array".into(),
            )
            .into());
        }
        serde_json::from_value(value).map_err(|e| StorageError::InvalidFormat(e.to_string()).into())
    }
}
