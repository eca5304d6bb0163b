use std::path::PathBuf;

use clap::Subcommand;
use tabata_core::storage::BACKUP_FILE_NAME;
use tabata_core::{Backup, Config, WorkoutStore};

#[derive(Subcommand)]
pub enum BackupAction {
    /// Write profile settings and every workout to one file
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace profile settings and the whole library from a backup file
    Import {
        file: PathBuf,
    },
}

pub fn run(action: BackupAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BackupAction::Export { out } => {
            let config = Config::load()?;
            let backup = Backup {
                settings: config.profile,
                workouts: WorkoutStore::open()?.list()?,
            };
            let path = out.unwrap_or_else(|| PathBuf::from(BACKUP_FILE_NAME));
            std::fs::write(&path, backup.to_json()?)?;
            println!(
                "Backed up {} workouts to {}",
                backup.workouts.len(),
                path.display()
            );
        }
        BackupAction::Import { file } => {
            let backup = Backup::from_json(&std::fs::read_to_string(&file)?)?;
            let mut config = Config::load()?;
            config.profile = backup.settings;
            config.save()?;
            WorkoutStore::open()?.replace_all(&backup.workouts)?;
            println!("Restored {} workouts", backup.workouts.len());
        }
    }
    Ok(())
}
