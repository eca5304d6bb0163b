use clap::Subcommand;
use tabata_core::error::ConfigError;
use tabata_core::Config;

use super::confirm;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting (e.g. "audio.bell", "profile.theme")
    Get { key: String },
    /// Change one setting; the value must fit the setting's type
    Set { key: String, value: String },
    /// List every setting as key = value
    List,
    /// Print config.toml and where it lives
    Show,
    /// Restore default settings
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            for (key, value) in Config::load()?.entries() {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("# {}", Config::path()?.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset { yes } => {
            if !yes && !confirm("Reset all settings to their defaults?")? {
                println!("Cancelled.");
                return Ok(());
            }
            Config::default().save()?;
            println!("Settings reset to defaults.");
        }
    }
    Ok(())
}
