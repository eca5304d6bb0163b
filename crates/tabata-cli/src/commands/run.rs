use clap::Args;
use tabata_core::{Config, WorkoutStore};

use crate::player::{self, Outcome, PlayerOptions};

#[derive(Args)]
pub struct RunArgs {
    /// Workout id
    pub id: String,
    /// Print timer events as JSON lines instead of the countdown screen
    #[arg(long)]
    pub json: bool,
    /// Quit without asking for confirmation
    #[arg(long)]
    pub yes: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = WorkoutStore::open()?.catalog()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let options = PlayerOptions {
        json: args.json,
        assume_yes: args.yes,
        audio: config.audio,
        wake_lock: config.wake_lock.enabled,
    };
    let outcome = runtime.block_on(player::play(&catalog, &args.id, options));
    // The stdin reader may still be parked on a blocking read.
    runtime.shutdown_background();
    let outcome = outcome?;

    if !args.json {
        match outcome {
            Outcome::Completed => {}
            Outcome::Quit => println!("Workout stopped."),
            Outcome::Abandoned => println!("Input closed on a manual step; workout stopped."),
        }
    }
    Ok(())
}
