use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod player;

#[derive(Parser)]
#[command(name = "tabata", version, about = "Interval workout timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a workout
    Run(commands::run::RunArgs),
    /// List workouts
    List {
        /// Only show workouts whose title or description contains this text
        #[arg(long, default_value = "")]
        search: String,
        /// name-asc, name-desc, date-new, date-old or color
        #[arg(long)]
        sort: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a workout preview
    Show {
        id: String,
    },
    /// Create a workout from a JSON definition file
    New {
        file: std::path::PathBuf,
    },
    /// Replace a workout with the definition in a JSON file
    Edit {
        id: String,
        file: std::path::PathBuf,
    },
    /// Import a workout from a JSON file
    Import {
        file: std::path::PathBuf,
    },
    /// Export a workout to a JSON file
    Export {
        id: String,
        /// Output path; "-" prints to stdout
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Delete a workout
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Copy a workout under a new title
    Duplicate {
        id: String,
    },
    /// Toggle a workout's favorite flag
    Favorite {
        id: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Back up or restore profile settings and all workouts
    Backup {
        #[command(subcommand)]
        action: commands::backup::BackupAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TABATA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::List { search, sort, json } => commands::workout::list(&search, sort.as_deref(), json),
        Commands::Show { id } => commands::workout::show(&id),
        Commands::New { file } => commands::workout::create(&file),
        Commands::Edit { id, file } => commands::workout::edit(&id, &file),
        Commands::Import { file } => commands::workout::import(&file),
        Commands::Export { id, out } => commands::workout::export(&id, out.as_deref()),
        Commands::Delete { id, yes } => commands::workout::delete(&id, yes),
        Commands::Duplicate { id } => commands::workout::duplicate(&id),
        Commands::Favorite { id } => commands::workout::favorite(&id),
        Commands::Config { action } => commands::config::run(action),
        Commands::Backup { action } => commands::backup::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
