//! Plants - watering tracker
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plants::cli::{
    PlacesCommand, PlacesOptions, PlantAction, PlantCommand, PlantOptions, StatsCommand,
    StatsOptions, WaterAction, WaterCommand, WaterOptions,
};
use plants::config::{crash_log_path, Config};
use plants::core::{PlaceId, PlantId};
use plants::error::exit_codes;
use plants::storage::FileGardenStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Plants - track when your plants were last watered
#[derive(Parser)]
#[command(name = "plants")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,
    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every place with its plants, driest first
    Places {
        /// Include hidden plants
        #[arg(long)]
        show_hidden: bool,
        /// Only show this place
        #[arg(long)]
        place: Option<PlaceId>,
    },

    /// Manage places
    Place {
        #[command(subcommand)]
        action: PlaceCommand,
    },

    /// Manage plants
    Plant {
        #[command(subcommand)]
        action: PlantSubcommand,
    },

    /// Record a watering for today, or `--offset` days from today
    Water {
        /// Plant ID
        plant: PlantId,
        /// Days relative to today (-1 for yesterday)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },

    /// Add, remove, or list watering dates
    Date {
        #[command(subcommand)]
        action: DateCommand,
    },

    /// Show watering statistics for a plant
    Stats {
        /// Plant ID
        plant: PlantId,
        /// Include histogram and timeline
        #[arg(long, short)]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum PlaceCommand {
    /// Create a place
    Add {
        /// Place name
        name: String,
    },
}

#[derive(Subcommand)]
enum PlantSubcommand {
    /// Create a plant in a place
    Add {
        /// Place ID
        place: PlaceId,
        /// Plant name (defaults to the configured default name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename a plant
    Rename {
        /// Plant ID
        id: PlantId,
        /// New name
        name: String,
    },
    /// Hide a plant from the overview
    Hide {
        /// Plant ID
        id: PlantId,
    },
    /// Show a hidden plant in the overview again
    Unhide {
        /// Plant ID
        id: PlantId,
    },
    /// Delete a plant and all of its waterings
    Delete {
        /// Plant ID
        id: PlantId,
    },
    /// Show a plant with its watering dates
    Show {
        /// Plant ID
        id: PlantId,
    },
}

impl From<PlantSubcommand> for PlantAction {
    fn from(cmd: PlantSubcommand) -> Self {
        match cmd {
            PlantSubcommand::Add { place, name } => PlantAction::Add { place, name },
            PlantSubcommand::Rename { id, name } => PlantAction::Rename { id, name },
            PlantSubcommand::Hide { id } => PlantAction::SetHidden { id, hidden: true },
            PlantSubcommand::Unhide { id } => PlantAction::SetHidden { id, hidden: false },
            PlantSubcommand::Delete { id } => PlantAction::Delete { id },
            PlantSubcommand::Show { id } => PlantAction::Show { id },
        }
    }
}

#[derive(Subcommand)]
enum DateCommand {
    /// Record a watering on a date
    Add {
        /// Plant ID
        plant: PlantId,
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// Remove one watering on a date
    Remove {
        /// Plant ID
        plant: PlantId,
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// List watering dates
    List {
        /// Plant ID
        plant: PlantId,
    },
}

impl From<DateCommand> for WaterAction {
    fn from(cmd: DateCommand) -> Self {
        match cmd {
            DateCommand::Add { plant, date } => WaterAction::Add { plant, date },
            DateCommand::Remove { plant, date } => WaterAction::Remove { plant, date },
            DateCommand::List { plant } => WaterAction::List { plant },
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    setup_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("plants error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG`.
fn setup_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "plants=warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Set up the global panic handler.
///
/// On panic, logs to `<plants_home>/crash.log` and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("plants panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();
    let store = FileGardenStore::from_config(&config)?;
    let (json, quiet) = (cli.json, cli.quiet);

    match cli.command {
        Commands::Places { show_hidden, place } => {
            let options = PlacesOptions {
                json,
                quiet,
                show_hidden,
                place,
            };
            let cmd = PlacesCommand::new(store, config);
            let output = cmd.run(&options);
            emit(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Place {
            action: PlaceCommand::Add { name },
        } => {
            let options = PlacesOptions {
                json,
                quiet,
                ..Default::default()
            };
            let cmd = PlacesCommand::new(store, config);
            let output = cmd.add(&name);
            emit(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Plant { action } => {
            let options = PlantOptions { json, quiet };
            let cmd = PlantCommand::new(store, config);
            let output = cmd.run(&action.into());
            emit(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Water { plant, offset } => {
            run_water(store, &config, WaterAction::Now { plant, offset }, json, quiet)
        }
        Commands::Date { action } => run_water(store, &config, action.into(), json, quiet),
        Commands::Stats { plant, detailed } => {
            let options = StatsOptions {
                json,
                quiet,
                detailed,
            };
            let cmd = StatsCommand::new(store, &config);
            let output = cmd.run(plant);
            emit(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
    }
}

fn run_water(
    store: FileGardenStore,
    config: &Config,
    action: WaterAction,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let options = WaterOptions { json, quiet };
    let cmd = WaterCommand::new(store, config);
    let output = cmd.run(&action);
    emit(cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn emit(formatted: String) {
    if !formatted.is_empty() {
        println!("{}", formatted.trim_end_matches('\n'));
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}
