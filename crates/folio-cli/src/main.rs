//! folio CLI
//!
//! Command-line interface for folio - local-first portfolio content
//! management.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use folio_core::{ContentStore, StorageError};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio - local-first portfolio content management")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage certificates
    Certificate {
        #[command(subcommand)]
        command: commands::certificates::CertificateCommands,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: commands::projects::ProjectCommands,
    },
    /// Manage blog posts
    Post {
        #[command(subcommand)]
        command: commands::posts::PostCommands,
    },
    /// Manage social links
    Social {
        #[command(subcommand)]
        command: commands::socials::SocialCommands,
    },
    /// Show or edit site content
    Content {
        #[command(subcommand)]
        command: commands::content::ContentCommands,
    },
    /// Manage skill groups
    Skill {
        #[command(subcommand)]
        command: commands::skills::SkillCommands,
    },
    /// Show the change log
    Log {
        /// Maximum records to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Inspect or record site visits
    Visits {
        #[command(subcommand)]
        command: commands::visits::VisitCommands,
    },
    /// Show store status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Follow updates from other folio processes
    Watch,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, agent, pulse_sync)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> ExitCode {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        if let Some(storage) = err.downcast_ref::<StorageError>() {
            if let Some(hint) = storage.recovery_suggestion() {
                eprintln!("Hint: {}", hint);
            }
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, &output)
            }
        };
    }

    let mut store = ContentStore::open()?;

    match cli.command {
        Commands::Certificate { command } => {
            commands::certificates::handle(command, &mut store, &output)
        }
        Commands::Project { command } => commands::projects::handle(command, &mut store, &output),
        Commands::Post { command } => commands::posts::handle(command, &mut store, &output),
        Commands::Social { command } => commands::socials::handle(command, &mut store, &output),
        Commands::Content { command } => commands::content::handle(command, &mut store, &output),
        Commands::Skill { command } => commands::skills::handle(command, &mut store, &output),
        Commands::Log { limit } => commands::log::show(&store, limit, &output),
        Commands::Visits { command } => commands::visits::handle(command, &mut store, &output),
        Commands::Status => commands::status::show(&store, &output),
        Commands::Watch => commands::watch::run(&mut store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
