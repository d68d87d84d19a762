//! Scopelint CLI - scope-aware lint rules for TypeScript

mod commands;

use clap::{Parser, Subcommand};
use scopelint::output::OutputFormat;
use scopelint::RuleName;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "scopelint")]
#[command(version)]
#[command(about = "Scope-aware lint rules for TypeScript", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for redeclarations, shadowing and use before definition
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only run these rules (repeatable)
        #[arg(short, long = "rule")]
        rules: Vec<RuleName>,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print the scope tree and declarations of one file
    Scopes {
        /// File to analyze
        file: PathBuf,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default scopelint.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,

        /// Where to write the config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { paths, config, rules, jobs } => {
            let found = commands::run_check(&paths, config.as_deref(), &rules, jobs, cli.format)?;
            if found {
                std::process::exit(1);
            }
        }

        Commands::Scopes { file, config } => {
            commands::run_scopes(&file, config.as_deref(), cli.format)?;
        }

        Commands::Init { force, config } => {
            commands::run_init(config.as_deref(), force)?;
        }
    }

    Ok(())
}
