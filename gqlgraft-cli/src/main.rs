mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{OutputFormat, Side};
use std::path::PathBuf;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default generator configuration
    Init {
        #[clap(short, long)]
        config: PathBuf,
    },
    /// Print where each active template would be written
    Plan {
        #[clap(short, long)]
        config: PathBuf,
        #[clap(short, long, value_enum, default_value = "all")]
        side: Side,
        #[clap(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// YAML descriptor list used instead of the built-in set
        #[clap(short, long)]
        descriptors: Option<PathBuf>,
    },
    /// Copy the active templates into the project tree
    Write {
        #[clap(short, long)]
        config: PathBuf,
        #[clap(short, long)]
        templates: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
        #[clap(short, long, value_enum, default_value = "all")]
        side: Side,
        #[clap(short, long)]
        descriptors: Option<PathBuf>,
    },
    /// Wire GraphQL into the generated server sources
    Patch {
        #[clap(short, long)]
        config: PathBuf,
        #[clap(short, long)]
        project: PathBuf,
        /// Check every edit on its own instead of gating on added imports
        #[clap(long)]
        per_edit: bool,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Init { config } => {
            info!("Initializing configuration: {}", config.display());
            commands::init(&config)?;
        }
        Commands::Plan {
            config,
            side,
            format,
            descriptors,
        } => {
            let output = commands::plan(&config, side, format, descriptors.as_deref())?;
            println!("{}", output);
        }
        Commands::Write {
            config,
            templates,
            output,
            side,
            descriptors,
        } => {
            info!("Writing templates from {} to {}", templates.display(), output.display());
            let written = commands::write(&config, &templates, &output, side, descriptors.as_deref())?;
            info!("Wrote {} files", written);
        }
        Commands::Patch {
            config,
            project,
            per_edit,
        } => {
            info!("Patching project: {}", project.display());
            commands::patch(&config, &project, per_edit)?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
