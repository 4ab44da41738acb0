use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "funnel")]
#[command(version, about = "Filter, sort, paginate and export funnel analytics records")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding .funnel/funnel.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter predicates shared by every record command.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive phone number substring
    #[arg(long)]
    pub search: Option<String>,

    /// Timestamp column for the date range (e.g. userClickedLink)
    #[arg(long)]
    pub date_column: Option<String>,

    /// Start of the date range, inclusive
    #[arg(long)]
    pub from: Option<String>,

    /// End of the date range, inclusive
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub activity_type: Option<String>,

    /// Compared against the joined message list; CSV-quoted input is accepted
    #[arg(long)]
    pub acceptable_messages: Option<String>,

    #[arg(long)]
    pub persona: Option<String>,

    #[arg(long)]
    pub source: Option<String>,
}

/// Sort options shared by `view` and `export`.
#[derive(Args, Clone, Debug, Default)]
pub struct SortArgs {
    /// Field to sort by; funnel-stage order when omitted
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one page of the filtered, sorted records
    View {
        /// Records file (JSON array)
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Emit the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Export every matching record as CSV
    Export {
        /// Records file (JSON array)
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// Output path, or "-" for stdout (defaults to export.file_name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Count matching records per funnel stage
    Stages {
        /// Records file (JSON array)
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default funnel.toml file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let output = match &cli.command {
        Commands::Export { output, .. } => output.clone(),
        _ => None,
    };
    let config = funnel::config::FunnelConfig::with_cli_args(project_dir, cli.verbose, output)?;
    funnel::logging::init(&config.log_filter());

    match &cli.command {
        Commands::View {
            input,
            filters,
            sort,
            page,
            json,
        } => cmd::cmd_view(&config, input, filters, sort, *page, *json)?,
        Commands::Export {
            input,
            filters,
            sort,
            ..
        } => cmd::cmd_export(&config, input, filters, sort)?,
        Commands::Stages { input, filters } => cmd::cmd_stages(input, filters)?,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
