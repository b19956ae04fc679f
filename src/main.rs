//! Command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    ArgAction,
    Args,
    Parser,
    Subcommand,
};
use contao_xliff::config::{
    Project,
    ToolboxSettings,
};
use contao_xliff::{
    ConvertOptions,
    ConvertSummary,
    Converter,
    SyncError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contao-xliff", version, about = "Sync Contao language files with XLIFF translations")]
struct Cli {
    /// More output; repeat for trace level
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Update XLIFF translations from the Contao base language
    ToXliff(ConvertArgs),
    /// Write translated XLIFF texts back into Contao language files
    FromXliff(ConvertArgs),
}

/// Options shared by both directions; they override `composer.json`.
#[derive(Args, Debug)]
struct ConvertArgs {
    /// Contao language root folder
    #[arg(short, long)]
    contao: Option<PathBuf>,

    /// XLIFF root folder
    #[arg(short = 'x', long)]
    xliff: Option<PathBuf>,

    /// Remote project name
    #[arg(short, long)]
    projectname: Option<String>,

    /// Prefix for remote resource names
    #[arg(long)]
    prefix: Option<String>,

    /// Language that holds the source texts
    #[arg(short, long)]
    base_language: Option<String>,

    /// Languages to process: "all" or a comma separated list
    #[arg(default_value = "all")]
    languages: String,

    /// Delete destination files that the run did not produce
    #[arg(long)]
    cleanup: bool,
}

impl ConvertArgs {
    fn overrides(&self) -> ToolboxSettings {
        ToolboxSettings {
            project: self.projectname.clone(),
            prefix: self.prefix.clone(),
            languages_cto: self.contao.clone(),
            languages_tx: self.xliff.clone(),
            skip_files: Vec::new(),
            base_language: self.base_language.clone(),
        }
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions::default().with_languages(&self.languages).with_cleanup(self.cleanup)
    }
}

/// Installs the fmt subscriber; `RUST_LOG` wins over the flags.
fn init_tracing(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> contao_xliff::Result<ConvertSummary> {
    let workspace_root = std::env::current_dir()
        .map_err(|source| SyncError::Io { path: PathBuf::from("."), source })?;

    let (args, to_xliff) = match &cli.command {
        Command::ToXliff(args) => (args, true),
        Command::FromXliff(args) => (args, false),
    };
    let project = Project::load(&workspace_root, args.overrides())?;
    let options = args.options();
    let converter = Converter::new(&project, &options);

    if to_xliff { converter.to_xliff() } else { converter.from_xliff() }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(summary) => {
            tracing::info!(
                languages = summary.languages.len(),
                written = summary.written.len(),
                removed = summary.removed.len(),
                "Conversion finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
