#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "casebook: maintenance case lookup and part risk classification",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a terminal, text when piped).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (overrides `.casebook/config.toml`).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(next_help_heading = "Lookup")]
    Search(cmd::search::SearchArgs),

    #[command(next_help_heading = "Lookup")]
    History(cmd::history::HistoryArgs),

    #[command(next_help_heading = "Maintenance")]
    Parts(cmd::parts::PartsArgs),

    #[command(next_help_heading = "Maintenance")]
    Schedule(cmd::schedule::ScheduleArgs),

    #[command(next_help_heading = "Maintenance")]
    Inspect(cmd::inspect::InspectArgs),

    #[command(
        next_help_heading = "Project",
        about = "Show active ranking signals",
        long_about = "Show which optional ranking signals are compiled in and enabled by config.",
        after_help = "EXAMPLES:\n    # Check signals\n    cb capabilities\n\n    # Emit machine-readable output\n    cb capabilities --format json"
    )]
    Capabilities,

    #[command(
        next_help_heading = "Project",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    cb completions bash\n\n    # Generate zsh completions\n    cb completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CASEBOOK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "casebook=debug,info"
        } else {
            "casebook=info,warn"
        })
    });

    let format = env::var("CASEBOOK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable in every output mode.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    debug!(?output, root = %project_root.display(), "resolved invocation");

    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Search(args) => {
            let config = cmd::load_config(&project_root, config_path, output)?;
            cmd::search::run_search(args, &config, output, &project_root)
        }
        Commands::History(args) => cmd::history::run_history(args, output, &project_root),
        Commands::Parts(args) => {
            let config = cmd::load_config(&project_root, config_path, output)?;
            cmd::parts::run_parts(args, &config, output)
        }
        Commands::Schedule(args) => {
            let config = cmd::load_config(&project_root, config_path, output)?;
            cmd::schedule::run_schedule(args, &config, output, &project_root)
        }
        Commands::Inspect(args) => cmd::inspect::run_inspect(args, output, &project_root),
        Commands::Capabilities => {
            let config = cmd::load_config(&project_root, config_path, output)?;
            cmd::capabilities::run_capabilities(&config, output)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }
    }
}
