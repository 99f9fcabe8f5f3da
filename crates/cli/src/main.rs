mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Multi-step form wizard toolchain.
#[derive(Parser)]
#[command(name = "stepflow", version, about = "Multi-step form wizard toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a wizard configuration against the JSON Schema
    Validate {
        /// Path to the wizard configuration JSON file
        config: PathBuf,
    },

    /// Load a wizard configuration and run static analysis on its step graph
    Check {
        /// Path to the wizard configuration JSON file
        config: PathBuf,
    },

    /// Resolve where a submission of one step goes next
    Next {
        /// Path to the wizard configuration JSON file
        config: PathBuf,
        /// Step being submitted (overrides the step in --request)
        #[arg(long)]
        step: Option<String>,
        /// Path to a navigation request JSON file
        #[arg(long)]
        request: Option<PathBuf>,
        /// Path to a session snapshot JSON file
        #[arg(long)]
        session: Option<PathBuf>,
        /// Record the step and clear any branch the answer abandoned
        #[arg(long)]
        complete: bool,
    },

    /// Clear the steps superseded when a journey switches branches
    Invalidate {
        /// Path to the wizard configuration JSON file
        config: PathBuf,
        /// First step of the abandoned branch
        #[arg(long)]
        from: String,
        /// First step of the branch being taken
        #[arg(long)]
        to: String,
        /// Path to a session snapshot JSON file
        #[arg(long)]
        session: Option<PathBuf>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => {
            commands::validate::cmd_validate(&config, cli.output, cli.quiet);
        }
        Commands::Check { config } => {
            commands::check::cmd_check(&config, cli.output, cli.quiet);
        }
        Commands::Next {
            config,
            step,
            request,
            session,
            complete,
        } => {
            commands::next::cmd_next(
                commands::next::NextOptions {
                    config: &config,
                    step: step.as_deref(),
                    request: request.as_deref(),
                    session: session.as_deref(),
                    complete,
                },
                cli.output,
                cli.quiet,
            );
        }
        Commands::Invalidate {
            config,
            from,
            to,
            session,
        } => {
            commands::invalidate::cmd_invalidate(
                &config,
                &from,
                &to,
                session.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
    }
}

/// Diagnostics go to stderr, filtered by `STEPFLOW_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("STEPFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
