use clap::{Parser, Subcommand};
use flowpress_cli::commands;
use flowpress_cli::config::CliConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compiles workflow graphs into importable workflow documents.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory of cached node-type schemas (overrides FLOWPRESS__SCHEMA_DIR).
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a workflow graph JSON file.
    Build {
        /// Workflow graph to compile.
        input: PathBuf,

        /// Where to write the document (default: <input>.workflow.json).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a workflow graph JSON file without compiling it.
    Validate {
        /// Workflow graph to check.
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.schema_dir {
        config.schema_dir = dir;
    }

    match cli.command {
        Command::Build { input, output } => {
            match commands::build(&input, output.as_deref(), &config).await {
                Ok(summary) => {
                    println!("Built workflow '{}'", summary.workflow);
                    println!("  nodes:       {}", summary.nodes);
                    println!("  connections: {}", summary.connections);
                    println!("  output:      {}", summary.output.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Validate { input } => match commands::validate(&input).await {
            Ok(result) => {
                for issue in &result.errors {
                    println!("error   {issue}");
                }
                for issue in &result.warnings {
                    println!("warning {issue}");
                }
                if result.valid {
                    println!(
                        "{} is valid ({} warning(s))",
                        input.display(),
                        result.warnings.len()
                    );
                    ExitCode::SUCCESS
                } else {
                    println!("{} has {} error(s)", input.display(), result.errors.len());
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}
