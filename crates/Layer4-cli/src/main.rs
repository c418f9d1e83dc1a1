//! EmberCode CLI - Main entry point

mod cli;
mod confirm;
mod ui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ember_foundation::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// EmberCode - AI coding agent for local models
#[derive(Parser, Debug)]
#[command(name = "ember")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Workspace directory (default: current directory)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// LLM provider (lmstudio, ollama)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model server endpoint URL
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Model name
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Sampling temperature (0-2)
    #[arg(short, long, global = true)]
    temperature: Option<f32>,

    /// Maximum tokens to generate per completion
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    /// Turn budget for a task
    #[arg(long, global = true)]
    max_turns: Option<usize>,

    /// Completion request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Restrict command execution to the allow-listed prefixes
    #[arg(long, global = true)]
    safe_mode: bool,

    /// Approve all confirmations without asking
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to a JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a task with the autonomous agent
    Run {
        /// Task description
        task: String,
    },
    /// List the available tools
    Tools,
    /// Show the session configuration
    Status,
    /// Test the model server connection
    Ping,
    /// Print the workspace directory tree
    Tree {
        /// Maximum depth to traverse
        #[arg(long, default_value = "3")]
        max_depth: usize,
    },
    /// Print code statistics for the workspace
    Analyze {
        /// File pattern to analyze
        #[arg(default_value = "*")]
        pattern: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = build_config(&args)?;

    match args.command {
        Command::Run { ref task } => cli::run_task(config, task, args.yes).await,
        Command::Tools => cli::show_tools(&config),
        Command::Status => cli::show_status(&config).await,
        Command::Ping => cli::ping(&config).await,
        Command::Tree { max_depth } => cli::show_tree(&config, max_depth),
        Command::Analyze { ref pattern } => cli::analyze(&config, pattern),
    }
}

/// Assemble the session configuration: defaults, then the settings file,
/// then environment variables, then CLI flags.
fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();

    if let Some(provider) = &args.provider {
        config.provider = provider.parse()?;
        // Re-derive endpoint/model defaults for the chosen provider unless
        // the user pins them below
        config.endpoint = config.provider.default_endpoint().to_string();
        config.model = config.provider.default_model().to_string();
    }
    config.workspace = args.workspace.clone();
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.safe_mode {
        config.safe_mode = true;
    }
    if args.debug {
        config.verbose = true;
    }

    config.validate()?;
    Ok(config)
}
