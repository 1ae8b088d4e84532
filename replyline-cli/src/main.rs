use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use colored::*;
use replyline_core::logging::init_tracing;
use replyline_core::ClientConfig;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "replyline")]
#[command(about = "ReplyLine - author, validate and deploy social media reply automations", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the configured connection. Every flag falls back to the
/// config file and `REPLYLINE_*` variables.
#[derive(Args)]
struct ConnectionArgs {
    /// Base URL of the automation API
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Bearer token sent with every request
    #[arg(long, global = true)]
    token: Option<String>,
    /// Connected account the automations belong to
    #[arg(long, global = true)]
    platform_user_id: Option<String>,
    /// Model provider credential identifier
    #[arg(long, global = true)]
    provider_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate draft documents without contacting the API
    Check {
        /// Draft file or directory of drafts
        path: PathBuf,
    },
    /// Print the wire payload each draft would be submitted as
    Render {
        path: PathBuf,
    },
    /// Validate and submit drafts
    Deploy {
        path: PathBuf,
    },
    /// List deployed automations
    List,
    /// Pause an active automation
    Pause { automation_id: String },
    /// Reactivate a paused automation
    Activate { automation_id: String },
    /// Delete an automation
    Delete { automation_id: String },
    /// Upload documents to the knowledge base
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "✘".red().bold(), err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Version = cli.command {
        println!("ReplyLine v{}", env!("CARGO_PKG_VERSION"));
        println!("Automation authoring for comment and DM replies");
        return Ok(());
    }

    let config = load_config(&cli.connection)?;
    if init_tracing(Some(&config.log_level)).is_err() {
        eprintln!("{}", "tracing already initialised".yellow());
    }

    match cli.command {
        Commands::Check { path } => commands::check(&path),
        Commands::Render { path } => commands::render(&config, &path),
        Commands::Deploy { path } => commands::deploy(&config, &path).await,
        Commands::List => commands::list(&config).await,
        Commands::Pause { automation_id } => commands::pause(&config, &automation_id).await,
        Commands::Activate { automation_id } => {
            commands::activate(&config, &automation_id).await
        }
        Commands::Delete { automation_id } => commands::delete(&config, &automation_id).await,
        Commands::Upload { files } => commands::upload(&config, &files).await,
        Commands::Version => Ok(()),
    }
}

fn load_config(args: &ConnectionArgs) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config.set_api_url(url)?;
    }
    if let Some(token) = &args.token {
        config.api_token = Some(token.clone());
    }
    if let Some(id) = &args.platform_user_id {
        config.platform_user_id = Some(id.clone());
    }
    if let Some(id) = &args.provider_id {
        config.provider_id = Some(id.clone());
    }
    Ok(config)
}
