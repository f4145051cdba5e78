//! # Taskq CLI Tool
//!
//! Command-line interface for the task service: submit tasks to queues, fetch
//! or wait for their results, and move files in and out of the service.

mod cli;

use clap::{Parser, Subcommand};
use taskq_client::ClientConfig;
use tracing::info;

use cli::{handle_config_command, handle_file_command, handle_task_command};

#[derive(Parser, Debug)]
#[command(name = "taskq-cli")]
#[command(about = "Command-line interface for the taskq task service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: search ./taskq-client.toml, ~/.taskq/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Service base URL, overriding configuration
    #[arg(short, long)]
    url: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Task submission and results
    #[command(subcommand)]
    Task(TaskCommands),

    /// File store operations
    #[command(subcommand)]
    File(FileCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Subcommand)]
pub enum TaskCommands {
    /// Submit a task to a queue
    Submit {
        /// Destination queue
        #[arg(short, long, default_value = "default_queue")]
        queue: String,
        /// Task payload as a JSON object
        #[arg(short, long)]
        input: String,
        /// Wait for the result after submitting
        #[arg(short, long)]
        wait: bool,
    },
    /// Fetch the result of a task
    Result {
        /// Task identifier returned by submit
        #[arg(value_name = "TASK_ID")]
        task_id: String,
        /// Poll until the result is available
        #[arg(short, long)]
        wait: bool,
        /// Give up after this many polls
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Give up after this many milliseconds
        #[arg(long)]
        max_wait_ms: Option<u64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FileCommands {
    /// Upload a file and print its file URL
    Upload {
        /// Local file to upload
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Download a file by its file URL
    Download {
        /// File URL returned by upload or by a task result
        #[arg(value_name = "FILE_URL")]
        file_url: String,
        /// Where to write the file
        #[arg(value_name = "DEST")]
        destination: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write the effective configuration to a file
    Init {
        /// Output path (default: ~/.taskq/config.toml)
        #[arg(short, long)]
        path: Option<String>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> taskq_client::ClientResult<()> {
    let cli = Cli::parse();

    taskq_client::logging::init_for_verbosity(cli.verbose);

    // Precedence: --config file > discovered config file > defaults; env overrides either
    let mut config = if let Some(config_path) = cli.config {
        let mut config = ClientConfig::load_from_file(std::path::Path::new(&config_path))?;
        config.apply_env_overrides();
        config
    } else {
        ClientConfig::load()?
    };

    if let Some(url) = cli.url {
        config.service.base_url = url;
    }

    info!(service_url = %config.service.base_url, "Taskq CLI starting");

    match cli.command {
        Commands::Task(task_cmd) => handle_task_command(task_cmd, &config).await,
        Commands::File(file_cmd) => handle_file_command(file_cmd, &config).await,
        Commands::Config(config_cmd) => handle_config_command(config_cmd, &config).await,
    }
}
