//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.
//! The session configuration is built once here and handed to the S3 client;
//! every command then runs against the same bucket manager.

use clap::{Parser, Subcommand};
use webotron_core::{
    BucketManager, Config, ConfigManager, ObjectStore, SessionConfig, WebsiteConfig,
};
use webotron_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod list_buckets;
mod list_objects;
mod setup_bucket;
mod sync;

/// webotron - deploy static websites to S3
///
/// Creates and configures S3 buckets for static website hosting
/// and uploads local site directories to them.
#[derive(Parser, Debug)]
#[command(name = "webotron")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use a given AWS profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Region for new buckets (overrides profile and config file)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom S3 endpoint, for S3-compatible services
    #[arg(long, global = true, env = "WEBOTRON_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, global = true, default_value = "false")]
    pub path_style: bool,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Session settings given on the command line
    pub fn session_overrides(&self) -> SessionConfig {
        SessionConfig {
            profile: self.profile.clone(),
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            path_style: self.path_style,
            ..Default::default()
        }
    }

    /// Output settings from flags, falling back to the config file defaults
    pub fn output_config(&self, config: &Config) -> OutputConfig {
        OutputConfig {
            json: self.json || config.defaults.output == "json",
            no_color: self.no_color || config.defaults.color == "never",
            no_progress: self.no_progress || !config.defaults.progress,
            quiet: self.quiet,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all S3 buckets
    ListBuckets,

    /// List objects in an S3 bucket
    ListBucketObjects(list_objects::ListObjectsArgs),

    /// Create and configure an S3 bucket for website hosting
    SetupBucket(setup_bucket::SetupBucketArgs),

    /// Sync contents of PATHNAME to BUCKET
    Sync(sync::SyncArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let config = match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(e) => {
            Formatter::default().error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let formatter = Formatter::new(cli.output_config(&config));
    let session = config.session.clone().merge(cli.session_overrides());

    match cli.command {
        Commands::Completions(args) => completions::execute(args),
        command => {
            let client = match S3Client::new(session).await {
                Ok(client) => client,
                Err(e) => {
                    formatter.error(&format!("Failed to create S3 client: {e}"));
                    return ExitCode::from_error(&e);
                }
            };
            let manager = BucketManager::new(client);
            run(command, &manager, &config.website, &formatter).await
        }
    }
}

/// Run a command against a bucket manager
pub async fn run<S: ObjectStore>(
    command: Commands,
    manager: &BucketManager<S>,
    website: &WebsiteConfig,
    formatter: &Formatter,
) -> ExitCode {
    match command {
        Commands::ListBuckets => list_buckets::execute(manager, formatter).await,
        Commands::ListBucketObjects(args) => list_objects::execute(args, manager, formatter).await,
        Commands::SetupBucket(args) => {
            setup_bucket::execute(args, website, manager, formatter).await
        }
        Commands::Sync(args) => sync::execute(args, manager, formatter).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
