//! kubedeck - backend service for a local Kubernetes cluster dashboard
//!
//! Serves the JSON API the dashboard frontend polls: resource lists,
//! namespace topology, Helm releases, and a gatekept kubectl runner.

mod cli;
mod config;
mod exec;
mod helm;
mod kube;
mod models;
mod server;
mod services;
mod topology;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// kubedeck - backend service for a local Kubernetes cluster dashboard
#[derive(Parser, Debug)]
#[command(name = "kubedeck")]
#[command(about = "Backend service for a local Kubernetes cluster dashboard", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Listen address override (host:port)
    #[arg(long)]
    bind: Option<String>,

    /// Default namespace override
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Configuration subcommand
    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "server.bind", "kubectl.binary")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "server.bind", "kubectl.binary")
        key: String,
        /// Configuration value
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle config subcommand
    if let Some(Command::Config { subcommand }) = args.command {
        return handle_config_command(subcommand);
    }

    // Initialize logging; debug routes to a tempfile so stderr stays usable
    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    // Load configuration, then apply CLI overrides
    let mut config = config::ConfigLoader::load()
        .unwrap_or_else(|_| config::ConfigLoader::load_defaults());
    config.default_namespace = kube::get_default_namespace(&config.default_namespace);
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(namespace) = args.namespace {
        config.default_namespace = namespace;
    }

    tracing::debug!(
        "Configuration loaded: bind={}, defaultNamespace={}, kubectl={}",
        config.server.bind,
        config.default_namespace,
        config.kubectl.binary
    );

    // Initialize Kubernetes client
    tracing::debug!("Initializing Kubernetes client");
    let client = kube::create_client()
        .await
        .context("Failed to connect to the Kubernetes cluster")?;
    let context = kube::get_context().await?;

    tracing::info!("Connected to Kubernetes cluster: {}", context);

    let state = server::AppState::new(&config, client, context);
    server::run(&config, state).await
}

/// Handle configuration subcommands
fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    use config::{get_config_value, paths, set_config_value, ConfigLoader};

    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;

            if let Some(key) = key {
                let value = get_config_value(&config, &key)?;
                println!("{}", value);
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set { key, value } => {
            let mut config =
                ConfigLoader::load().unwrap_or_else(|_| ConfigLoader::load_defaults());

            set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save_root(&config).context("Failed to save configuration")?;
            println!("Configuration saved");
        }
        ConfigSubcommand::List => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            let config_path = paths::root_config_path();
            println!("{}", config_path.display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
