//! Configuration system for kubedeck
//!
//! YAML config file with layered defaults and environment overrides, plus
//! dot-notation get/set used by the `config` CLI subcommand.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "server.bind" => Ok(config.server.bind.clone()),
        "kubectl.binary" => Ok(config.kubectl.binary.clone()),
        "kubectl.timeoutSecs" => Ok(config.kubectl.timeout_secs.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "defaultNamespace" => {
            config.default_namespace = value.to_string();
        }
        "server.bind" => {
            config.server.bind = value.to_string();
        }
        "kubectl.binary" => {
            config.kubectl.binary = value.to_string();
        }
        "kubectl.timeoutSecs" => {
            config.kubectl.timeout_secs = value
                .parse()
                .context("kubectl.timeoutSecs must be a number")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
    Ok(())
}
