//! Configuration loading and merging logic
//!
//! Handles loading configuration from file and applying environment
//! overrides according to precedence rules.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{defaults, paths, schema::Config};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    pub fn load() -> Result<Config> {
        let mut config = match Self::load_file(&paths::root_config_path()) {
            Ok(file_config) => file_config,
            Err(_) => Self::load_defaults(),
        };

        config = Self::apply_env_overrides(config);
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &PathBuf) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration by loading and checking for errors
    pub fn validate() -> Result<()> {
        let root_path = paths::root_config_path();
        if root_path.exists() {
            let contents = std::fs::read_to_string(&root_path)
                .with_context(|| format!("Failed to read config file: {}", root_path.display()))?;

            // Parse with serde_yaml - this will catch YAML syntax errors
            let config: Config = serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", root_path.display()))?;

            if config.server.bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(anyhow::anyhow!(
                    "server.bind is not a valid socket address: {}",
                    config.server.bind
                ));
            }
        }

        let _ = Self::load().context("Failed to load merged configuration")?;
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Save configuration to the root config file
    pub fn save_root(config: &Config) -> Result<()> {
        let dir = paths::config_dir();
        paths::ensure_dir(&dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;

        let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
        let path = paths::root_config_path();
        std::fs::write(&path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// - KUBEDECK_BIND overrides server.bind
    /// - KUBEDECK_KUBECTL overrides kubectl.binary
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(bind) = std::env::var("KUBEDECK_BIND") {
            if !bind.is_empty() {
                config.server.bind = bind;
            }
        }
        if let Ok(binary) = std::env::var("KUBEDECK_KUBECTL") {
            if !binary.is_empty() {
                config.kubectl.binary = binary;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_file_parses_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaultNamespace: staging").unwrap();
        writeln!(file, "server:").unwrap();
        writeln!(file, "  bind: 0.0.0.0:9999").unwrap();

        let config = ConfigLoader::load_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.default_namespace, "staging");
        assert_eq!(config.server.bind, "0.0.0.0:9999");
    }

    #[test]
    fn test_load_file_missing_path_errors() {
        let path = PathBuf::from("/nonexistent/kubedeck/config.yaml");
        assert!(ConfigLoader::load_file(&path).is_err());
    }

    #[test]
    fn test_load_file_rejects_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, mapping").unwrap();
        assert!(ConfigLoader::load_file(&file.path().to_path_buf()).is_err());
    }
}
