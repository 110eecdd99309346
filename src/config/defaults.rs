//! Built-in default configuration

use super::schema::Config;

/// The configuration used when no config file exists
pub fn default_config() -> Config {
    Config::default()
}
