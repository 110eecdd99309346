//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace the dashboard opens on
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// kubectl runner configuration
    #[serde(default)]
    pub kubectl: KubectlConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Listen address, host:port
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// kubectl runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubectlConfig {
    /// Binary the validated commands are spawned as
    #[serde(default = "default_kubectl_binary")]
    pub binary: String,

    /// Per-command execution timeout in seconds
    #[serde(default = "default_kubectl_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8085".to_string()
}

fn default_kubectl_binary() -> String {
    "kubectl".to_string()
}

fn default_kubectl_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            server: ServerConfig::default(),
            kubectl: KubectlConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: default_kubectl_binary(),
            timeout_secs: default_kubectl_timeout(),
        }
    }
}
