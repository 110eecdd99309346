//! kubedeck library
//!
//! This library provides the core functionality for the kubedeck dashboard
//! backend. It can be used both as a binary and as a library for testing.

pub mod cli;
pub mod config;
pub mod exec;
pub mod helm;
pub mod kube;
pub mod models;
pub mod server;
pub mod services;
pub mod topology;

// Re-export the core types for convenience
pub use exec::{Gatekeeper, GatekeeperConfig, GatekeeperError, ValidatedCommand};
pub use topology::{resolve_topology, selector_matches, TopologyView, NO_CONNECTIONS};
