//! Command execution
//!
//! Everything between an operator-typed command string and a spawned
//! process: the gatekeeper validates and sanitizes the string before any
//! process exists, and the runner spawns the trusted binary with an
//! argument array. The gatekeeper must run first on every request; the
//! runner does not re-validate.

mod gatekeeper;
mod runner;

pub use gatekeeper::{Gatekeeper, GatekeeperConfig, GatekeeperError, ValidatedCommand};
pub use runner::{CommandRunner, ExecError, ProcessRunner};

#[cfg(test)]
pub use runner::MockCommandRunner;
