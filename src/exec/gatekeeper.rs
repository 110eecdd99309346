//! Command validation gate
//!
//! Validates and sanitizes a free-form operator command string before any
//! process is spawned. Evaluation order (strict):
//! 1. Program prefix check — the string must start with the configured
//!    program token
//! 2. Subcommand extraction — leading word after the prefix
//! 3. Whitelist check — subcommand must be in the fixed allowed set
//! 4. Audit — `delete` without `--dry-run` emits a security-audit event
//!    (allowed, but recorded)
//! 5. Sanitization — shell metacharacters are stripped from the approved
//!    string
//!
//! Sanitization runs after whitelist approval, never before: rejecting on
//! the raw string keeps the real subcommand token intact for the check.

use std::collections::BTreeSet;

use regex::Regex;
use thiserror::Error;

/// Shell metacharacters stripped during sanitization. Plain space and tab
/// stay: stripping them would collapse every multi-token command into one
/// unusable word.
const SHELL_METACHARACTERS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']', '\\', '!', '#', '*', '?', '"', '\'',
    '<', '>', '\n', '\r',
];

/// Subcommands allowed through the default kubectl gate.
const KUBECTL_SUBCOMMANDS: &[&str] = &[
    "get",
    "describe",
    "logs",
    "exec",
    "port-forward",
    "cp",
    "apply",
    "create",
    "delete",
    "edit",
    "label",
    "annotate",
    "scale",
    "rollout",
    "top",
    "api-resources",
    "api-versions",
    "cluster-info",
    "config",
    "explain",
    "version",
];

/// Validation failure for an operator command.
///
/// Both variants are terminal for the request: nothing is retried and
/// nothing is executed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatekeeperError {
    /// Malformed input: wrong program prefix or no subcommand token
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Well-formed input with a subcommand outside the allowed set
    #[error("subcommand '{0}' is not allowed")]
    Forbidden(String),
}

/// Immutable gate configuration, passed in at construction so tests can run
/// with a smaller whitelist.
#[derive(Debug, Clone)]
pub struct GatekeeperConfig {
    /// Program token the command must start with (e.g. "kubectl")
    pub program: String,
    /// Closed set of allowed subcommands
    pub allowed_subcommands: BTreeSet<String>,
}

impl GatekeeperConfig {
    /// The default kubectl gate
    pub fn kubectl() -> Self {
        Self {
            program: "kubectl".to_string(),
            allowed_subcommands: KUBECTL_SUBCOMMANDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A command string that has passed the whitelist and been sanitized.
/// Immutable once produced; the runner consumes it via [`argv`](Self::argv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    command: String,
    subcommand: String,
    audited: bool,
}

impl ValidatedCommand {
    /// The full sanitized command string, program token included
    pub fn as_str(&self) -> &str {
        &self.command
    }

    /// The whitelisted subcommand token
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Whether validation emitted a security-audit event for this command
    pub fn audited(&self) -> bool {
        self.audited
    }

    /// Argument vector for the exec facility: every whitespace-delimited
    /// token after the program. Exec must use this, not a joined shell
    /// string; sanitization is defense-in-depth, not the injection barrier.
    pub fn argv(&self) -> Vec<String> {
        self.command
            .split_whitespace()
            .skip(1)
            .map(str::to_string)
            .collect()
    }
}

/// The validation gate in front of the command runner
pub struct Gatekeeper {
    config: GatekeeperConfig,
    subcommand_re: Regex,
}

impl Gatekeeper {
    pub fn new(config: GatekeeperConfig) -> Self {
        // Leading-word match. Interior hyphens are included so the
        // whitelisted multi-word subcommands (port-forward, api-resources,
        // ...) are actually reachable; a leading flag like "-n" is not a
        // subcommand.
        let subcommand_re = Regex::new(r"^(\w[\w-]*)").expect("static subcommand regex");
        Self {
            config,
            subcommand_re,
        }
    }

    /// Validate one raw command string.
    ///
    /// On success the returned [`ValidatedCommand`] is safe to hand to the
    /// exec facility. All failures are terminal; nothing was executed.
    pub fn validate(&self, raw: &str) -> Result<ValidatedCommand, GatekeeperError> {
        let trimmed = raw.trim();

        let prefix = format!("{} ", self.config.program);
        if !trimmed.starts_with(&prefix) {
            return Err(GatekeeperError::InvalidCommand(format!(
                "command must start with {}, e.g. '{} get pods -n default'",
                self.config.program, self.config.program
            )));
        }

        let rest = trimmed[prefix.len()..].trim_start();
        let subcommand = match self
            .subcommand_re
            .captures(rest)
            .and_then(|caps| caps.get(1))
        {
            Some(m) => m.as_str().to_string(),
            None => {
                return Err(GatekeeperError::InvalidCommand(format!(
                    "missing subcommand, e.g. '{} get pods'",
                    self.config.program
                )));
            }
        };

        if !self.config.allowed_subcommands.contains(&subcommand) {
            return Err(GatekeeperError::Forbidden(subcommand));
        }

        // Destructive commands pass, but never silently.
        let audited = subcommand == "delete" && !trimmed.contains("--dry-run");
        if audited {
            tracing::warn!(
                target: "audit",
                command = %trimmed,
                "delete command requested without --dry-run"
            );
        }

        Ok(ValidatedCommand {
            command: sanitize(trimmed),
            subcommand,
            audited,
        })
    }
}

/// Strip shell metacharacters and trim. Idempotent: running it twice yields
/// the same string as once.
fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !SHELL_METACHARACTERS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Gatekeeper {
        Gatekeeper::new(GatekeeperConfig::kubectl())
    }

    #[test]
    fn test_hyphenated_subcommand_extraction() {
        let validated = gate().validate("kubectl port-forward pod/web 8080:80").unwrap();
        assert_eq!(validated.subcommand(), "port-forward");
    }

    #[test]
    fn test_argv_skips_program_token() {
        let validated = gate().validate("kubectl get pods -n default").unwrap();
        assert_eq!(validated.argv(), vec!["get", "pods", "-n", "default"]);
    }

    #[test]
    fn test_custom_whitelist_is_authoritative() {
        let config = GatekeeperConfig {
            program: "kubectl".to_string(),
            allowed_subcommands: ["get", "logs"].iter().map(|s| s.to_string()).collect(),
        };
        let gate = Gatekeeper::new(config);
        assert!(gate.validate("kubectl get pods").is_ok());
        // Allowed by the default set, but not by this gate's config
        assert_eq!(
            gate.validate("kubectl delete pod web"),
            Err(GatekeeperError::Forbidden("delete".to_string()))
        );
    }

    #[test]
    fn test_sanitize_strips_metacharacters() {
        assert_eq!(
            sanitize("kubectl get pods; rm -rf $(HOME) | cat"),
            "kubectl get pods rm -rf HOME  cat"
        );
    }
}
