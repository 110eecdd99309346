//! Logging initialization

use std::path::PathBuf;

/// Initialize logging based on debug flag
/// Returns the log file path if debug logging is enabled
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    if debug {
        // Create a temporary log file using tempfile crate for cross-platform support
        // Use Builder to create a named temp file that persists
        let temp_file = tempfile::Builder::new()
            .prefix("kubedeck-")
            .suffix(".log")
            .tempfile()
            .map(|f| {
                let path = f.path().to_path_buf();
                // Keep the file alive by leaking it (it will be cleaned up by the OS)
                std::mem::forget(f);
                path
            })
            .unwrap_or_else(|_| {
                // Fallback: create file directly in temp_dir
                let temp_dir = std::env::temp_dir();
                temp_dir.join(format!("kubedeck-{}.log", std::process::id()))
            });

        // Open the file for writing (it already exists from tempfile)
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&temp_file)
            .expect("Failed to open log file");

        // Debug logging goes to the file; stderr stays clean for the
        // operator's own shell
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_ansi(false) // No ANSI codes in log file
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .init();

        Some(temp_file)
    } else {
        // Normal operation: info-level logs (including audit events) to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
        None
    }
}
