//! Logging configuration for querybox.
//!
//! Writes to a file in interactive mode (to avoid corrupting the terminal
//! display) and to stderr in headless mode.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes logging for interactive TUI mode.
///
/// Location: `~/.local/state/querybox/querybox.log` on Linux (XDG state
/// directory), or the platform-appropriate state/config directory elsewhere.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            // No logging is better than a corrupted screen
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging for headless mode.
///
/// Logs go to stderr so they never mix with the JSON/text output on stdout.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("querybox").join("querybox.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("querybox").join("querybox.log");
    }

    std::env::temp_dir().join("querybox.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_is_absolute() {
        let path = get_log_path();
        assert!(path.is_absolute());
    }

    #[test]
    fn test_log_path_ends_with_querybox_log() {
        let path = get_log_path();
        assert!(path.ends_with("querybox.log"));
    }
}
