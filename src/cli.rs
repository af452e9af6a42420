//! Command-line argument parsing for querybox.

use clap::Parser;
use std::path::PathBuf;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output of the final screen.
    #[default]
    Text,
    /// JSON output with screen, state, and metadata.
    Json,
    /// Frame-by-frame output showing state after each event.
    Frames,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "frames" => Ok(Self::Frames),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text, json, or frames"
            )),
        }
    }
}

/// A schema-aware inline autocomplete query box for the terminal.
#[derive(Parser, Debug)]
#[command(name = "querybox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON schema file (overrides `schema_path` from the config file)
    #[arg(short = 's', long, value_name = "PATH", env = "QUERYBOX_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show the query box but ignore all input
    #[arg(long)]
    pub read_only: bool,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "type:reclam,key:tab")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT, e.g., "80x24")
    #[arg(long, value_name = "SIZE", default_value = "80x24")]
    pub size: String,

    /// Output format for headless mode
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns true if headless mode is enabled.
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Parses the screen size from the --size argument.
    /// Returns (width, height) or an error.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let parts: Vec<&str> = self.size.split('x').collect();
        if parts.len() != 2 {
            return Err(format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 80x24)",
                self.size
            ));
        }
        let width = parts[0]
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{}'", parts[0]))?;
        let height = parts[1]
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{}'", parts[1]))?;
        if width == 0 || height == 0 {
            return Err(format!("Screen size must be non-zero: '{}'", self.size));
        }
        Ok((width, height))
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates headless mode arguments.
    /// Returns an error message if validation fails.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if !self.headless {
            return Ok(());
        }

        if self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }

        self.parse_screen_size()?;
        self.parse_output_format()?;

        Ok(())
    }
}
