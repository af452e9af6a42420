//! querybox - A schema-aware inline autocomplete query box for the terminal.

use querybox::cli::Cli;
use querybox::config::Config;
use querybox::error::Result;
use querybox::logging;
use querybox::schema::Schema;
use querybox::tui::{self, App};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Headless output goes to stdout, so logs go to stderr there
    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let schema = resolve_schema(&cli, &config)?;
    info!("Schema loaded: {}", schema.summary());

    let app = App::new(schema, config.query_box_options(cli.read_only));

    if cli.is_headless() {
        tui::headless::run_headless(&cli, app).await
    } else {
        tui::run(app)?;
        Ok(0)
    }
}

/// Picks the schema: `--schema`, then the config file, then the demo schema.
fn resolve_schema(cli: &Cli, config: &Config) -> Result<Schema> {
    match cli.schema.as_ref().or(config.schema_path.as_ref()) {
        Some(path) => Schema::load_from_file(path),
        None => {
            info!("No schema file configured, using the demo schema");
            Ok(Schema::demo())
        }
    }
}
