//! widerow command-line interface
//!
//! Reads and writes wide rows stored in a local data directory.
//!
//! # Usage
//!
//! ```bash
//! # Write two columns, one expiring after an hour
//! widerow put user-1 email=alice@example.com session=abc123@3600
//!
//! # Read the newest five columns as JSON
//! widerow -o json get user-1 --desc --limit 5
//!
//! # Remove a column, then the whole row
//! widerow delete user-1 session
//! widerow drop user-1
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use widerow_driver::{Serializers, TimingHook, WideRowDriver};
use widerow_engine::FjallEngine;

mod commands;
mod config;
mod formatter;

use commands::Command;
use config::CliConfig;
use formatter::OutputFormat;

/// widerow command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "widerow",
    author,
    version,
    about = "Read and write wide rows in a local column-family store",
    long_about = "Read and write wide rows in a local column-family store.\n\n\
                  Row keys, column names and values are UTF-8 strings. Columns of a\n\
                  row are kept in name order and may carry a time-to-live."
)]
struct Args {
    /// Configuration file path
    #[arg(long, value_name = "FILE", env = "WIDEROW_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short = 'D', long, value_name = "DIR", env = "WIDEROW_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Column family
    #[arg(short = 'c', long, value_name = "NAME", env = "WIDEROW_COLUMN_FAMILY")]
    column_family: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, env = "WIDEROW_OUTPUT")]
    output: Option<OutputFormatArg>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print operation timings
    #[arg(short = 't', long)]
    timing: bool,

    #[command(subcommand)]
    command: Command,
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display columns in a formatted table
    Table,
    /// Display columns as JSON
    Json,
    /// Display name and value separated by a tab
    Raw,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Raw => OutputFormat::Raw,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = load_config(&args)?;
    let format = match args.output {
        Some(arg) => arg.into(),
        None => config
            .output_format
            .parse::<OutputFormat>()
            .map_err(|e| anyhow!(e))
            .context("invalid output_format in configuration")?,
    };

    let engine = FjallEngine::open(&config.engine_config())
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let hook = Arc::new(TimingHook::new(
        config.driver_config().slow_operation_threshold_duration(),
    ));
    let driver = WideRowDriver::builder(Arc::new(engine.clone()), Serializers::strings())
        .config(config.driver_config())
        .hook(Arc::clone(&hook))
        .build()?;

    debug!(command = ?args.command, column_family = %config.column_family, "executing");
    let outcome = commands::execute(&driver, &args.command, config.default_limit).await?;
    engine.persist().context("flushing data to disk")?;

    println!("{}", formatter::format_outcome(&outcome, format));
    if config.timing {
        eprintln!("{}", formatter::format_stats(&hook.snapshot()));
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("widerow=debug,widerow_driver=debug,widerow_engine=debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<CliConfig> {
    let mut config = if let Some(path) = &args.config {
        CliConfig::from_file(path)?
    } else {
        CliConfig::load_default()?
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(column_family) = &args.column_family {
        config.column_family = column_family.clone();
    }
    if let Some(output) = args.output {
        config.output_format = OutputFormat::from(output).to_string();
    }
    config.timing |= args.timing;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_get() {
        let args = Args::try_parse_from([
            "widerow", "-o", "json", "get", "user-1", "--desc", "--from", "m", "--limit", "5",
        ])
        .unwrap();
        assert!(matches!(args.output, Some(OutputFormatArg::Json)));
        assert_eq!(
            args.command,
            Command::Get {
                row: "user-1".into(),
                desc: true,
                from: Some("m".into()),
                to: None,
                limit: Some(5),
            }
        );
    }

    #[test]
    fn test_put_requires_columns() {
        assert!(Args::try_parse_from(["widerow", "put", "user-1"]).is_err());
        let args = Args::try_parse_from(["widerow", "put", "user-1", "a=1", "b=2@30"]).unwrap();
        assert!(matches!(args.command, Command::Put { ref columns, .. } if columns.len() == 2));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "column_family = \"from_file\"\noutput_format = \"raw\"\n").unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let args = Args::try_parse_from([
            "widerow", "--config", &path_arg, "-c", "from_flag", "--timing", "drop", "r",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.column_family, "from_flag");
        assert_eq!(config.output_format, "raw");
        assert!(config.timing);
    }
}
