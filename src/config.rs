//! Command-line configuration and logging setup.

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Page through tables in the terminal.
///
/// Reads psql output from stdin, or pages a PostgreSQL table with --connect.
#[derive(Debug, Clone, Parser)]
#[command(name = "ptp", version, about)]
pub struct Cli {
    /// PostgreSQL connection string (key=value or postgresql:// URI)
    #[arg(short, long, requires = "table")]
    pub connect: Option<String>,

    /// Table to page through (requires --connect)
    #[arg(short, long, requires = "connect")]
    pub table: Option<String>,

    /// Rows per page
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITEMS_PER_PAGE)]
    pub page_size: usize,

    /// Page piped input one page at a time instead of slicing it locally
    #[arg(long, conflicts_with = "connect")]
    pub server_side: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

/// Errors raised while applying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("cannot open log file '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl Cli {
    /// Check values clap cannot express on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    /// Install the file logger when --log-file is given.
    ///
    /// The terminal belongs to the UI, so logs never go to stdout/stderr.
    pub fn init_logging(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.log_file else {
            return Ok(());
        };
        let file = File::create(path).map_err(|source| ConfigError::LogFile {
            path: path.clone(),
            source,
        })?;
        WriteLogger::init(self.log_level, Config::default(), file)?;
        log::info!("logging to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ptp"]).unwrap();
        assert_eq!(cli.page_size, DEFAULT_ITEMS_PER_PAGE);
        assert!(!cli.server_side);
        assert!(cli.connect.is_none());
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_connect_requires_table() {
        assert!(Cli::try_parse_from(["ptp", "--connect", "host=localhost"]).is_err());
        let cli =
            Cli::try_parse_from(["ptp", "--connect", "host=localhost", "--table", "users"])
                .unwrap();
        assert_eq!(cli.table.as_deref(), Some("users"));
    }

    #[test]
    fn test_server_side_conflicts_with_connect() {
        let result = Cli::try_parse_from([
            "ptp",
            "--connect",
            "host=localhost",
            "--table",
            "users",
            "--server-side",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let cli = Cli::try_parse_from(["ptp", "-n", "0"]).unwrap();
        assert!(matches!(cli.validate(), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn test_log_level_parses() {
        let cli = Cli::try_parse_from(["ptp", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);
    }
}
