//! Command-line interface argument parsing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;

/// Log file name placed next to the roster file when `--log-file` is absent.
const LOG_FILE_NAME: &str = "grade-tracker.log";

/// Student Grade Tracker
///
/// Record grades per student, review class statistics, and keep the roster in
/// a plain comma-separated file between sessions.
///
/// Examples:
///   grade-tracker
///   grade-tracker --data-file ./class-a.csv
///   grade-tracker --summary
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Roster file to load at startup and save on exit
    ///
    /// Defaults to ~/.grade-tracker/student_grades.csv
    #[arg(short, long, value_name = "FILE", env = "GRADE_TRACKER_DATA")]
    pub data_file: Option<PathBuf>,

    /// Print the summary report to stdout and exit
    #[arg(short, long)]
    pub summary: bool,

    /// Where to write log output while the TUI is running
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use --verbose and --quiet together");
        }
        Ok(())
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Log destination: the explicit flag, else beside the data file.
    pub fn log_path(&self, data_path: &Path) -> PathBuf {
        match &self.log_file {
            Some(path) => path.clone(),
            None => data_path
                .parent()
                .map(|dir| dir.join(LOG_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME)),
        }
    }
}
