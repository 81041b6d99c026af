//! Binary entry point: resolve the roster file, load it with recovery, run the
//! Ratatui session, and write the roster back when the user quits.

mod cli;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use grade_tracker::{default_data_path, load_session, run_app, save, App, LoadOutcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse_args();
    args.validate()?;

    let data_path = match &args.data_file {
        Some(path) => path.clone(),
        None => default_data_path()?,
    };

    if args.summary {
        init_stderr_logging(&args);
        return print_summary(&data_path);
    }

    init_file_logging(&args, &args.log_path(&data_path));
    info!("Grade Tracker v{}", env!("CARGO_PKG_VERSION"));

    let LoadOutcome { roster, warning } = load_session(&data_path);
    let mut app = App::new(roster);
    if let Some(warning) = warning {
        app.show_warning(warning);
    }

    let session = run_app(&mut app);

    // Save even when the UI loop failed so the session's edits survive.
    let saved = save(app.roster(), &data_path)
        .with_context(|| format!("could not save student data to {}", data_path.display()));
    if let Err(err) = &saved {
        error!(error = %err, "save failed");
    }

    session?;
    saved?;
    println!("Data saved successfully to: {}", data_path.display());
    Ok(())
}

/// Print the class summary without starting the UI or touching the file.
fn print_summary(data_path: &Path) -> Result<()> {
    let outcome = load_session(data_path);
    if let Some(warning) = &outcome.warning {
        eprintln!("Warning: {warning}");
    }
    let summary = outcome.roster.render_summary();
    if summary.ends_with('\n') {
        print!("{summary}");
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn env_filter(args: &Args) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()))
}

fn init_stderr_logging(args: &Args) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(args))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// The TUI owns the terminal, so log events go to a file instead. Failing to
/// open it only costs the log, never the session.
fn init_file_logging(args: &Args, log_path: &Path) {
    if let Some(parent) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        let _ = fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!(
                "Warning: could not open log file {}: {err}",
                log_path.display()
            );
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(args))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
