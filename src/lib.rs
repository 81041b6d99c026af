//! Core library surface for the Student Grade Tracker.
//!
//! The binary drives a terminal UI, but everything that computes or stores
//! grades lives here so it can be reused and tested without a terminal.
pub mod models;
pub mod roster;
pub mod store;
pub mod ui;

/// The entity and aggregate that every other layer manipulates.
pub use models::{InvalidGradeError, Student, MAX_GRADE, MIN_GRADE};
pub use roster::{Roster, NO_DATA_MESSAGE};

/// Flat-file persistence used by `main.rs` at startup and shutdown.
pub use store::{default_data_path, load, load_session, save, LoadOutcome, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
