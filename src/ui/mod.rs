//! Ratatui front-end. It holds no grading logic of its own: every edit goes
//! through `Roster`, and this layer only collects input, asks for
//! confirmation, and shows status messages.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
