//! Flat-file persistence split across logical submodules: the text codec and
//! the blocking file access built on top of it.

mod codec;
mod file;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use codec::{
    deserialize, deserialize_lenient, serialize, MalformedRecordError, RecordFault, DELIMITER,
};
pub use file::{default_data_path, load, load_session, save, LoadOutcome};

/// Failures surfaced by `load` and `save`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
}
