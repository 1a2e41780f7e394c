//! Bridge to the NEMO stellar dynamics toolbox
//!
//! NEMO tools are run as subprocesses located through `NEMO_PATH`. Binary
//! snapshots are read by piping them through `tsf` and parsing its text
//! listing.

pub mod command;
pub mod snapshot;
pub mod tsf;

pub use command::{
    nemo_binary_path, read_nemo, NemoCommand, NemoInstall, SmokeTestOptions, SmokeTestReport,
};
pub use snapshot::NemoSnapshot;
pub use tsf::{parse_snapshot, parse_tsf, TsfItem, TsfSnapshot};

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors from running NEMO tools or reading their output
#[derive(Debug, Error)]
pub enum NemoError {
    /// `NEMO_PATH` is not set
    #[error(
        "NEMO_PATH environment variable not set. Set it to your NEMO installation directory: \
         export NEMO_PATH=/path/to/nemo"
    )]
    NemoPathUnset,
    /// The tool could not be started
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// Tool name
        tool: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },
    /// The tool ran but exited unsuccessfully
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        /// Tool name
        tool: String,
        /// Exit status of the tool
        status: ExitStatus,
        /// Captured standard error, trimmed
        stderr: String,
    },
    /// Expected output file was not produced
    #[error("{tool} did not produce {}", path.display())]
    MissingOutput {
        /// Tool name
        tool: String,
        /// File the tool was asked to write
        path: PathBuf,
    },
    /// Filesystem error around a tool run
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The listing contained no `SnapShot` sets
    #[error("no snapshots found in tsf output")]
    NoSnapshots,
    /// Requested snapshot index beyond the listing
    #[error("timestep {timestep} out of range ({available} snapshot(s) available)")]
    TimestepOutOfRange {
        /// Requested snapshot index
        timestep: usize,
        /// Number of snapshots in the listing
        available: usize,
    },
    /// Required item absent from a snapshot
    #[error("could not find {field} in tsf output")]
    MissingField {
        /// Item name
        field: &'static str,
    },
    /// Array shorter than the particle count requires
    #[error("{field} has {found} values, expected {expected} (was tsf run with allline=true?)")]
    ArrayLength {
        /// Item name
        field: &'static str,
        /// Values required by the particle count
        expected: usize,
        /// Values present
        found: usize,
    },
    /// Item with an unusable value
    #[error("invalid {field}: {value}")]
    InvalidValue {
        /// Item name
        field: &'static str,
        /// Offending value
        value: f64,
    },
}
