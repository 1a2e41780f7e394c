//! Tidal stream evolution: loading runs, synchronising them onto a master
//! timeline and laying out animation frames
//!
//! Runs sampled at different times are linearly interpolated onto one evenly
//! spaced timeline. A run contributes to a frame only while the frame time
//! lies within its own time range.

pub mod animation;
pub mod run;
pub mod sync;

pub use animation::{
    format_time_template, AnimationConfig, AnimationExport, Frame, StreamAnimator, StreamFrame,
    DEFAULT_PALETTE, DEFAULT_TITLE,
};
pub use run::{label_from_path, PositionCube, StreamRun};
pub use sync::{AxisLimits, MasterTimeline, SyncedRun, DEFAULT_TIMESTEP};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading, synchronising or exporting stream runs
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Run file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the run file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Run file is not valid JSON of the expected shape
    #[error("invalid stream run {label}: {source}")]
    Parse {
        /// Run label
        label: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },
    /// Arrays with inconsistent dimensions
    #[error("stream run {label}: {detail}")]
    Shape {
        /// Run label
        label: String,
        /// Which arrays disagree
        detail: String,
    },
    /// Times are not finite and strictly increasing
    #[error("stream run {label}: times must be finite and strictly increasing")]
    NonMonotonicTimes {
        /// Run label
        label: String,
    },
    /// Nothing was given to synchronise
    #[error("no stream runs to animate")]
    NoRuns,
    /// Frames could not be encoded as JSON
    #[error("failed to serialise frames: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Export file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
