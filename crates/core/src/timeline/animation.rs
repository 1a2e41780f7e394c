//! Frame-by-frame description of a multi-stream animation
//!
//! Rendering is left to the consumer: [`StreamAnimator::frames`] yields, for
//! every master-timeline sample, the title and the cluster and stream points
//! of every run covering that time, with their styling.

use crate::timeline::{AxisLimits, MasterTimeline, StreamRun, SyncedRun, TimelineError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Colours cycled through when a run has none assigned
pub const DEFAULT_PALETTE: [&str; 12] = [
    "red", "blue", "green", "orange", "purple", "cyan", "magenta", "brown", "pink", "gray",
    "olive", "navy",
];

/// Default title; `{time}` is replaced by the frame time, `{time:.N}` with N decimals
pub const DEFAULT_TITLE: &str = "Tidal Stream Evolution\nTime: {time:.1} Myr";

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames per second of the rendered animation
    pub fps: u32,
    /// Delay between frames in milliseconds
    pub interval_ms: u64,
    /// Figure size in inches
    pub figure_size: (f64, f64),
    /// Loop the animation
    pub repeat: bool,
    /// Per-run cluster colours; empty entries fall back to the palette
    pub cluster_colors: Vec<String>,
    /// Per-run stream colours; empty entries fall back to the palette
    pub stream_colors: Vec<String>,
    /// Per-run legend labels; missing entries fall back to the run label
    pub cluster_labels: Vec<String>,
    /// Marker size of the cluster centre
    pub cluster_size: f64,
    /// Marker style of the cluster centre
    pub cluster_marker: String,
    /// Marker size of stream particles
    pub stream_size: f64,
    /// Opacity of stream particles
    pub stream_alpha: f64,
    /// Padding around the data on each axis, kpc
    pub axis_margin: f64,
    /// Draw a legend
    pub show_legend: bool,
    /// Title with `{time}` or `{time:.N}` placeholders
    pub title_template: String,
    /// Fixed axis ranges instead of ones fitted to the data
    pub limits: Option<AxisLimits>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            interval_ms: 100,
            figure_size: (10.0, 8.0),
            repeat: true,
            cluster_colors: Vec::new(),
            stream_colors: Vec::new(),
            cluster_labels: Vec::new(),
            cluster_size: 100.0,
            cluster_marker: "*".to_string(),
            stream_size: 1.0,
            stream_alpha: 0.6,
            axis_margin: 1.0,
            show_legend: true,
            title_template: DEFAULT_TITLE.to_string(),
            limits: None,
        }
    }
}

impl AnimationConfig {
    fn cluster_color(&self, index: usize) -> String {
        pick(&self.cluster_colors, index)
    }

    fn stream_color(&self, index: usize) -> String {
        pick(&self.stream_colors, index)
    }

    fn label(&self, index: usize, fallback: &str) -> String {
        self.cluster_labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Render the title template at `time`
    pub fn title(&self, time: f64) -> String {
        format_time_template(&self.title_template, time)
    }
}

fn pick(colors: &[String], index: usize) -> String {
    colors
        .get(index)
        .filter(|c| !c.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string())
}

/// Substitute `{time}` and `{time:.N}` placeholders. A bare `{time}` keeps
/// one decimal place on whole values (`12.0`, not `12`).
pub fn format_time_template(template: &str, time: f64) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;
    while let Some(start) = rest.find("{time") {
        out.push_str(&rest[..start]);
        let after = &rest[start + "{time".len()..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let format = &after[..end];
        let rendered = match format {
            "" => Some(format!("{time:?}")),
            _ => format
                .strip_prefix(":.")
                .map(|p| p.trim_end_matches('f'))
                .and_then(|p| p.parse::<usize>().ok())
                .map(|precision| format!("{time:.precision$}")),
        };
        match rendered {
            Some(text) => out.push_str(&text),
            None => out.push_str(&rest[start..start + "{time".len() + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// One run's content in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    /// Legend label
    pub label: String,
    /// Colour of the cluster marker
    pub cluster_color: String,
    /// Colour of the stream particles
    pub stream_color: String,
    /// Cluster centre, kpc
    pub cluster: [f64; 3],
    /// Stream particles present at this time, kpc
    pub particles: Vec<[f64; 3]>,
}

/// Everything drawn at one master-timeline sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Master-timeline sample index
    pub index: usize,
    /// Myr
    pub time: f64,
    /// Rendered title template
    pub title: String,
    /// Runs covering this time; runs outside their time range are absent
    pub streams: Vec<StreamFrame>,
}

/// Serialised form written by [`StreamAnimator::export_json`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationExport {
    /// Presentation settings the frames were built with
    pub config: AnimationConfig,
    /// Axis ranges shared by all frames
    pub limits: AxisLimits,
    /// Master-timeline sample times, Myr
    pub times: Vec<f64>,
    /// One entry per master sample
    pub frames: Vec<Frame>,
}

/// Synchronises several stream runs and lays out their animation frames
#[derive(Debug, Clone)]
pub struct StreamAnimator {
    timeline: MasterTimeline,
    synced: Vec<SyncedRun>,
    config: AnimationConfig,
    limits: AxisLimits,
}

impl StreamAnimator {
    /// Synchronise `runs` onto a shared timeline with default settings
    pub fn new(runs: &[StreamRun]) -> Result<Self, TimelineError> {
        let timeline = MasterTimeline::new(runs)?;
        let synced: Vec<SyncedRun> = runs
            .iter()
            .map(|run| SyncedRun::new(run, &timeline))
            .collect();
        let config = AnimationConfig::default();
        let limits = AxisLimits::enclosing(&synced, config.axis_margin);
        info!(
            "Synchronised {} stream run(s) onto {} frames (dt = {} Myr)",
            synced.len(),
            timeline.len(),
            timeline.dt()
        );
        Ok(Self {
            timeline,
            synced,
            config,
            limits,
        })
    }

    /// Load run files and synchronise them
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, TimelineError> {
        let runs = paths
            .iter()
            .map(StreamRun::from_json_file)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&runs)
    }

    /// Replace the presentation settings; axis limits are refitted to the
    /// new margin unless fixed limits are given
    pub fn configure(mut self, config: AnimationConfig) -> Self {
        self.limits = config
            .limits
            .unwrap_or_else(|| AxisLimits::enclosing(&self.synced, config.axis_margin));
        self.config = config;
        self
    }

    /// Active presentation settings
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Shared timeline of all runs
    pub fn timeline(&self) -> &MasterTimeline {
        &self.timeline
    }

    /// Runs resampled onto the shared timeline
    pub fn synced_runs(&self) -> &[SyncedRun] {
        &self.synced
    }

    /// Axis ranges used for every frame
    pub fn limits(&self) -> AxisLimits {
        self.limits
    }

    /// Number of frames, one per master sample
    pub fn n_frames(&self) -> usize {
        self.timeline.len()
    }

    /// Frame at master sample `index`
    pub fn frame(&self, index: usize) -> Option<Frame> {
        let time = *self.timeline.times().get(index)?;
        let streams = self
            .synced
            .iter()
            .enumerate()
            .filter_map(|(i, run)| {
                let cluster = run.cluster_at(index)?;
                Some(StreamFrame {
                    label: self.config.label(i, &run.label),
                    cluster_color: self.config.cluster_color(i),
                    stream_color: self.config.stream_color(i),
                    cluster,
                    particles: run.stream_at(index),
                })
            })
            .collect();
        Some(Frame {
            index,
            time,
            title: self.config.title(time),
            streams,
        })
    }

    /// Every frame in time order
    pub fn frames(&self) -> Vec<Frame> {
        (0..self.n_frames()).filter_map(|i| self.frame(i)).collect()
    }

    /// Settings, limits and all frames as one document
    pub fn to_export(&self) -> AnimationExport {
        AnimationExport {
            config: self.config.clone(),
            limits: self.limits,
            times: self.timeline.times().to_vec(),
            frames: self.frames(),
        }
    }

    /// Write [`Self::to_export`] as pretty-printed JSON
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), TimelineError> {
        let path = path.as_ref();
        let contents =
            serde_json::to_string_pretty(&self.to_export()).map_err(TimelineError::Serialize)?;
        std::fs::write(path, contents).map_err(|source| TimelineError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {} frames to {}", self.n_frames(), path.display());
        Ok(())
    }
}
