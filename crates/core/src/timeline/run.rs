//! Stream-evolution runs loaded from disk
//!
//! A run file holds the cluster (`nbody`) and stream particle tracks of one
//! simulation, each as a `[3][T][N]` array of positions in kpc:
//!
//! ```json
//! {
//!   "nbody":  { "time": [0.0, 0.5, 1.0], "pos": [[[x0], [x1], [x2]], [[y0], ...], [[z0], ...]] },
//!   "stream": { "pos": [[[...N...], ...T...], [...], [...]] }
//! }
//! ```

use crate::timeline::TimelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Positions of `n_particles` particles at `n_times` samples, stored
/// coordinate-major: `[coord][time][particle]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCube {
    n_times: usize,
    n_particles: usize,
    data: Vec<f64>,
}

impl PositionCube {
    /// Cube of `n_times` × `n_particles` filled with NaN
    pub fn nan(n_times: usize, n_particles: usize) -> Self {
        Self {
            n_times,
            n_particles,
            data: vec![f64::NAN; 3 * n_times * n_particles],
        }
    }

    /// Build from a nested `[3][T][N]` array
    pub fn from_nested(nested: &[Vec<Vec<f64>>]) -> Result<Self, String> {
        if nested.len() != 3 {
            return Err(format!("expected 3 coordinates, found {}", nested.len()));
        }
        let n_times = nested[0].len();
        let n_particles = nested[0].first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(3 * n_times * n_particles);
        for (c, rows) in nested.iter().enumerate() {
            if rows.len() != n_times {
                return Err(format!(
                    "coordinate {c} has {} time samples, expected {n_times}",
                    rows.len()
                ));
            }
            for (t, row) in rows.iter().enumerate() {
                if row.len() != n_particles {
                    return Err(format!(
                        "coordinate {c}, sample {t} has {} particles, expected {n_particles}",
                        row.len()
                    ));
                }
                data.extend_from_slice(row);
            }
        }
        Ok(Self {
            n_times,
            n_particles,
            data,
        })
    }

    /// Number of time samples
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Number of particles per sample
    pub fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// Values of one coordinate at one time, for every particle
    pub fn row(&self, coord: usize, time: usize) -> &[f64] {
        let start = (coord * self.n_times + time) * self.n_particles;
        &self.data[start..start + self.n_particles]
    }

    /// All rows of one coordinate, `[time][particle]` flattened
    pub(crate) fn coord_mut(&mut self, coord: usize) -> &mut [f64] {
        let len = self.n_times * self.n_particles;
        &mut self.data[coord * len..(coord + 1) * len]
    }

    /// Position of one particle at one time
    pub fn point(&self, time: usize, particle: usize) -> [f64; 3] {
        std::array::from_fn(|c| self.row(c, time)[particle])
    }

    /// Every position whose three coordinates are all finite
    pub fn finite_points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        (0..self.n_times)
            .flat_map(move |t| (0..self.n_particles).map(move |p| self.point(t, p)))
            .filter(|point| point.iter().all(|v| v.is_finite()))
    }
}

#[derive(Deserialize)]
struct RunFile {
    nbody: NbodyGroup,
    stream: StreamGroup,
}

#[derive(Deserialize)]
struct NbodyGroup {
    time: Vec<f64>,
    pos: Vec<Vec<Vec<f64>>>,
}

#[derive(Deserialize)]
struct StreamGroup {
    pos: Vec<Vec<Vec<f64>>>,
}

/// One simulation's cluster and stream tracks
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRun {
    /// Legend label
    pub label: String,
    /// Sample times in Myr, strictly increasing
    pub times: Vec<f64>,
    /// Cluster track; particle 0 is the cluster centre
    pub cluster_positions: PositionCube,
    /// Stream particle tracks
    pub stream_positions: PositionCube,
}

impl StreamRun {
    /// Assemble a run, checking that both tracks match the time samples
    pub fn new(
        label: impl Into<String>,
        times: Vec<f64>,
        cluster_positions: PositionCube,
        stream_positions: PositionCube,
    ) -> Result<Self, TimelineError> {
        let label = label.into();
        if times.is_empty() {
            return Err(TimelineError::Shape {
                label,
                detail: "no time samples".to_string(),
            });
        }
        if times.windows(2).any(|w| w[1] <= w[0]) || times.iter().any(|t| !t.is_finite()) {
            return Err(TimelineError::NonMonotonicTimes { label });
        }
        for (name, cube) in [("nbody", &cluster_positions), ("stream", &stream_positions)] {
            if cube.n_times() != times.len() {
                return Err(TimelineError::Shape {
                    label,
                    detail: format!(
                        "{name} positions have {} samples but there are {} times",
                        cube.n_times(),
                        times.len()
                    ),
                });
            }
        }
        if cluster_positions.n_particles() == 0 {
            return Err(TimelineError::Shape {
                label,
                detail: "nbody positions have no particles".to_string(),
            });
        }
        Ok(Self {
            label,
            times,
            cluster_positions,
            stream_positions,
        })
    }

    /// Parse a run from JSON text
    pub fn from_json_str(label: impl Into<String>, json: &str) -> Result<Self, TimelineError> {
        let label = label.into();
        let file: RunFile =
            serde_json::from_str(json).map_err(|source| TimelineError::Parse {
                label: label.clone(),
                source,
            })?;
        let shape_error = |detail| TimelineError::Shape {
            label: label.clone(),
            detail,
        };
        let cluster = PositionCube::from_nested(&file.nbody.pos).map_err(shape_error)?;
        let stream = PositionCube::from_nested(&file.stream.pos).map_err(shape_error)?;
        Self::new(label.clone(), file.nbody.time, cluster, stream)
    }

    /// Load a run file, labelling it from the file name
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TimelineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TimelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(label_from_path(path), &json)
    }

    /// First and last sample time
    pub fn time_span(&self) -> (f64, f64) {
        let first = self.times[0];
        (first, *self.times.last().unwrap_or(&first))
    }

    /// Interval between the first two samples, if there are two
    pub fn first_interval(&self) -> Option<f64> {
        match self.times.as_slice() {
            [t0, t1, ..] => Some((t1 - t0).abs()),
            _ => None,
        }
    }
}

/// Upper-cased file name with the extension and `_stream_evolution` removed:
/// `runs/ngc6569_stream_evolution.json` → `NGC6569`
pub fn label_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.replace(".json", "")
        .replace(".h5", "")
        .replace("_stream_evolution", "")
        .to_uppercase()
}
