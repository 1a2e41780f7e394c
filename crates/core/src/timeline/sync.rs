//! Resampling runs with different time grids onto one shared timeline

use crate::timeline::{PositionCube, StreamRun, TimelineError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Step used when no run has two samples
pub const DEFAULT_TIMESTEP: f64 = 0.5;

/// Evenly spaced times covering every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterTimeline {
    times: Vec<f64>,
    dt: f64,
}

impl MasterTimeline {
    /// Span the earliest to latest time of all runs with the finest
    /// first-sample interval among them.
    ///
    /// `n = floor((latest - earliest) / dt) + 1` samples are placed evenly
    /// from `earliest` to `latest` inclusive.
    pub fn new(runs: &[StreamRun]) -> Result<Self, TimelineError> {
        if runs.is_empty() {
            return Err(TimelineError::NoRuns);
        }
        let earliest = runs
            .iter()
            .map(|r| r.time_span().0)
            .fold(f64::INFINITY, f64::min);
        let latest = runs
            .iter()
            .map(|r| r.time_span().1)
            .fold(f64::NEG_INFINITY, f64::max);
        let dt = runs
            .iter()
            .filter_map(StreamRun::first_interval)
            .filter(|dt| *dt > 0.0)
            .reduce(f64::min)
            .unwrap_or(DEFAULT_TIMESTEP);

        let n = ((latest - earliest) / dt).floor() as usize + 1;
        Ok(Self {
            times: linspace(earliest, latest, n),
            dt,
        })
    }

    /// Sample times in Myr, ascending
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the timeline has no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Step the timeline was derived from
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Index range of master samples that a run spanning `[start, end]`
    /// covers: from the first sample at or after `start` through the first
    /// sample at or after `end`
    pub fn overlap(&self, start: f64, end: f64) -> std::ops::Range<usize> {
        let first = self.times.partition_point(|t| *t < start);
        let last = (self.times.partition_point(|t| *t < end) + 1).min(self.times.len());
        first..last.max(first)
    }

    /// Resample `positions`, sampled at `times`, onto the master timeline.
    ///
    /// Samples inside the overlap are linearly interpolated (clamped at the
    /// run's ends); samples outside it are NaN.
    pub fn resample(&self, times: &[f64], positions: &PositionCube) -> PositionCube {
        let n_particles = positions.n_particles();
        let mut synced = PositionCube::nan(self.len(), n_particles);
        if times.is_empty() || n_particles == 0 {
            return synced;
        }
        let overlap = self.overlap(times[0], times[times.len() - 1]);
        let weights: Vec<(usize, usize, f64)> = self.times[overlap.clone()]
            .iter()
            .map(|&t| bracket(times, t))
            .collect();

        for coord in 0..3 {
            synced.coord_mut(coord)[overlap.start * n_particles..overlap.end * n_particles]
                .par_chunks_mut(n_particles)
                .zip(weights.par_iter())
                .for_each(|(row, &(lo, hi, w))| {
                    let below = positions.row(coord, lo);
                    let above = positions.row(coord, hi);
                    for ((out, a), b) in row.iter_mut().zip(below).zip(above) {
                        *out = a + (b - a) * w;
                    }
                });
        }
        synced
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Sample indices bracketing `t` and the weight of the upper one; `t`
/// outside the samples clamps to the nearest end
fn bracket(times: &[f64], t: f64) -> (usize, usize, f64) {
    let last = times.len() - 1;
    if t <= times[0] {
        return (0, 0, 0.0);
    }
    if t >= times[last] {
        return (last, last, 0.0);
    }
    let hi = times.partition_point(|s| *s <= t);
    let lo = hi - 1;
    let w = (t - times[lo]) / (times[hi] - times[lo]);
    (lo, hi, w)
}

/// A run resampled onto the master timeline
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedRun {
    /// Label of the source run
    pub label: String,
    /// Cluster centre per master sample; NaN outside the run's time range
    pub cluster_positions: PositionCube,
    /// Stream particles per master sample; NaN outside the run's time range
    pub stream_positions: PositionCube,
}

impl SyncedRun {
    /// Resample `run` onto `timeline`
    pub fn new(run: &StreamRun, timeline: &MasterTimeline) -> Self {
        debug!(
            "Synchronising {} ({} samples, {} stream particles) onto {} master samples",
            run.label,
            run.times.len(),
            run.stream_positions.n_particles(),
            timeline.len()
        );
        Self {
            label: run.label.clone(),
            cluster_positions: timeline.resample(&run.times, &run.cluster_positions),
            stream_positions: timeline.resample(&run.times, &run.stream_positions),
        }
    }

    /// Cluster centre at master sample `frame`, if the run covers it
    pub fn cluster_at(&self, frame: usize) -> Option<[f64; 3]> {
        let point = self.cluster_positions.point(frame, 0);
        point.iter().all(|v| v.is_finite()).then_some(point)
    }

    /// Stream particles with finite positions at master sample `frame`
    pub fn stream_at(&self, frame: usize) -> Vec<[f64; 3]> {
        (0..self.stream_positions.n_particles())
            .map(|p| self.stream_positions.point(frame, p))
            .filter(|point| point.iter().all(|v| v.is_finite()))
            .collect()
    }
}

/// Axis ranges enclosing every synchronised position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    /// `[min, max]` along x, kpc
    pub x: [f64; 2],
    /// `[min, max]` along y, kpc
    pub y: [f64; 2],
    /// `[min, max]` along z, kpc
    pub z: [f64; 2],
}

impl AxisLimits {
    /// Range used when there is nothing finite to enclose
    pub const FALLBACK: Self = Self {
        x: [-10.0, 10.0],
        y: [-10.0, 10.0],
        z: [-10.0, 10.0],
    };

    /// Min/max over all finite cluster and stream positions, widened by
    /// `margin` on each side
    pub fn enclosing(runs: &[SyncedRun], margin: f64) -> Self {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        let mut any = false;
        for run in runs {
            for point in run
                .cluster_positions
                .finite_points()
                .chain(run.stream_positions.finite_points())
            {
                any = true;
                for c in 0..3 {
                    lo[c] = lo[c].min(point[c]);
                    hi[c] = hi[c].max(point[c]);
                }
            }
        }
        if !any {
            return Self::FALLBACK;
        }
        Self {
            x: [lo[0] - margin, hi[0] + margin],
            y: [lo[1] - margin, hi[1] + margin],
            z: [lo[2] - margin, hi[2] + margin],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line_run(label: &str, times: Vec<f64>) -> StreamRun {
        // cluster moves along x at 1 kpc per Myr; one stream particle trails by 1 kpc
        let xs: Vec<Vec<f64>> = times.iter().map(|t| vec![*t]).collect();
        let trail: Vec<Vec<f64>> = times.iter().map(|t| vec![t - 1.0]).collect();
        let zeros: Vec<Vec<f64>> = times.iter().map(|_| vec![0.0]).collect();
        StreamRun::new(
            label,
            times,
            PositionCube::from_nested(&[xs, zeros.clone(), zeros.clone()]).unwrap(),
            PositionCube::from_nested(&[trail, zeros.clone(), zeros]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_master_timeline_uses_finest_step() {
        let runs = [
            line_run("A", vec![0.0, 1.0, 2.0, 3.0, 4.0]),
            line_run("B", vec![1.0, 1.5, 2.0]),
        ];
        let timeline = MasterTimeline::new(&runs).unwrap();
        assert_eq!(timeline.dt(), 0.5);
        assert_eq!(timeline.len(), 9);
        assert_eq!(timeline.times()[0], 0.0);
        assert_eq!(timeline.times()[8], 4.0);
    }

    #[test]
    fn test_single_sample_runs_use_default_step() {
        let runs = [line_run("A", vec![2.0])];
        let timeline = MasterTimeline::new(&runs).unwrap();
        assert_eq!(timeline.dt(), DEFAULT_TIMESTEP);
        assert_eq!(timeline.times(), &[2.0]);
    }

    #[test]
    fn test_non_divisible_span_is_spread_evenly() {
        let runs = [line_run("A", vec![0.0, 0.4, 1.0])];
        let timeline = MasterTimeline::new(&runs).unwrap();
        // floor(1.0 / 0.4) + 1 = 3 samples over [0, 1]
        assert_eq!(timeline.times(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_no_runs() {
        assert!(matches!(MasterTimeline::new(&[]), Err(TimelineError::NoRuns)));
    }

    #[test]
    fn test_resample_interpolates_inside_and_nan_outside() {
        let runs = [
            line_run("A", vec![0.0, 1.0, 2.0, 3.0, 4.0]),
            line_run("B", vec![1.0, 1.5, 2.0]),
        ];
        let timeline = MasterTimeline::new(&runs).unwrap();
        let a = SyncedRun::new(&runs[0], &timeline);
        let b = SyncedRun::new(&runs[1], &timeline);

        // A has samples every 1 Myr; master sample 3 is t = 1.5
        assert_relative_eq!(a.cluster_at(3).unwrap()[0], 1.5);
        assert_relative_eq!(a.stream_at(3)[0][0], 0.5);

        assert!(b.cluster_at(1).is_none());
        assert!(b.stream_at(1).is_empty());
        assert_relative_eq!(b.cluster_at(2).unwrap()[0], 1.0);
        assert_relative_eq!(b.cluster_at(4).unwrap()[0], 2.0);
        assert!(b.cluster_at(5).is_none());
    }

    #[test]
    fn test_overlap_includes_first_sample_past_end() {
        let runs = [line_run("A", vec![0.0, 0.5, 1.0, 1.5, 2.0])];
        let timeline = MasterTimeline::new(&runs).unwrap();
        assert_eq!(timeline.overlap(0.5, 1.2), 1..4);
        assert_eq!(timeline.overlap(0.0, 2.0), 0..5);
        assert_eq!(timeline.overlap(5.0, 6.0), 5..5);
    }

    #[test]
    fn test_resample_clamps_past_run_end() {
        let runs = [
            line_run("A", vec![0.0, 0.5, 1.0, 1.5, 2.0]),
            line_run("B", vec![0.0, 1.2]),
        ];
        let timeline = MasterTimeline::new(&runs).unwrap();
        let b = SyncedRun::new(&runs[1], &timeline);
        // master t = 1.5 is the first sample past B's end and holds B's last value
        assert_relative_eq!(b.cluster_at(3).unwrap()[0], 1.2);
        assert!(b.cluster_at(4).is_none());
    }

    #[test]
    fn test_axis_limits_with_margin() {
        let runs = [line_run("A", vec![0.0, 1.0, 2.0])];
        let timeline = MasterTimeline::new(&runs).unwrap();
        let synced = [SyncedRun::new(&runs[0], &timeline)];
        let limits = AxisLimits::enclosing(&synced, 1.0);
        assert_eq!(limits.x, [-2.0, 3.0]);
        assert_eq!(limits.y, [-1.0, 1.0]);
        assert_eq!(limits.z, [-1.0, 1.0]);
    }

    #[test]
    fn test_axis_limits_fallback() {
        assert_eq!(AxisLimits::enclosing(&[], 1.0), AxisLimits::FALLBACK);
    }

    #[test]
    fn test_bracket() {
        let times = [0.0, 1.0, 3.0];
        assert_eq!(bracket(&times, -1.0), (0, 0, 0.0));
        assert_eq!(bracket(&times, 2.0), (1, 2, 0.5));
        assert_eq!(bracket(&times, 1.0), (1, 2, 0.0));
        assert_eq!(bracket(&times, 3.5), (2, 2, 0.0));
    }
}
