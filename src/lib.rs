//! Types and functions for deriving parallel speedup from sets of observed timing measurements,
//! fitting Amdahl's Law models to them, and rendering speedup comparison charts.
//!
//! ```
//! use speedup::{compute_speedups, Measurement, Model};
//!
//! let measurements = vec![
//!     Measurement::workers_and_elapsed_secs(1, 32.83),
//!     Measurement::workers_and_elapsed_secs(2, 15.95),
//!     Measurement::workers_and_elapsed_secs(4, 9.56),
//!     Measurement::workers_and_elapsed_secs(8, 6.31),
//! ];
//! let points = compute_speedups(&measurements).unwrap();
//! let model = Model::build(&points);
//! println!("{}", model.max_speedup());
//! ```
//!

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications,
    missing_copy_implementations,
    missing_debug_implementations,
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::needless_borrow
)]

pub mod chart;

use std::path::PathBuf;
use std::time::Duration;

use approx::relative_eq;
use rmpfit::{MPFitter, MPResult};
use thiserror::Error;

/// A timing measurement of one run of a parallel workload: how many workers ran it and how long
/// the run took.
#[derive(Debug, Copy, Clone)]
pub struct Measurement {
    /// The number of concurrent workers.
    pub workers: u32,
    /// The elapsed wall-clock time of the run, in seconds.
    pub elapsed: f64,
}

impl Measurement {
    /// Create a measurement of a run's elapsed wall-clock time at a given number of workers.
    pub fn workers_and_elapsed(workers: u32, elapsed: Duration) -> Measurement {
        Measurement { workers, elapsed: elapsed.as_secs_f64() }
    }

    /// Create a measurement from an elapsed time already expressed in seconds.
    pub const fn workers_and_elapsed_secs(workers: u32, elapsed: f64) -> Measurement {
        Measurement { workers, elapsed }
    }
}

/// The speedup observed at a given number of workers, relative to the first measurement's run.
#[derive(Debug, Copy, Clone)]
pub struct SpeedupPoint {
    /// The number of concurrent workers.
    pub workers: u32,
    /// The ratio of the baseline elapsed time to this run's elapsed time.
    pub speedup: f64,
}

impl SpeedupPoint {
    /// The parallel efficiency of the run: observed speedup over ideal linear speedup.
    pub fn efficiency(&self) -> f64 {
        self.speedup / f64::from(self.workers)
    }
}

/// The reasons deriving or rendering speedups can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset contains no measurements.
    #[error("dataset contains no measurements")]
    EmptyDataset,

    /// A measurement claims a run with no workers at all.
    #[error("worker count must be positive")]
    ZeroWorkers,

    /// Measurements must be ordered by strictly increasing worker count.
    #[error("worker counts must be strictly increasing: {prev} is followed by {next}")]
    UnorderedWorkers {
        /// The worker count that came first.
        prev: u32,
        /// The out-of-order worker count that followed it.
        next: u32,
    },

    /// A zero elapsed time makes the speedup ratio undefined.
    #[error("elapsed time for {workers} workers is zero, speedup is undefined")]
    ZeroElapsed {
        /// The worker count of the offending measurement.
        workers: u32,
    },

    /// Elapsed times must be positive, finite numbers of seconds.
    #[error("elapsed time for {workers} workers must be positive, got {elapsed}s")]
    InvalidElapsed {
        /// The worker count of the offending measurement.
        workers: u32,
        /// The rejected elapsed time.
        elapsed: f64,
    },

    /// The chart destination could not be written.
    #[error("cannot write chart to {}: {source}", .path.display())]
    Io {
        /// The destination that was rejected.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The chart backend failed while drawing.
    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// Derive per-measurement speedups relative to the first measurement's elapsed time.
///
/// The measurements must be ordered by strictly increasing worker count and every elapsed time
/// must be a positive number of seconds. The output has the same length and order as the input,
/// and the first point's speedup is always exactly 1.0.
pub fn compute_speedups(measurements: &[Measurement]) -> Result<Vec<SpeedupPoint>, Error> {
    let baseline = measurements.first().ok_or(Error::EmptyDataset)?.elapsed;
    let mut prev: Option<u32> = None;
    let mut points = Vec::with_capacity(measurements.len());
    for m in measurements {
        if m.workers == 0 {
            return Err(Error::ZeroWorkers);
        }
        if let Some(prev) = prev {
            if m.workers <= prev {
                return Err(Error::UnorderedWorkers { prev, next: m.workers });
            }
        }
        if m.elapsed == 0.0 {
            return Err(Error::ZeroElapsed { workers: m.workers });
        }
        if m.elapsed < 0.0 || !m.elapsed.is_finite() {
            return Err(Error::InvalidElapsed { workers: m.workers, elapsed: m.elapsed });
        }
        prev = Some(m.workers);
        points.push(SpeedupPoint { workers: m.workers, speedup: baseline / m.elapsed });
    }
    Ok(points)
}

/// An Amdahl's Law model of parallel scaling.
#[derive(Debug, Copy, Clone)]
pub struct Model {
    /// The fraction of the workload that benefits from adding workers, p.
    pub parallel: f64,
}

impl Model {
    /// Build a model whose parameter is generated from the given speedup points.
    ///
    /// Finds the value of p for the equation `s = 1/((1-p) + p/n)` which best fits the observed
    /// speedups using unconstrained least-squares regression. The resulting value for p is the
    /// parameter of the returned model.
    pub fn build(points: &[SpeedupPoint]) -> Model {
        let fitter = ModelFitter(points.to_vec());
        let mut params = vec![0.5];
        let res = fitter.mpfit(&mut params, None, &Default::default());
        assert!(res.is_ok());
        Model { parallel: params[0] }
    }

    /// Calculate the expected speedup at the given number of workers, `S(N)`.
    pub fn speedup_at_workers(&self, n: f64) -> f64 {
        1.0 / ((1.0 - self.parallel) + self.parallel / n)
    }

    /// The fraction of the workload that stays serial no matter how many workers run it.
    pub fn serial_fraction(&self) -> f64 {
        1.0 - self.parallel
    }

    /// The speedup the workload converges to as the worker count grows without bound, `1/(1-p)`.
    ///
    /// Unbounded (infinite) when the workload has no serial fraction.
    pub fn max_speedup(&self) -> f64 {
        1.0 / self.serial_fraction()
    }

    /// Whether the workload parallelizes completely, with no measurable serial fraction.
    pub fn embarrassingly_parallel(&self) -> bool {
        relative_eq!(self.parallel, 1.0, max_relative = 1e-6)
    }
}

struct ModelFitter(Vec<SpeedupPoint>);

impl MPFitter for ModelFitter {
    fn eval(&self, params: &[f64], deviates: &mut [f64]) -> MPResult<()> {
        let model = Model { parallel: params[0] };
        for (d, p) in deviates.iter_mut().zip(self.0.iter()) {
            *d = p.speedup - model.speedup_at_workers(f64::from(p.workers));
        }
        Ok(())
    }

    fn number_of_points(&self) -> usize {
        self.0.len()
    }
}
