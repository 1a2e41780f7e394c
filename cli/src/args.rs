use clap::{Parser, Subcommand, ValueEnum};
use gc_stream_core::Integrator;
use std::path::PathBuf;

/// Globular cluster stream toolkit
#[derive(Parser, Debug)]
#[command(name = "gc-stream")]
#[command(about = "Cluster catalogs, orbits, NEMO snapshots and stream timelines", long_about = None)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra cluster catalog (JSON) merged over the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available clusters
    Clusters,

    /// Show a cluster's observables, Galactocentric state and NEMO-unit record
    Cluster {
        /// Cluster id, e.g. ngc6569 or pal5
        name: String,

        /// Print the records as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Convert a velocity and/or mass to NEMO units
    Convert {
        /// Velocity in km/s
        #[arg(long, allow_hyphen_values = true)]
        velocity: Option<f64>,

        /// Mass in solar masses
        #[arg(long)]
        mass: Option<f64>,
    },

    /// List available potentials
    Potentials,

    /// Integrate a cluster's orbit
    Orbit {
        /// Cluster id
        cluster: String,

        /// Potential preset
        #[arg(short, long, default_value = "milky_way_composite")]
        potential: String,

        /// Timestep in Myr
        #[arg(long, default_value_t = 0.5)]
        dt: f64,

        /// Number of steps
        #[arg(short = 'n', long, default_value_t = 2000)]
        steps: usize,

        /// Integration scheme
        #[arg(short, long, value_enum, default_value_t = IntegratorArg::Leapfrog)]
        integrator: IntegratorArg,

        /// Integrate backwards in time
        #[arg(short, long)]
        backward: bool,

        /// Write the sampled orbit as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Work with a NEMO installation ($NEMO_PATH)
    Nemo {
        #[command(subcommand)]
        action: NemoAction,
    },

    /// Sample Plummer-sphere initial conditions for a cluster
    Plummer {
        /// Cluster id
        cluster: String,

        /// Number of particles
        #[arg(short = 'n', long, default_value_t = 1000)]
        nbody: usize,

        /// Random seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Place the sphere at the cluster's Galactocentric position and velocity
        #[arg(short, long)]
        galactocentric: bool,

        /// Output JSON file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Synchronise stream-evolution runs and export animation frames
    Timeline {
        /// Run files (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output JSON file
        #[arg(short, long)]
        out: PathBuf,

        /// Frames per second
        #[arg(long, default_value_t = 10)]
        fps: u32,

        /// Axis margin in kpc
        #[arg(long, default_value_t = 1.0)]
        margin: f64,

        /// Title template; {time:.1} is replaced by the frame time
        #[arg(long)]
        title: Option<String>,

        /// Legend labels, one per run
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NemoAction {
    /// Print the path of a NEMO tool
    Which {
        /// Tool name, e.g. tsf
        tool: String,
    },

    /// Read a snapshot through tsf
    Read {
        /// NEMO snapshot file
        file: PathBuf,

        /// Snapshot index within the file
        #[arg(short, long, default_value_t = 0)]
        timestep: usize,

        /// Write the particles as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run mkplummer and gyrfalcON to check the installation
    SmokeTest {
        /// Working directory for the generated snapshots
        #[arg(default_value = "nemo-smoke-test")]
        dir: PathBuf,

        #[arg(long, default_value_t = 1000)]
        nbody: usize,

        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegratorArg {
    Leapfrog,
    Rk4,
}

impl From<IntegratorArg> for Integrator {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Leapfrog => Integrator::Leapfrog,
            IntegratorArg::Rk4 => Integrator::RungeKutta4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_orbit() {
        let cli = Cli::try_parse_from([
            "gc-stream", "orbit", "pal5", "--potential", "milky_way_barred", "-i", "rk4", "-b",
        ])
        .unwrap();
        match cli.command {
            Command::Orbit {
                cluster,
                potential,
                integrator,
                backward,
                steps,
                ..
            } => {
                assert_eq!(cluster, "pal5");
                assert_eq!(potential, "milky_way_barred");
                assert_eq!(integrator, IntegratorArg::Rk4);
                assert!(backward);
                assert_eq!(steps, 2000);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_velocity() {
        let cli = Cli::try_parse_from(["gc-stream", "convert", "--velocity", "-49.82"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Convert {
                velocity: Some(v),
                mass: None
            } if v == -49.82
        ));
    }

    #[test]
    fn test_timeline_requires_files() {
        assert!(Cli::try_parse_from(["gc-stream", "timeline", "--out", "frames.json"]).is_err());
    }
}
