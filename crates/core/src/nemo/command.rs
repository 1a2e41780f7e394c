//! Locating and running NEMO command-line tools
//!
//! Every NEMO program takes `key=value` parameters, e.g.
//!
//! ```text
//! mkplummer out=plummer.snap nbody=1000 seed=1
//! gyrfalcON in=plummer.snap out=evolved.snap tstop=1 step=0.5 eps=0.05 kmax=6
//! ```

use crate::nemo::{tsf, NemoError, NemoSnapshot};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Environment variable holding the NEMO installation directory
pub const NEMO_PATH_VAR: &str = "NEMO_PATH";

/// A NEMO installation rooted at `$NEMO_PATH`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NemoInstall {
    root: PathBuf,
}

impl NemoInstall {
    /// Installation rooted at an explicit directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Installation named by the `NEMO_PATH` environment variable
    pub fn from_env() -> Result<Self, NemoError> {
        std::env::var_os(NEMO_PATH_VAR)
            .filter(|root| !root.is_empty())
            .map(Self::new)
            .ok_or(NemoError::NemoPathUnset)
    }

    /// Installation directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a tool binary: `<root>/bin/<tool>`
    pub fn binary(&self, tool: &str) -> PathBuf {
        self.root.join("bin").join(tool)
    }

    /// Start building an invocation of `tool`
    pub fn command(&self, tool: &str) -> NemoCommand {
        NemoCommand::new(tool, self.binary(tool))
    }

    /// Text listing of a binary NEMO file with every array printed in full
    pub fn tsf(&self, file: &Path) -> Result<String, NemoError> {
        self.command("tsf")
            .input(file)
            .arg("allline", "true")
            .run()
    }

    /// Particle data of snapshot `timestep` in `file`
    pub fn read_snapshot(&self, file: &Path, timestep: usize) -> Result<NemoSnapshot, NemoError> {
        let listing = self.tsf(file)?;
        let snapshot = tsf::parse_snapshot(&listing, timestep)?;
        info!(
            "Read {} particles from {} (timestep {}, t = {:?})",
            snapshot.particle_count,
            file.display(),
            timestep,
            snapshot.time
        );
        Ok(snapshot)
    }

    /// Create a Plummer sphere with `mkplummer`, evolve it with `gyrfalcON`
    /// and read the result back through `tsf`.
    ///
    /// Outputs from an earlier run in `dir` are removed first, since NEMO
    /// tools refuse to overwrite existing files.
    pub fn smoke_test(
        &self,
        dir: &Path,
        options: &SmokeTestOptions,
    ) -> Result<SmokeTestReport, NemoError> {
        std::fs::create_dir_all(dir).map_err(|source| NemoError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let initial = dir.join("plummer.snap");
        let evolved = dir.join("plummer_evolved.snap");
        for stale in [&initial, &evolved] {
            if stale.exists() {
                std::fs::remove_file(stale).map_err(|source| NemoError::Io {
                    path: stale.clone(),
                    source,
                })?;
            }
        }

        let mkplummer = self
            .command("mkplummer")
            .arg("out", initial.display())
            .arg("nbody", options.nbody)
            .arg("seed", options.seed);
        let gyrfalcon = self
            .command("gyrfalcON")
            .arg("in", initial.display())
            .arg("out", evolved.display())
            .arg("tstop", options.tstop)
            .arg("step", options.step)
            .arg("eps", options.eps)
            .arg("kmax", options.kmax);

        let mut commands = Vec::with_capacity(2);
        for (command, output) in [(mkplummer, &initial), (gyrfalcon, &evolved)] {
            info!("Running {}", command);
            command.run()?;
            if !output.exists() {
                return Err(NemoError::MissingOutput {
                    tool: command.tool().to_string(),
                    path: output.clone(),
                });
            }
            commands.push(command.to_string());
        }

        let listing = self.tsf(&evolved)?;
        let snapshots = tsf::parse_tsf(&listing)
            .iter()
            .map(tsf::TsfSnapshot::to_snapshot)
            .collect::<Result<Vec<_>, _>>()?;
        if snapshots.is_empty() {
            return Err(NemoError::NoSnapshots);
        }

        Ok(SmokeTestReport {
            commands,
            initial,
            evolved,
            snapshot_times: snapshots.iter().map(|s| s.time).collect(),
            particle_count: snapshots[0].particle_count,
        })
    }
}

/// Parameters of the install smoke test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokeTestOptions {
    /// Number of particles in the mkplummer model
    pub nbody: usize,
    /// Random seed passed to mkplummer
    pub seed: u64,
    /// End time of the gyrfalcON run
    pub tstop: f64,
    /// Output interval
    pub step: f64,
    /// Softening length
    pub eps: f64,
    /// Timestep is 2^-kmax
    pub kmax: u32,
}

impl Default for SmokeTestOptions {
    fn default() -> Self {
        Self {
            nbody: 1000,
            seed: 1,
            tstop: 1.0,
            step: 0.5,
            eps: 0.05,
            kmax: 6,
        }
    }
}

/// What the smoke test ran and produced
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeTestReport {
    /// Command lines in execution order
    pub commands: Vec<String>,
    /// Snapshot written by mkplummer
    pub initial: PathBuf,
    /// Snapshot series written by gyrfalcON
    pub evolved: PathBuf,
    /// Time of every snapshot in the evolved file
    pub snapshot_times: Vec<Option<f64>>,
    /// Particles in the last evolved snapshot
    pub particle_count: usize,
}

impl fmt::Display for SmokeTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            writeln!(f, "$ {command}")?;
        }
        writeln!(f, "initial: {}", self.initial.display())?;
        writeln!(f, "evolved: {}", self.evolved.display())?;
        write!(
            f,
            "{} snapshot(s) of {} particles",
            self.snapshot_times.len(),
            self.particle_count
        )
    }
}

/// Builder for a single NEMO tool invocation.
///
/// Positional inputs come first, then `key=value` parameters in the order
/// they were added.
#[derive(Debug, Clone)]
pub struct NemoCommand {
    tool: String,
    binary: PathBuf,
    inputs: Vec<OsString>,
    params: Vec<(String, String)>,
}

impl NemoCommand {
    /// Invocation of `binary`, reported as `tool`
    pub fn new(tool: impl Into<String>, binary: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            binary: binary.into(),
            inputs: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add a positional argument
    pub fn input(mut self, value: impl Into<OsString>) -> Self {
        self.inputs.push(value.into());
        self
    }

    /// Add a `key=value` parameter
    pub fn arg(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Tool name used in error messages
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Executable that will be run
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Parameters in insertion order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The process to spawn
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.inputs);
        for (key, value) in &self.params {
            cmd.arg(format!("{key}={value}"));
        }
        cmd
    }

    /// Run to completion and return stdout
    pub fn run(&self) -> Result<String, NemoError> {
        debug!("Spawning {}", self.binary.display());
        let output = self
            .to_command()
            .output()
            .map_err(|source| NemoError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(NemoError::ToolFailed {
                tool: self.tool.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl fmt::Display for NemoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tool)?;
        for input in &self.inputs {
            write!(f, " {}", input.to_string_lossy())?;
        }
        for (key, value) in &self.params {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Path of a tool binary under `$NEMO_PATH/bin`
pub fn nemo_binary_path(tool: &str) -> Result<PathBuf, NemoError> {
    Ok(NemoInstall::from_env()?.binary(tool))
}

/// Read snapshot `timestep` of a NEMO file using the `$NEMO_PATH` install
pub fn read_nemo(path: impl AsRef<Path>, timestep: usize) -> Result<NemoSnapshot, NemoError> {
    NemoInstall::from_env()?.read_snapshot(path.as_ref(), timestep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_lives_under_bin() {
        let nemo = NemoInstall::new("/opt/nemo");
        assert_eq!(nemo.binary("tsf"), PathBuf::from("/opt/nemo/bin/tsf"));
        assert_eq!(nemo.root(), Path::new("/opt/nemo"));
    }

    #[test]
    fn test_command_line_rendering() {
        let cmd = NemoInstall::new("/opt/nemo")
            .command("gyrfalcON")
            .arg("in", "plummer.snap")
            .arg("out", "evolved.snap")
            .arg("tstop", 1.0)
            .arg("step", 0.5)
            .arg("eps", 0.05)
            .arg("kmax", 6);
        assert_eq!(
            cmd.to_string(),
            "gyrfalcON in=plummer.snap out=evolved.snap tstop=1 step=0.5 eps=0.05 kmax=6"
        );
        assert_eq!(cmd.binary(), Path::new("/opt/nemo/bin/gyrfalcON"));
        assert_eq!(cmd.params()[3], ("step".to_string(), "0.5".to_string()));
    }

    #[test]
    fn test_positional_inputs_precede_params() {
        let cmd = NemoCommand::new("tsf", "/opt/nemo/bin/tsf")
            .arg("allline", "true")
            .input("run.snap");
        assert_eq!(cmd.to_string(), "tsf run.snap allline=true");
        let args: Vec<_> = cmd.to_command().get_args().map(|a| a.to_os_string()).collect();
        assert_eq!(args, vec![OsString::from("run.snap"), OsString::from("allline=true")]);
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let cmd = NemoInstall::new("/nonexistent/nemo").command("mkplummer");
        assert!(matches!(cmd.run(), Err(NemoError::Spawn { tool, .. }) if tool == "mkplummer"));
    }

    #[test]
    fn test_smoke_test_defaults() {
        let options = SmokeTestOptions::default();
        assert_eq!(options.nbody, 1000);
        assert_eq!(options.seed, 1);
        assert_eq!(options.kmax, 6);
        assert_eq!(options.eps, 0.05);
    }
}
