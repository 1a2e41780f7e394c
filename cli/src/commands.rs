use crate::args::{Command, IntegratorArg, NemoAction};
use anyhow::{bail, Context, Result};
use gc_stream_core::nemo::SmokeTestOptions;
use gc_stream_core::timeline::DEFAULT_TITLE;
use gc_stream_core::{
    get_potential, integrate_orbit, list_available_potentials, AnimationConfig, ClusterCatalog,
    IntegrationOptions, KilometersPerSecond, Megayears, NemoInstall, PlummerSphere, SolarMasses,
    StreamAnimator,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn dispatch(command: Command, catalog_path: Option<&Path>) -> Result<()> {
    match command {
        Command::Clusters => {
            list_clusters(&load_catalog(catalog_path)?);
            Ok(())
        }
        Command::Cluster { name, json } => show_cluster(&load_catalog(catalog_path)?, &name, json),
        Command::Convert { velocity, mass } => convert(velocity, mass),
        Command::Potentials => {
            list_potentials();
            Ok(())
        }
        Command::Orbit {
            cluster,
            potential,
            dt,
            steps,
            integrator,
            backward,
            out,
        } => orbit(
            &load_catalog(catalog_path)?,
            &cluster,
            &potential,
            if backward { -dt } else { dt },
            steps,
            integrator,
            out.as_deref(),
        ),
        Command::Nemo { action } => nemo(action),
        Command::Plummer {
            cluster,
            nbody,
            seed,
            galactocentric,
            out,
        } => plummer(
            &load_catalog(catalog_path)?,
            &cluster,
            nbody,
            seed,
            galactocentric,
            &out,
        ),
        Command::Timeline {
            files,
            out,
            fps,
            margin,
            title,
            labels,
        } => timeline(&files, &out, fps, margin, title, labels),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<ClusterCatalog> {
    match path {
        Some(path) => ClusterCatalog::from_json_file(path)
            .with_context(|| format!("failed to load cluster catalog {}", path.display())),
        None => Ok(ClusterCatalog::builtin()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    debug!("Writing {} bytes to {}", contents.len(), path.display());
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn list_clusters(catalog: &ClusterCatalog) {
    println!("Available clusters:");
    for (id, name) in catalog.list() {
        println!("  {id:<16} {name}");
    }
}

fn show_cluster(catalog: &ClusterCatalog, name: &str, json: bool) -> Result<()> {
    let cluster = catalog.cluster(name)?;
    let record = cluster.record();
    let nemo = record.to_nemo_units();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "record": record,
                "nemo": nemo,
            }))?
        );
        return Ok(());
    }

    println!("{cluster}");
    println!();
    println!("{}", cluster.info());
    println!();
    println!("{record}");
    println!();
    println!("{nemo}");
    Ok(())
}

fn convert(velocity: Option<f64>, mass: Option<f64>) -> Result<()> {
    print!("{}", conversion_report(velocity, mass)?);
    Ok(())
}

/// One `input -> converted` line per requested quantity
fn conversion_report(velocity: Option<f64>, mass: Option<f64>) -> Result<String> {
    if velocity.is_none() && mass.is_none() {
        bail!("nothing to convert: pass --velocity and/or --mass");
    }
    let mut report = String::new();
    if let Some(v) = velocity {
        let v = KilometersPerSecond::new(v);
        writeln!(report, "{} -> {}", v, v.to_kpc_per_myr())?;
    }
    if let Some(m) = mass {
        let m = SolarMasses::try_new(m).context("invalid mass")?;
        writeln!(report, "{} -> {}", m, m.to_nemo_mass())?;
    }
    Ok(report)
}

fn list_potentials() {
    println!("Available potentials:");
    for preset in list_available_potentials() {
        let frame = if preset.rotating { "rotating" } else { "static" };
        println!("  {:<20} {} ({frame})", preset.id, preset.description);
        println!("  {:<20} source: {}", "", preset.source);
    }
}

fn orbit(
    catalog: &ClusterCatalog,
    cluster: &str,
    potential: &str,
    dt: f64,
    steps: usize,
    integrator: IntegratorArg,
    out: Option<&Path>,
) -> Result<()> {
    let cluster = catalog.cluster(cluster)?;
    let hamiltonian = get_potential(potential)?;
    let options = IntegrationOptions {
        dt: Megayears::new(dt),
        n_steps: steps,
        integrator: integrator.into(),
        ..IntegrationOptions::default()
    };
    info!(
        "Integrating {} in {} for {} steps of {} Myr",
        cluster.name(),
        potential,
        steps,
        dt
    );

    let orbit = integrate_orbit(&hamiltonian, &cluster.galactocentric(), &options)
        .with_context(|| format!("failed to integrate orbit of {}", cluster.name()))?;

    let energy = orbit.energy(&hamiltonian);
    let drift = match (energy.first(), energy.last()) {
        (Some(e0), Some(e1)) if *e0 != 0.0 => ((e1 - e0) / e0).abs(),
        _ => 0.0,
    };

    println!("Orbit of {} in {}", cluster.name(), potential);
    println!("  samples:     {}", orbit.len());
    if let (Some(peri), Some(apo), Some(zmax)) =
        (orbit.pericenter(), orbit.apocenter(), orbit.zmax())
    {
        println!("  pericenter:  {peri}");
        println!("  apocenter:   {apo}");
        println!("  z_max:       {zmax}");
    }
    println!("  energy drift: {drift:.2e}");
    if let Some(last) = orbit.last() {
        let [x, y, z] = last.position();
        println!("  final position: ({x}, {y}, {z})");
    }

    if let Some(path) = out {
        write_json(path, &orbit)?;
    }
    Ok(())
}

fn nemo(action: NemoAction) -> Result<()> {
    let install = NemoInstall::from_env()?;
    match action {
        NemoAction::Which { tool } => {
            println!("{}", install.binary(&tool).display());
        }
        NemoAction::Read {
            file,
            timestep,
            out,
        } => {
            let snapshot = install
                .read_snapshot(&file, timestep)
                .with_context(|| format!("failed to read {}", file.display()))?;
            println!(
                "NemoData(particles={}, time={:?})",
                snapshot.particle_count, snapshot.time
            );
            let com = snapshot.center_of_mass();
            println!("  total mass:      {:.6}", snapshot.total_mass());
            println!(
                "  centre of mass:  ({:.4}, {:.4}, {:.4})",
                com.pos.x, com.pos.y, com.pos.z
            );
            if let Some(path) = out {
                write_json(&path, &snapshot)?;
            }
        }
        NemoAction::SmokeTest { dir, nbody, seed } => {
            let options = SmokeTestOptions {
                nbody,
                seed,
                ..SmokeTestOptions::default()
            };
            let report = install
                .smoke_test(&dir, &options)
                .context("NEMO smoke test failed")?;
            println!("{report}");
        }
    }
    Ok(())
}

fn plummer(
    catalog: &ClusterCatalog,
    cluster: &str,
    nbody: usize,
    seed: u64,
    galactocentric: bool,
    out: &Path,
) -> Result<()> {
    let cluster = catalog.cluster(cluster)?;
    let sphere = PlummerSphere::from_cluster(&cluster)?;
    let mut snapshot = sphere.sample(nbody, seed)?;
    if galactocentric {
        snapshot = snapshot.translated(&cluster.galactocentric());
    }
    println!(
        "Sampled {} particles for {} (M = {}, a = {}, r_half = {})",
        snapshot.particle_count,
        cluster.name(),
        sphere.mass(),
        sphere.scale_radius(),
        sphere.half_mass_radius()
    );
    write_json(out, &snapshot)
}

fn timeline(
    files: &[PathBuf],
    out: &Path,
    fps: u32,
    margin: f64,
    title: Option<String>,
    labels: Vec<String>,
) -> Result<()> {
    let defaults = AnimationConfig::default();
    let config = AnimationConfig {
        fps,
        interval_ms: u64::from(1000 / fps.max(1)),
        axis_margin: margin,
        title_template: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        cluster_labels: labels,
        ..defaults
    };
    let animator = StreamAnimator::from_files(files)
        .context("failed to load stream runs")?
        .configure(config);

    let limits = animator.limits();
    println!(
        "{} run(s), {} frames, dt = {} Myr",
        animator.synced_runs().len(),
        animator.n_frames(),
        animator.timeline().dt()
    );
    println!(
        "  limits: x {:?}, y {:?}, z {:?} kpc",
        limits.x, limits.y, limits.z
    );
    animator.export_json(out)?;
    println!("Wrote {}", out.display());
    Ok(())
}
