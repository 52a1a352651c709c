//! Job runner: builds the physics model and boundaries, registers both
//! assembly passes and probes the registered sources.

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use num_complex::Complex64;
use serde::Serialize;

use fresnel_core::assembly::{BoundarySample, LinearFormCollector};
use fresnel_core::boundary::{add_lf_contributions, BoundaryCondition, SurfaceCurrent};
use fresnel_core::field::Symbol;
use fresnel_core::physics::{FrequencySource, PhysicsModel};
use fresnel_core::scaling::Pass;

use crate::config::{BoundaryConfig, ConstantValue, JobConfig, PhysicsConfig};

/// Field index the surface current sources are assembled into.
const E_FIELD: usize = 0;

/// Probed real and imaginary sources at every probe point.
pub struct ProbeOutput {
    pub samples: Vec<BoundarySample>,
    pub real: Array2<f64>,
    pub imag: Array2<f64>,
    pub registrations: usize,
}

/// One probe row, as written to JSON.
#[derive(Debug, Serialize)]
pub struct ProbeRecord {
    pub attribute: usize,
    pub position: [f64; 3],
    pub real: [f64; 3],
    pub imag: [f64; 3],
}

impl ProbeOutput {
    pub fn records(&self) -> Vec<ProbeRecord> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| ProbeRecord {
                attribute: s.attribute,
                position: s.position,
                real: [self.real[[i, 0]], self.real[[i, 1]], self.real[[i, 2]]],
                imag: [self.imag[[i, 0]], self.imag[[i, 1]], self.imag[[i, 2]]],
            })
            .collect()
    }
}

/// Build the physics model (frequency and namespace) from the job.
pub fn build_physics(cfg: &PhysicsConfig) -> Result<PhysicsModel> {
    let mut model = PhysicsModel::default().with_ind_vars(cfg.ind_vars.iter().cloned());
    for (name, value) in &cfg.constants {
        let v = match *value {
            ConstantValue::Real(re) => Complex64::from(re),
            ConstantValue::Complex([re, im]) => Complex64::new(re, im),
        };
        model = model.with_symbol(name.clone(), Symbol::Value(v));
    }

    match cfg.frequency {
        Some(f) => model
            .with_frequency(f)
            .with_context(|| format!("Invalid frequency {f}")),
        None => Ok(model),
    }
}

/// Resolve every boundary of the job against the model's environment.
pub fn build_boundaries(job: &JobConfig, physics: &PhysicsModel) -> Result<Vec<Box<dyn BoundaryCondition>>> {
    let mut boundaries: Vec<Box<dyn BoundaryCondition>> = Vec::with_capacity(job.boundary.len());
    for bc in &job.boundary {
        match bc {
            BoundaryConfig::SurfaceCurrent(cfg) => {
                let sj = SurfaceCurrent::from_entries(cfg.selection.clone(), cfg.surf_j.clone(), physics.environment())
                    .with_context(|| format!("Boundary '{}'", cfg.name))?
                    .with_mu_r(cfg.mu_r);
                log::info!("Boundary '{}': {} on {:?}", cfg.name, SurfaceCurrent::LABEL, cfg.selection);
                boundaries.push(Box::new(sj));
            }
        }
    }
    Ok(boundaries)
}

/// Register all boundaries for both passes and probe the result.
pub fn run_job(job: &JobConfig) -> Result<ProbeOutput> {
    let physics = build_physics(&job.physics)?;
    let boundaries = build_boundaries(job, &physics)?;

    if let Some(ctx) = physics.frequency() {
        let (f, omega) = ctx.freq_omega();
        println!("Frequency: {:.6e} Hz (ω = {:.6e} rad/s)", f, omega);
    }

    let mut target = LinearFormCollector::new();
    let registrations = add_lf_contributions(&boundaries, &physics, &mut target, E_FIELD)
        .context("Failed to register boundary contributions")?;
    println!(
        "Registered {} linear forms from {} boundaries",
        registrations,
        boundaries.len()
    );

    let samples: Vec<BoundarySample> = job
        .probe
        .points
        .iter()
        .map(|p| BoundarySample {
            attribute: p.attribute,
            position: p.position,
        })
        .collect();

    let real = target
        .sample(E_FIELD, Pass::Real, &samples)
        .context("Evaluation failed in real pass")?;
    let imag = target
        .sample(E_FIELD, Pass::Imaginary, &samples)
        .context("Evaluation failed in imaginary pass")?;

    Ok(ProbeOutput {
        samples,
        real,
        imag,
        registrations,
    })
}

/// Write probed sources to a CSV file.
pub fn write_probe_csv(output: &ProbeOutput, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Fresnel surface current source (-i omega J)")?;
    writeln!(file, "attribute,x,y,z,re_x,re_y,re_z,im_x,im_y,im_z")?;

    for r in output.records() {
        writeln!(
            file,
            "{},{:.6},{:.6},{:.6},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e}",
            r.attribute,
            r.position[0], r.position[1], r.position[2],
            r.real[0], r.real[1], r.real[2],
            r.imag[0], r.imag[1], r.imag[2],
        )?;
    }

    println!("Probe CSV written to: {}", path.display());
    Ok(())
}

/// Write probed sources to a JSON file.
pub fn write_probe_json(output: &ProbeOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&output.records())
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Probe JSON written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_run_job_probes_both_passes() {
        let job = parse_config(
            r#"
            [physics]
            frequency = 1.0
            [physics.constants]
            Jy = [0.0, 2.0]

            [[boundary]]
            type = "surface_current"
            name = "feed"
            selection = [3]
            surfJ = [1.0, "Jy", 0.0]

            [[probe.points]]
            attribute = 3
            position = [0.0, 0.0, 0.0]

            [[probe.points]]
            attribute = 8
            position = [0.0, 0.0, 0.0]
            "#,
        )
        .unwrap();

        let out = run_job(&job).unwrap();
        let omega = 2.0 * std::f64::consts::PI;
        assert_eq!(out.registrations, 2);
        assert_abs_diff_eq!(out.imag[[0, 0]], -omega, epsilon = 1e-12);
        // -iω · 2i = 2ω
        assert_abs_diff_eq!(out.real[[0, 1]], 2.0 * omega, epsilon = 1e-12);
        assert_eq!(out.real[[1, 1]], 0.0);

        let records = out.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].attribute, 8);
    }

    #[test]
    fn test_missing_frequency_aborts_job() {
        let job = parse_config(
            r#"
            [physics]
            [[boundary]]
            type = "surface_current"
            name = "feed"
            selection = [1]
            surfJ = [1.0, 0.0, 0.0]
            "#,
        )
        .unwrap();
        assert!(run_job(&job).is_err());
    }

    #[test]
    fn test_two_axis_boundary_fails_to_build() {
        let job = parse_config(
            r#"
            [physics]
            frequency = 1.0
            [[boundary]]
            type = "surface_current"
            name = "short"
            selection = [1]
            surfJ = [1.0, 0.0]
            "#,
        )
        .unwrap();
        let physics = build_physics(&job.physics).unwrap();
        let err = build_boundaries(&job, &physics).err().unwrap();
        assert!(format!("{:#}", err).contains("exactly 3 axis entries"));
    }
}
