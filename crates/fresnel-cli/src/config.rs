//! TOML configuration deserialisation for boundary source jobs.
//!
//! ```toml
//! [physics]
//! frequency = 1.0e9
//! ind_vars = ["x", "y", "z"]
//!
//! [physics.constants]
//! J0 = [0.0, 1.0]
//!
//! [[boundary]]
//! type = "surface_current"
//! name = "feed"
//! selection = [3, 4]
//! surfJ = [0.0, "J0", 0.0]
//!
//! [[probe.points]]
//! attribute = 3
//! position = [0.0, 0.0, 0.1]
//! ```

use std::collections::BTreeMap;

use fresnel_core::field::AxisEntry;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub boundary: Vec<BoundaryConfig>,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Physics model parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct PhysicsConfig {
    /// Solve frequency (Hz). Boundaries that need it fail when it is absent.
    pub frequency: Option<f64>,
    #[serde(default = "default_ind_vars")]
    pub ind_vars: Vec<String>,
    /// Named constants visible to field expressions.
    #[serde(default)]
    pub constants: BTreeMap<String, ConstantValue>,
}

fn default_ind_vars() -> Vec<String> {
    vec!["x".into(), "y".into(), "z".into()]
}

/// A namespace constant: real number or `[re, im]` pair.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Real(f64),
    Complex([f64; 2]),
}

/// A boundary definition, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryConfig {
    SurfaceCurrent(SurfaceCurrentConfig),
}

/// Parameters of a surface current boundary.
#[derive(Debug, Deserialize)]
pub struct SurfaceCurrentConfig {
    pub name: String,
    /// Boundary attributes.
    pub selection: Vec<usize>,
    /// Per-axis surface current; kept as a list so arity is checked when
    /// the boundary is built.
    #[serde(rename = "surfJ", default = "default_surf_j")]
    pub surf_j: Vec<AxisEntry>,
    #[serde(default = "default_mu_r")]
    pub mu_r: f64,
}

fn default_surf_j() -> Vec<AxisEntry> {
    vec![AxisEntry::default(); 3]
}

fn default_mu_r() -> f64 {
    1.0
}

/// Points at which registered sources are probed.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub points: Vec<ProbePoint>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProbePoint {
    pub attribute: usize,
    pub position: [f64; 3],
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save probed sources as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save them as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}
