//! Fresnel command-line interface.
//!
//! Register and probe boundary sources from TOML job files:
//! ```sh
//! fresnel-cli run job.toml
//! fresnel-cli validate job.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fresnel-cli")]
#[command(about = "Fresnel: frequency-domain boundary sources for FE electromagnetics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register every boundary of a job and probe the resulting sources.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the probed sources as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Parse a job and resolve its boundaries without registering them.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output, json } => {
            println!("Fresnel boundary sources");
            println!("========================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                runner::write_probe_csv(&result, &out_dir.join("surface_source.csv"))?;
            }
            if json || job.output.save_json {
                runner::write_probe_json(&result, &out_dir.join("surface_source.json"))?;
            }

            println!("Done ({} registrations).", result.registrations);
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let physics = runner::build_physics(&job.physics)?;
            let boundaries = runner::build_boundaries(&job, &physics)?;
            println!(
                "Configuration is valid: {} ({} boundaries)",
                config.display(),
                boundaries.len()
            );
            Ok(())
        }
    }
}
