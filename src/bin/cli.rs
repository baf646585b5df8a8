// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! trimm CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use trimm::cli::{commands, Reporter};
use trimm::config::TrimmConfig;
use trimm::geometry::{NormalStrategy, Primitive};

#[derive(Parser)]
#[command(name = "trimm")]
#[command(about = "Triangle mesh engine - inspect, subdivide and convert meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./trimm.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print analytics and validation for a mesh file
    Info {
        /// Input mesh (off, obj, stl, json, tmsh)
        input: PathBuf,
    },

    /// Subdivide every triangle 1-to-4
    Subdivide {
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of steps (defaults to the configured value)
        #[arg(short, long)]
        steps: Option<u32>,
    },

    /// Reverse the winding of every triangle
    Flip {
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Summarize vertex normals under a weighting strategy
    Normals {
        input: PathBuf,

        /// Strategy name, e.g. angle-weighted or sqrt-edge-length-reciprocal
        #[arg(short, long)]
        strategy: Option<NormalStrategy>,
    },

    /// Convert between mesh formats, chosen by extension
    Convert {
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a primitive (tetrahedron, octahedron, cube, icosahedron, sphere, grid)
    Primitive {
        kind: Primitive,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Uniform scale factor
        #[arg(long, default_value = "1.0")]
        size: f64,

        /// Subdivision steps applied after generation
        #[arg(long, default_value = "0")]
        subdivisions: u32,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        Reporter::report_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<TrimmConfig> {
    match path {
        Some(path) => {
            let mut config = TrimmConfig::from_file(path)?;
            config.apply_env(|key| std::env::var(key).ok())?;
            Ok(config)
        }
        None => TrimmConfig::load(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let start = Instant::now();

    match cli.command {
        Commands::Info { input } => {
            let (stats, validation) = commands::info(&input, &config)?;
            Reporter::report_info(&input.display().to_string(), &stats, &validation);
            if stats.non_manifold_edges > 0 {
                Reporter::report_warning(&format!(
                    "{} edges are shared by more than two triangles",
                    stats.non_manifold_edges
                ));
            }
        }
        Commands::Subdivide {
            input,
            output,
            steps,
        } => {
            let steps = steps.unwrap_or(config.subdivision_steps);
            let mesh = commands::subdivide(&input, &output, steps, &config)?;
            Reporter::report_mesh("Subdivided", &output.display().to_string(), &mesh, start.elapsed());
        }
        Commands::Flip { input, output } => {
            let mesh = commands::flip(&input, &output, &config)?;
            Reporter::report_mesh("Flipped", &output.display().to_string(), &mesh, start.elapsed());
        }
        Commands::Normals { input, strategy } => {
            let strategy = strategy.unwrap_or(config.normal_strategy);
            let summary = commands::normals(&input, strategy, &config)?;
            Reporter::report_normals(&input.display().to_string(), &summary);
        }
        Commands::Convert { input, output } => {
            let mesh = commands::convert(&input, &output, &config)?;
            Reporter::report_mesh("Converted", &output.display().to_string(), &mesh, start.elapsed());
        }
        Commands::Primitive {
            kind,
            output,
            size,
            subdivisions,
        } => {
            let mesh = commands::primitive(kind, size, subdivisions, &output, &config)?;
            Reporter::report_mesh(
                &format!("Generated {kind}"),
                &output.display().to_string(),
                &mesh,
                start.elapsed(),
            );
        }
        Commands::Version => {
            println!("trimm v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    }

    if cli.verbose {
        Reporter::success(&format!("Done in {}", Reporter::format_duration(start.elapsed())));
    }
    Ok(())
}
