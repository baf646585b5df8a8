// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Subcommand implementations shared by the binary and the tests

use crate::config::TrimmConfig;
use crate::geometry::{
    analyze, validate_mesh, GeometryStats, MeshValidation, NormalStrategy, Primitive, TriangleMesh,
};
use crate::io::{load_mesh, save_mesh_with};
use crate::utils::math::rad_to_deg;
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::path::Path;

/// Load a mesh and rebuild it with the configured options
pub fn load(input: &Path, config: &TrimmConfig) -> Result<TriangleMesh> {
    let mut mesh = load_mesh(input)?;
    mesh.set_options(config.rebuild_options());
    mesh.rebuild()
        .with_context(|| format!("Failed to rebuild {}", input.display()))?;
    Ok(mesh)
}

fn save(mesh: &TriangleMesh, output: &Path, config: &TrimmConfig) -> Result<()> {
    save_mesh_with(mesh, output, config.save_options())
}

pub fn info(input: &Path, config: &TrimmConfig) -> Result<(GeometryStats, MeshValidation)> {
    let mesh = load(input, config)?;
    Ok((analyze(&mesh), validate_mesh(&mesh)))
}

pub fn subdivide(input: &Path, output: &Path, steps: u32, config: &TrimmConfig) -> Result<TriangleMesh> {
    let mut mesh = load(input, config)?;
    mesh.subdivide(steps)?;
    save(&mesh, output, config)?;
    Ok(mesh)
}

pub fn flip(input: &Path, output: &Path, config: &TrimmConfig) -> Result<TriangleMesh> {
    let mut mesh = load(input, config)?;
    mesh.flip_all_triangles()?;
    save(&mesh, output, config)?;
    Ok(mesh)
}

pub fn convert(input: &Path, output: &Path, config: &TrimmConfig) -> Result<TriangleMesh> {
    let mesh = load(input, config)?;
    save(&mesh, output, config)?;
    Ok(mesh)
}

/// Generate a primitive, optionally scaled and subdivided, and save it
pub fn primitive(
    kind: Primitive,
    size: f64,
    subdivisions: u32,
    output: &Path,
    config: &TrimmConfig,
) -> Result<TriangleMesh> {
    let mut mesh = kind.to_mesh();
    mesh.set_options(config.rebuild_options());
    mesh.scale_uniform(size);
    mesh.subdivide(subdivisions)?;
    save(&mesh, output, config)?;
    Ok(mesh)
}

/// Per-strategy view of a mesh's vertex normals
#[derive(Debug, Clone, PartialEq)]
pub struct NormalsSummary {
    pub strategy: NormalStrategy,
    pub vertex_count: usize,
    /// Vertices without incident triangles
    pub isolated: usize,
    /// Largest angle (degrees) between this strategy and each other one
    pub deviation_deg: Vec<(NormalStrategy, f64)>,
    /// First few vertices with their normals
    pub sample: Vec<(Point3<f64>, Vector3<f64>)>,
}

pub const NORMAL_SAMPLE_SIZE: usize = 8;

pub fn normals(input: &Path, strategy: NormalStrategy, config: &TrimmConfig) -> Result<NormalsSummary> {
    let mut mesh = load(input, config)?;
    mesh.set_normal_strategy(strategy);
    mesh.recompute_vertex_normals();
    Ok(summarize_normals(&mesh, strategy))
}

pub fn summarize_normals(mesh: &TriangleMesh, strategy: NormalStrategy) -> NormalsSummary {
    let chosen = strategy.compute(mesh);

    let deviation_deg = NormalStrategy::ALL
        .into_iter()
        .filter(|&other| other != strategy)
        .map(|other| {
            let worst = other
                .compute(mesh)
                .iter()
                .zip(&chosen)
                .map(|((_, a), (_, b))| a.angle(b))
                .fold(0.0_f64, f64::max);
            (other, rad_to_deg(worst))
        })
        .collect();

    NormalsSummary {
        strategy,
        vertex_count: mesh.vertex_count(),
        isolated: mesh.vertices().filter(|(_, v)| v.is_isolated()).count(),
        deviation_deg,
        sample: mesh
            .vertices()
            .zip(&chosen)
            .take(NORMAL_SAMPLE_SIZE)
            .map(|((_, v), (_, n))| (v.position, *n))
            .collect(),
    }
}
