// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh file formats and snapshots

pub mod obj;
pub mod off;
pub mod snapshot;
pub mod stl;

use crate::error::{MeshError, MeshResult};
use crate::geometry::TriangleMesh;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub use obj::{read_obj, write_obj};
pub use off::{read_off, write_off};
pub use snapshot::{Snapshot, SNAPSHOT_FORMAT, SNAPSHOT_VERSION};

/// Supported mesh file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    Off,
    Obj,
    Stl,
    /// Snapshot as plain JSON
    Json,
    /// Snapshot inside a zip archive
    Tmsh,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 5] = [Self::Off, Self::Obj, Self::Stl, Self::Json, Self::Tmsh];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Obj => "obj",
            Self::Stl => "stl",
            Self::Json => "json",
            Self::Tmsh => "tmsh",
        }
    }
}

impl FromStr for MeshFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == wanted)
            .ok_or_else(|| format!("unsupported mesh format '{s}'"))
    }
}

/// Writer choices not implied by the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Deflate the snapshot entry of `.tmsh` archives
    pub compress_snapshots: bool,
    /// Write `.stl` as ASCII instead of binary
    pub ascii_stl: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compress_snapshots: true,
            ascii_stl: false,
        }
    }
}

fn format_for(path: &Path) -> Result<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "Unsupported mesh file extension '{}': {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default(),
            path.display()
        )
    })
}

/// Load a mesh from file, auto-detecting format from extension
pub fn load_mesh(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mesh = match format {
        MeshFormat::Off => read_off(reader).map_err(anyhow::Error::from),
        MeshFormat::Obj => read_obj(reader).map_err(anyhow::Error::from),
        MeshFormat::Stl => stl::read_stl(&mut reader),
        MeshFormat::Json => snapshot::read_json(reader),
        MeshFormat::Tmsh => snapshot::read_archive(reader),
    }
    .with_context(|| format!("Failed to load {}", path.display()))?;

    info!(
        path = %path.display(),
        ?format,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh loaded"
    );
    Ok(mesh)
}

/// Save mesh to file, auto-detecting format from extension
pub fn save_mesh(mesh: &TriangleMesh, path: impl AsRef<Path>) -> Result<()> {
    save_mesh_with(mesh, path, SaveOptions::default())
}

pub fn save_mesh_with(mesh: &TriangleMesh, path: impl AsRef<Path>, options: SaveOptions) -> Result<()> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        MeshFormat::Off => write_off(mesh, &mut writer)?,
        MeshFormat::Obj => write_obj(mesh, &mut writer)?,
        MeshFormat::Stl if options.ascii_stl => stl::write_stl_ascii(mesh, &mut writer)?,
        MeshFormat::Stl => stl::write_stl_binary(mesh, &mut writer)?,
        MeshFormat::Json => snapshot::write_json(mesh, &mut writer)?,
        MeshFormat::Tmsh => snapshot::write_archive(mesh, &mut writer, options.compress_snapshots)?,
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        ?format,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh saved"
    );
    Ok(())
}

pub(crate) fn parse_error(line: usize, message: impl Into<String>) -> MeshError {
    MeshError::Parse {
        line,
        message: message.into(),
    }
}

pub(crate) fn parse_number<T: FromStr>(token: &str, line: usize) -> MeshResult<T> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("invalid number '{token}'")))
}

/// Fan triangulation `(p0, pk, pk+1)` of a polygon
pub(crate) fn fan(polygon: &[usize], line: usize) -> MeshResult<Vec<[usize; 3]>> {
    if polygon.len() < 3 {
        return Err(parse_error(
            line,
            format!("face needs at least 3 vertices, found {}", polygon.len()),
        ));
    }
    Ok(polygon
        .windows(2)
        .skip(1)
        .map(|pair| [polygon[0], pair[0], pair[1]])
        .collect())
}
