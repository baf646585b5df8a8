// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Versioned mesh snapshots
//!
//! A snapshot stores positions and index triples only. Everything else is
//! derived again by the rebuild that runs on load.

use crate::error::{MeshError, MeshResult};
use crate::geometry::TriangleMesh;
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek, Write};
use zip::write::{ExtendedFileOptions, FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

pub const SNAPSHOT_FORMAT: &str = "trimm-mesh";
pub const SNAPSHOT_VERSION: u32 = 1;

/// Name of the document inside a `.tmsh` archive
pub const SNAPSHOT_ENTRY: &str = "snapshot.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format: String,
    pub version: u32,
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[usize; 3]>,
}

impl Snapshot {
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let (positions, triangles) = mesh.to_indexed();
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            vertices: positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
            triangles,
        }
    }

    /// Rebuild a mesh, refusing unknown formats and versions
    pub fn into_mesh(self) -> MeshResult<TriangleMesh> {
        if self.format != SNAPSHOT_FORMAT || self.version != SNAPSHOT_VERSION {
            return Err(MeshError::UnsupportedSnapshot {
                format: self.format,
                version: self.version,
            });
        }
        let positions: Vec<Point3<f64>> = self.vertices.iter().map(|&p| Point3::from(p)).collect();
        TriangleMesh::from_indexed(&positions, &self.triangles)
    }
}

pub fn write_json<W: Write>(mesh: &TriangleMesh, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &Snapshot::from_mesh(mesh))
        .context("Failed to serialize snapshot")?;
    Ok(())
}

pub fn read_json<R: Read>(reader: R) -> Result<TriangleMesh> {
    let snapshot: Snapshot =
        serde_json::from_reader(reader).context("Failed to deserialize snapshot")?;
    Ok(snapshot.into_mesh()?)
}

/// Write a zip archive holding a single JSON snapshot entry
pub fn write_archive<W: Write + Seek>(mesh: &TriangleMesh, writer: W, compress: bool) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    let method = if compress {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    };
    let options: FileOptions<ExtendedFileOptions> = FileOptions::default().compression_method(method);

    let document = serde_json::to_vec(&Snapshot::from_mesh(mesh)).context("Failed to serialize snapshot")?;
    zip.start_file(SNAPSHOT_ENTRY, options)?;
    zip.write_all(&document)?;
    zip.finish()?;
    Ok(())
}

pub fn read_archive<R: Read + Seek>(reader: R) -> Result<TriangleMesh> {
    let mut archive = ZipArchive::new(reader).context("Failed to open snapshot archive")?;
    let entry = archive
        .by_name(SNAPSHOT_ENTRY)
        .with_context(|| format!("Snapshot archive has no {SNAPSHOT_ENTRY} entry"))?;
    read_json(entry)
}
