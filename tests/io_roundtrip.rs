// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Save and load through every supported format

use anyhow::Result;
use approx::assert_relative_eq;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use trimm::config::TrimmConfig;
use trimm::geometry::Primitive;
use trimm::io::{self, MeshFormat, SaveOptions};
use trimm::{load_mesh, save_mesh, MeshError, TriangleMesh};

fn sample() -> TriangleMesh {
    Primitive::sphere(1.5, 1).to_mesh()
}

fn assert_same_shape(a: &TriangleMesh, b: &TriangleMesh, tolerance: f64) {
    let (pa, ta) = a.to_indexed();
    let (pb, tb) = b.to_indexed();
    assert_eq!(ta, tb);
    assert_eq!(pa.len(), pb.len());
    for (p, q) in pa.iter().zip(&pb) {
        assert_relative_eq!(p, q, epsilon = tolerance);
    }
    assert_eq!(a.edge_count(), b.edge_count());
}

#[test]
fn test_text_and_snapshot_formats_preserve_mesh() -> Result<()> {
    let mesh = sample();
    for format in [MeshFormat::Off, MeshFormat::Obj, MeshFormat::Json, MeshFormat::Tmsh] {
        let file = NamedTempFile::with_suffix(format!(".{}", format.extension()))?;
        save_mesh(&mesh, file.path())?;
        let loaded = load_mesh(file.path())?;
        assert_same_shape(&mesh, &loaded, 1e-12);
        assert!(loaded.is_consistent(), "{format:?}");
    }
    Ok(())
}

#[test]
fn test_stl_roundtrip_welds_vertices() -> Result<()> {
    let mesh = sample();
    for ascii_stl in [false, true] {
        let file = NamedTempFile::with_suffix(".stl")?;
        let options = SaveOptions {
            ascii_stl,
            ..SaveOptions::default()
        };
        io::save_mesh_with(&mesh, file.path(), options)?;
        let loaded = load_mesh(file.path())?;

        // Positions pass through f32, so compare topology and extent only
        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        assert_eq!(loaded.triangle_count(), mesh.triangle_count());
        assert_eq!(loaded.edge_count(), mesh.edge_count());
        assert_relative_eq!(loaded.scale(), mesh.scale(), epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_uncompressed_archive_is_larger() -> Result<()> {
    let mesh = Primitive::sphere(1.0, 3).to_mesh();
    let stored = NamedTempFile::with_suffix(".tmsh")?;
    let deflated = NamedTempFile::with_suffix(".tmsh")?;

    let plain = SaveOptions {
        compress_snapshots: false,
        ..SaveOptions::default()
    };
    io::save_mesh_with(&mesh, stored.path(), plain)?;
    save_mesh(&mesh, deflated.path())?;

    let stored_len = std::fs::metadata(stored.path())?.len();
    let deflated_len = std::fs::metadata(deflated.path())?.len();
    assert!(deflated_len < stored_len, "{deflated_len} >= {stored_len}");

    assert_same_shape(&load_mesh(stored.path())?, &load_mesh(deflated.path())?, 1e-12);
    Ok(())
}

#[test]
fn test_snapshot_version_is_checked() -> Result<()> {
    let mut file = NamedTempFile::with_suffix(".json")?;
    write!(
        file,
        r#"{{"format":"trimm-mesh","version":99,"vertices":[[0,0,0],[1,0,0],[0,1,0]],"triangles":[[0,1,2]]}}"#
    )?;
    file.flush()?;

    let err = load_mesh(file.path()).unwrap_err();
    let rejected = err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<MeshError>(),
            Some(MeshError::UnsupportedSnapshot { version: 99, .. })
        )
    });
    assert!(rejected, "unexpected error: {err:#}");
    Ok(())
}

#[test]
fn test_unknown_extension_is_named() -> Result<()> {
    let file = NamedTempFile::with_suffix(".ply")?;
    let err = save_mesh(&sample(), file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("ply"), "{err:#}");
    assert!(load_mesh(file.path()).is_err());
    Ok(())
}

#[test]
fn test_handwritten_off_with_quads() -> Result<()> {
    let mut file = NamedTempFile::with_suffix(".off")?;
    writeln!(file, "OFF # unit square")?;
    writeln!(file, "4 1 0")?;
    writeln!(file, "0 0 0\n1 0 0\n1 1 0\n0 1 0")?;
    writeln!(file, "4 0 1 2 3")?;
    file.flush()?;

    let mesh = load_mesh(file.path())?;
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.edge_count(), 5);
    assert_eq!(mesh.min_edge_length(), 1.0);
    Ok(())
}

#[test]
fn test_cli_commands_chain_through_files() -> Result<()> {
    use trimm::cli::commands;

    let dir = TempDir::new()?;
    let config = TrimmConfig::default();
    let base = dir.path().join("octahedron.obj");
    let fine = dir.path().join("fine.tmsh");
    let flipped = dir.path().join("flipped.off");

    let generated = commands::primitive(Primitive::octahedron(1.0), 2.0, 0, &base, &config)?;
    assert_eq!(generated.triangle_count(), 8);

    let subdivided = commands::subdivide(&base, &fine, 2, &config)?;
    assert_eq!(subdivided.triangle_count(), 128);

    commands::flip(&fine, &flipped, &config)?;
    let (stats, validation) = commands::info(&flipped, &config)?;
    assert_eq!(stats.triangle_count, 128);
    assert!(validation.is_valid());
    assert_relative_eq!(stats.bbox[3], 2.0, epsilon = 1e-12);
    Ok(())
}
