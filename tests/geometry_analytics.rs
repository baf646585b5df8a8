// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics verification tests

use anyhow::Result;
use approx::assert_relative_eq;
use std::f64::consts::PI;
use trimm::geometry::{analyze, validate_mesh, Primitive, RenderArrays, Shading};
use trimm::io;
use tempfile::NamedTempFile;

#[test]
fn test_cube_volume_and_surface_area() -> Result<()> {
    let mesh = Primitive::cube(10.0).to_mesh();
    let stats = analyze(&mesh);

    println!("Cube 10x10x10:");
    println!("  Volume: {:.2} (expected: 1000)", stats.volume);
    println!("  Surface area: {:.2} (expected: 600)", stats.surface_area);

    assert_relative_eq!(stats.volume, 1000.0, epsilon = 1e-9);
    assert_relative_eq!(stats.surface_area, 600.0, epsilon = 1e-9);

    assert_eq!(stats.vertex_count, 8);
    assert_eq!(stats.triangle_count, 12);
    assert_eq!(stats.edge_count, 18);
    assert_eq!(stats.euler_characteristic, 2);
    assert!(stats.is_watertight);
    assert_eq!(stats.bbox, [-5.0, -5.0, -5.0, 5.0, 5.0, 5.0]);

    Ok(())
}

#[test]
fn test_sphere_volume_and_surface_area() -> Result<()> {
    let radius: f64 = 5.0;
    let mesh = Primitive::sphere(radius, 3).to_mesh();
    let stats = analyze(&mesh);

    let expected_volume = (4.0 / 3.0) * PI * radius.powi(3);
    let expected_area = 4.0 * PI * radius.powi(2);

    println!("Sphere radius {}:", radius);
    println!("  Volume: {:.2} (expected: {:.2})", stats.volume, expected_volume);
    println!("  Surface area: {:.2} (expected: {:.2})", stats.surface_area, expected_area);

    // Inscribed polyhedron, so both fall short of the smooth sphere
    let volume_error = (expected_volume - stats.volume) / expected_volume;
    let area_error = (expected_area - stats.surface_area) / expected_area;
    assert!(
        (0.0..0.05).contains(&volume_error),
        "Volume error {:.2}% outside tolerance",
        volume_error * 100.0
    );
    assert!(
        (0.0..0.05).contains(&area_error),
        "Surface area error {:.2}% outside tolerance",
        area_error * 100.0
    );

    assert_eq!(stats.triangle_count, 1280);
    assert_eq!(stats.euler_characteristic, 2);
    assert!(stats.is_watertight);
    assert_eq!(stats.degenerate_triangles, 0);

    Ok(())
}

#[test]
fn test_open_grid_boundary() -> Result<()> {
    let mesh = Primitive::grid(2.0, 4).to_mesh();
    let stats = analyze(&mesh);
    let validation = validate_mesh(&mesh);

    assert_eq!(stats.vertex_count, 25);
    assert_eq!(stats.triangle_count, 32);
    assert_eq!(stats.edge_count, 56);
    assert_eq!(stats.boundary_edges, 16);
    assert_eq!(stats.euler_characteristic, 1);
    assert!(!stats.is_watertight);
    assert_relative_eq!(stats.surface_area, 4.0, epsilon = 1e-9);
    assert_relative_eq!(stats.volume, 0.0, epsilon = 1e-12);

    assert!(validation.is_manifold);
    assert!(!validation.is_closed);
    assert!(validation.has_consistent_winding);
    assert!(!validation.is_valid());

    Ok(())
}

#[test]
fn test_flipped_triangle_breaks_winding() -> Result<()> {
    let mut mesh = Primitive::octahedron(1.0).to_mesh();
    assert!(validate_mesh(&mesh).is_valid());

    let first = mesh.triangle_ids()[0];
    mesh.flip_triangle(first)?;
    let validation = validate_mesh(&mesh);
    assert!(validation.is_closed);
    assert!(!validation.has_consistent_winding);

    // Flipping everything keeps neighbours consistent with each other
    mesh.flip_triangle(first)?;
    mesh.flip_all_triangles()?;
    assert!(validate_mesh(&mesh).is_valid());

    Ok(())
}

#[test]
fn test_stats_survive_file_roundtrip() -> Result<()> {
    let mesh = Primitive::icosahedron(3.0).to_mesh();
    let before = analyze(&mesh);

    let file = NamedTempFile::with_suffix(".off")?;
    io::save_mesh(&mesh, file.path())?;
    let loaded = io::load_mesh(file.path())?;
    let after = analyze(&loaded);

    assert_eq!(after.vertex_count, before.vertex_count);
    assert_eq!(after.edge_count, before.edge_count);
    assert_relative_eq!(after.volume, before.volume, epsilon = 1e-9);
    assert_relative_eq!(after.surface_area, before.surface_area, epsilon = 1e-9);

    Ok(())
}

#[test]
fn test_render_arrays_match_mesh() -> Result<()> {
    let mesh = Primitive::cube(2.0).to_mesh();

    let smooth = RenderArrays::from_mesh(&mesh, Shading::Smooth);
    assert_eq!(smooth.vertex_count(), 8);
    assert_eq!(smooth.triangle_count(), 12);
    assert_eq!(smooth.edge_indices.len(), 2 * 18);
    assert_eq!(smooth.min, [-1.0; 3]);
    assert_eq!(smooth.max, [1.0; 3]);

    let flat = RenderArrays::from_mesh(&mesh, Shading::Flat);
    assert_eq!(flat.vertex_count(), 36);
    assert_eq!(flat.triangle_count(), 12);

    Ok(())
}
