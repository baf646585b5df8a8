// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL import and export

use crate::geometry::TriangleMesh;
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::io::{Read, Seek, Write};
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};
use tracing::debug;

/// Read ASCII or binary STL; `stl_io` merges coincident corners into shared vertices
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<TriangleMesh> {
    let stl = stl_io::read_stl(reader).context("Failed to parse STL data")?;
    debug!(
        vertices = stl.vertices.len(),
        triangles = stl.faces.len(),
        "STL decoded"
    );

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    // Faces collapsed by the f32 weld carry no area
    let triangles: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|face| face.vertices)
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    Ok(TriangleMesh::from_indexed(&positions, &triangles)?)
}

fn stl_triangles(mesh: &TriangleMesh) -> Vec<StlTriangle> {
    let vertex = |p: Point3<f64>| StlVertex::new([p.x as f32, p.y as f32, p.z as f32]);
    mesh.triangles()
        .filter_map(|(_, tri)| {
            let [a, b, c] = tri.vertices;
            let n = tri.geometry.normal;
            Some(StlTriangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    vertex(mesh.position(a).ok()?),
                    vertex(mesh.position(b).ok()?),
                    vertex(mesh.position(c).ok()?),
                ],
            })
        })
        .collect()
}

/// Write binary STL with the face normals from the last rebuild
pub fn write_stl_binary<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
    let triangles = stl_triangles(mesh);
    stl_io::write_stl(writer, triangles.iter()).context("Failed to write STL data")?;
    Ok(())
}

/// Write ASCII STL
pub fn write_stl_ascii<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "solid mesh")?;

    for (_, tri) in mesh.triangles() {
        let n = tri.geometry.normal;
        writeln!(writer, "  facet normal {} {} {}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for &id in &tri.vertices {
            let p = mesh.position(id)?;
            writeln!(writer, "      vertex {} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;
    Ok(())
}
