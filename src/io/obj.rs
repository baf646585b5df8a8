// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ geometry (positions and faces only)

use super::{fan, parse_error, parse_number};
use crate::error::MeshResult;
use crate::geometry::TriangleMesh;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};

/// Read OBJ positions and faces
///
/// Supports `f v`, `f v/vt`, `f v//vn` and `f v/vt/vn` corners, negative
/// (relative) indices and polygon faces, which are fan-triangulated. Texture
/// coordinates, normals, groups and materials are skipped.
pub fn read_obj<R: BufRead>(reader: R) -> MeshResult<TriangleMesh> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut triangles = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| parse_error(line_number, e.to_string()))?;
        let data = line.split('#').next().unwrap_or("");
        let mut tokens = data.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(|t| parse_number::<f64>(t, line_number))
                    .collect::<MeshResult<Vec<_>>>()?;
                match coords.as_slice() {
                    [x, y, z] => positions.push(Point3::new(*x, *y, *z)),
                    _ => return Err(parse_error(line_number, "vertex requires 3 coordinates")),
                }
            }
            Some("f") => {
                let polygon = tokens
                    .map(|corner| resolve_index(corner, positions.len(), line_number))
                    .collect::<MeshResult<Vec<_>>>()?;
                triangles.extend(fan(&polygon, line_number)?);
            }
            _ => {}
        }
    }

    TriangleMesh::from_indexed(&positions, &triangles)
}

/// Zero-based position index of a face corner such as `7`, `7/2`, `7//3` or `-1`
fn resolve_index(corner: &str, count: usize, line: usize) -> MeshResult<usize> {
    let raw = corner.split('/').next().unwrap_or("");
    let index: i64 = parse_number(raw, line)?;
    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => count.checked_sub(i.unsigned_abs() as usize),
    };
    resolved.filter(|&i| i < count).ok_or_else(|| {
        parse_error(
            line,
            format!("vertex index {index} out of range for {count} vertices"),
        )
    })
}

/// Write positions and triangular faces
pub fn write_obj<W: Write>(mesh: &TriangleMesh, mut writer: W) -> io::Result<()> {
    let (positions, triangles) = mesh.to_indexed();
    writeln!(writer, "# trimm OBJ export")?;
    writeln!(
        writer,
        "# Vertices: {}, Faces: {}",
        positions.len(),
        triangles.len()
    )?;
    for p in &positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c] in &triangles {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    writer.flush()
}
