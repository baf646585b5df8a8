// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Object File Format (ASCII OFF)

use super::{fan, parse_error, parse_number};
use crate::error::MeshResult;
use crate::geometry::TriangleMesh;
use ahash::AHashSet;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};

/// Read an ASCII OFF document; polygons are fan-triangulated
pub fn read_off<R: BufRead>(reader: R) -> MeshResult<TriangleMesh> {
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| parse_error(index + 1, e.to_string()))?;
        let data = line.split('#').next().unwrap_or("").trim().to_string();
        if !data.is_empty() {
            lines.push((index + 1, data));
        }
    }
    let mut lines = lines.into_iter();

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| parse_error(1, "empty OFF document"))?;
    let mut header_tokens = header.split_whitespace();
    if header_tokens.next() != Some("OFF") {
        return Err(parse_error(header_line, "missing OFF header"));
    }

    // Counts may share the header line
    let rest: Vec<&str> = header_tokens.collect();
    let (count_line, counts) = if rest.is_empty() {
        let (line, text) = lines
            .next()
            .ok_or_else(|| parse_error(header_line, "missing counts line"))?;
        let counts = text
            .split_whitespace()
            .map(|t| parse_number::<usize>(t, line))
            .collect::<MeshResult<Vec<_>>>()?;
        (line, counts)
    } else {
        let counts = rest
            .iter()
            .map(|t| parse_number::<usize>(t, header_line))
            .collect::<MeshResult<Vec<_>>>()?;
        (header_line, counts)
    };
    let (vertex_count, face_count) = match counts.as_slice() {
        [v, f, ..] => (*v, *f),
        _ => return Err(parse_error(count_line, "expected vertex and face counts")),
    };

    let mut positions = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (line, text) = lines
            .next()
            .ok_or_else(|| parse_error(count_line, "unexpected end of vertex list"))?;
        let coords = text
            .split_whitespace()
            .take(3)
            .map(|t| parse_number::<f64>(t, line))
            .collect::<MeshResult<Vec<_>>>()?;
        match coords.as_slice() {
            [x, y, z] => positions.push(Point3::new(*x, *y, *z)),
            _ => return Err(parse_error(line, "vertex needs three coordinates")),
        }
    }

    let mut triangles = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        let (line, text) = lines
            .next()
            .ok_or_else(|| parse_error(count_line, "unexpected end of face list"))?;
        let mut tokens = text.split_whitespace();
        let n: usize = parse_number(tokens.next().unwrap_or(""), line)?;
        let polygon = tokens
            .take(n)
            .map(|t| parse_number::<usize>(t, line))
            .collect::<MeshResult<Vec<_>>>()?;
        if polygon.len() != n {
            return Err(parse_error(line, format!("face declares {n} vertices")));
        }
        if let Some(&bad) = polygon.iter().find(|&&i| i >= vertex_count) {
            return Err(parse_error(
                line,
                format!("vertex index {bad} out of range for {vertex_count} vertices"),
            ));
        }
        triangles.extend(fan(&polygon, line)?);
    }

    TriangleMesh::from_indexed(&positions, &triangles)
}

/// Write an ASCII OFF document
pub fn write_off<W: Write>(mesh: &TriangleMesh, mut writer: W) -> io::Result<()> {
    let (positions, triangles) = mesh.to_indexed();
    // Counted from storage so a mesh edited since its last rebuild is exact
    let edges: AHashSet<(usize, usize)> = triangles
        .iter()
        .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
        .filter(|(u, v)| u != v)
        .map(|(u, v)| (u.min(v), u.max(v)))
        .collect();
    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} {}", positions.len(), triangles.len(), edges.len())?;
    for p in &positions {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c] in &triangles {
        writeln!(writer, "3 {a} {b} {c}")?;
    }
    writer.flush()
}
