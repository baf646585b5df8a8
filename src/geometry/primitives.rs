// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator

use super::{TriangleMesh, VertexId};
use crate::error::MeshResult;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Geometric primitives, all centred on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Primitive {
    /// Regular tetrahedron with the given circumradius
    Tetrahedron { radius: f64 },
    /// Regular octahedron with vertices on the axes
    Octahedron { radius: f64 },
    /// Axis-aligned cube with the given edge length
    Cube { size: f64 },
    /// Regular icosahedron with the given circumradius
    Icosahedron { radius: f64 },
    /// Icosahedron subdivided `subdivisions` times and projected onto the sphere
    Sphere { radius: f64, subdivisions: u32 },
    /// Open square grid in the XY plane, facing +Z
    Grid { size: f64, divisions: u32 },
}

impl Primitive {
    pub fn tetrahedron(radius: f64) -> Self {
        Self::Tetrahedron { radius }
    }

    pub fn octahedron(radius: f64) -> Self {
        Self::Octahedron { radius }
    }

    pub fn cube(size: f64) -> Self {
        Self::Cube { size }
    }

    pub fn icosahedron(radius: f64) -> Self {
        Self::Icosahedron { radius }
    }

    pub fn sphere(radius: f64, subdivisions: u32) -> Self {
        Self::Sphere {
            radius,
            subdivisions,
        }
    }

    pub fn grid(size: f64, divisions: u32) -> Self {
        Self::Grid {
            size,
            divisions: divisions.max(1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tetrahedron { .. } => "tetrahedron",
            Self::Octahedron { .. } => "octahedron",
            Self::Cube { .. } => "cube",
            Self::Icosahedron { .. } => "icosahedron",
            Self::Sphere { .. } => "sphere",
            Self::Grid { .. } => "grid",
        }
    }

    /// Shared-vertex mesh with outward winding, already rebuilt
    pub fn to_mesh(&self) -> TriangleMesh {
        match *self {
            Self::Tetrahedron { radius } => generate_tetrahedron_mesh(radius),
            Self::Octahedron { radius } => generate_octahedron_mesh(radius),
            Self::Cube { size } => generate_cube_mesh(size),
            Self::Icosahedron { radius } => generate_icosahedron_mesh(radius),
            Self::Sphere {
                radius,
                subdivisions,
            } => generate_sphere_mesh(radius, subdivisions),
            Self::Grid { size, divisions } => generate_grid_mesh(size, divisions),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a primitive kind with unit dimensions
impl FromStr for Primitive {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tetrahedron" => Ok(Self::tetrahedron(1.0)),
            "octahedron" => Ok(Self::octahedron(1.0)),
            "cube" => Ok(Self::cube(1.0)),
            "icosahedron" => Ok(Self::icosahedron(1.0)),
            "sphere" => Ok(Self::sphere(1.0, 2)),
            "grid" => Ok(Self::grid(1.0, 4)),
            other => Err(format!("unknown primitive '{other}'")),
        }
    }
}

fn build(positions: &[Point3<f64>], faces: &[[usize; 3]]) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(positions.len(), faces.len());
    let ids: Vec<VertexId> = positions.iter().map(|p| mesh.add_vertex(*p)).collect();
    for face in faces {
        mesh.add_triangle(face.map(|i| ids[i]));
    }
    finish(mesh)
}

fn finish(mut mesh: TriangleMesh) -> TriangleMesh {
    // Every handle was issued by this mesh, so rebuild only fails on a bug
    if let Err(err) = mesh.rebuild() {
        warn!(%err, "primitive rebuild failed");
    }
    mesh
}

fn generate_tetrahedron_mesh(radius: f64) -> TriangleMesh {
    let s = radius / 3.0_f64.sqrt();
    let positions = [
        Point3::new(s, s, s),
        Point3::new(s, -s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
    ];
    let faces = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
    build(&positions, &faces)
}

fn generate_octahedron_mesh(radius: f64) -> TriangleMesh {
    let r = radius;
    // +x, -x, +y, -y, +z, -z
    let positions = [
        Point3::new(r, 0.0, 0.0),
        Point3::new(-r, 0.0, 0.0),
        Point3::new(0.0, r, 0.0),
        Point3::new(0.0, -r, 0.0),
        Point3::new(0.0, 0.0, r),
        Point3::new(0.0, 0.0, -r),
    ];

    let mut faces = Vec::with_capacity(8);
    for (x, sx) in [(0, 1), (1, -1)] {
        for (y, sy) in [(2, 1), (3, -1)] {
            for (z, sz) in [(4, 1), (5, -1)] {
                // Each sign flip mirrors the octant and reverses the winding
                if sx * sy * sz > 0 {
                    faces.push([x, y, z]);
                } else {
                    faces.push([x, z, y]);
                }
            }
        }
    }
    build(&positions, &faces)
}

fn generate_cube_mesh(size: f64) -> TriangleMesh {
    let h = size / 2.0;

    // 8 vertices of the cube
    let positions = [
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ];

    let faces = [
        // Front (z+)
        [4, 5, 6],
        [4, 6, 7],
        // Back (z-)
        [1, 0, 3],
        [1, 3, 2],
        // Right (x+)
        [5, 1, 2],
        [5, 2, 6],
        // Left (x-)
        [0, 4, 7],
        [0, 7, 3],
        // Top (y+)
        [7, 6, 2],
        [7, 2, 3],
        // Bottom (y-)
        [0, 1, 5],
        [0, 5, 4],
    ];
    build(&positions, &faces)
}

fn icosahedron_positions(radius: f64) -> Vec<Point3<f64>> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let scale = radius / (1.0 + phi * phi).sqrt();
    [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ]
    .iter()
    .map(|[x, y, z]| Point3::new(x * scale, y * scale, z * scale))
    .collect()
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn generate_icosahedron_mesh(radius: f64) -> TriangleMesh {
    build(&icosahedron_positions(radius), &ICOSAHEDRON_FACES)
}

fn generate_sphere_mesh(radius: f64, subdivisions: u32) -> TriangleMesh {
    let mut mesh = generate_icosahedron_mesh(radius);
    if let Err(err) = mesh.subdivide(subdivisions) {
        warn!(%err, "sphere subdivision failed");
    }
    if let Err(err) = project_onto_sphere(&mut mesh, radius) {
        warn!(%err, "sphere projection failed");
    }
    finish(mesh)
}

/// Move every vertex radially onto the sphere of `radius` about the origin
fn project_onto_sphere(mesh: &mut TriangleMesh, radius: f64) -> MeshResult<()> {
    for id in mesh.vertex_ids() {
        let position = mesh.position(id)?;
        mesh.set_vertex_position(id, Point3::from(position.coords.normalize() * radius))?;
    }
    Ok(())
}

fn generate_grid_mesh(size: f64, divisions: u32) -> TriangleMesh {
    let n = divisions.max(1) as usize;
    let step = size / n as f64;
    let origin = -size / 2.0;

    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            positions.push(Point3::new(
                origin + i as f64 * step,
                origin + j as f64 * step,
                0.0,
            ));
        }
    }

    let index = |i: usize, j: usize| j * (n + 1) + i;
    let mut faces = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let (a, b, c, d) = (index(i, j), index(i + 1, j), index(i + 1, j + 1), index(i, j + 1));
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    build(&positions, &faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_outward(mesh: &TriangleMesh) {
        for (_, triangle) in mesh.triangles() {
            let g = &triangle.geometry;
            assert!(
                g.normal.dot(&g.centroid.coords) > 0.0,
                "inward facing triangle {:?}",
                triangle.vertices
            );
        }
    }

    fn assert_closed(mesh: &TriangleMesh) {
        assert!(mesh.edges().all(|e| e.incident_triangles.len() == 2));
        let euler = mesh.vertex_count() as i64 - mesh.edge_count() as i64
            + mesh.triangle_count() as i64;
        assert_eq!(euler, 2);
    }

    #[test]
    fn test_projection_puts_vertices_on_sphere() {
        let mut mesh = Primitive::cube(1.0).to_mesh();
        project_onto_sphere(&mut mesh, 2.5).unwrap();
        for (_, vertex) in mesh.vertices() {
            assert_relative_eq!(vertex.position.coords.norm(), 2.5, epsilon = 1e-12);
        }
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn test_platonic_solids() {
        let expected = [
            (Primitive::tetrahedron(1.0), 4, 6, 4),
            (Primitive::octahedron(1.0), 6, 12, 8),
            (Primitive::cube(1.0), 8, 18, 12),
            (Primitive::icosahedron(1.0), 12, 30, 20),
        ];
        for (primitive, v, e, t) in expected {
            let mesh = primitive.to_mesh();
            assert!(mesh.is_consistent(), "{primitive}");
            assert_eq!(mesh.vertex_count(), v, "{primitive}");
            assert_eq!(mesh.edge_count(), e, "{primitive}");
            assert_eq!(mesh.triangle_count(), t, "{primitive}");
            assert_closed(&mesh);
            assert_outward(&mesh);
        }
    }

    #[test]
    fn test_circumradius() {
        for primitive in [Primitive::tetrahedron(2.0), Primitive::icosahedron(2.0)] {
            let mesh = primitive.to_mesh();
            for (_, vertex) in mesh.vertices() {
                assert_relative_eq!(vertex.position.coords.norm(), 2.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cube_extent() {
        let mesh = Primitive::cube(2.0).to_mesh();
        assert_eq!(mesh.scale(), 2.0);
        assert_eq!(mesh.center(), Point3::origin());
    }

    #[test]
    fn test_sphere_is_projected() {
        let mesh = Primitive::sphere(3.0, 2).to_mesh();
        assert_eq!(mesh.triangle_count(), 20 * 16);
        assert_closed(&mesh);
        assert_outward(&mesh);
        for (_, vertex) in mesh.vertices() {
            assert_relative_eq!(vertex.position.coords.norm(), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_grid_is_open_and_flat() {
        let mesh = Primitive::grid(2.0, 4).to_mesh();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        assert_eq!(mesh.edges().filter(|e| e.is_boundary()).count(), 16);
        for (_, triangle) in mesh.triangles() {
            assert_eq!(triangle.geometry.normal.z, 1.0);
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Cube".parse::<Primitive>(), Ok(Primitive::cube(1.0)));
        assert!("torus".parse::<Primitive>().is_err());
    }
}
