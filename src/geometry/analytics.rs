// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics
//!
//! Both reports read the derived state, so call them on a rebuilt mesh.

use super::{is_triangle, Triangle, TriangleMesh, VertexId};
use serde::{Deserialize, Serialize};

/// Geometry statistics and analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume from signed tetrahedra
    pub volume: f64,
    /// Sum of triangle areas
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    /// Mean vertex position [x, y, z]
    pub centroid: [f64; 3],
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub edge_count: usize,
    pub min_edge_length: f64,
    pub max_edge_length: f64,
    pub mean_edge_length: f64,
    /// Edges with exactly one incident triangle
    pub boundary_edges: usize,
    /// Edges with more than two incident triangles
    pub non_manifold_edges: usize,
    /// Triangles that fail `is_triangle`
    pub degenerate_triangles: usize,
    /// V - E + T
    pub euler_characteristic: i64,
    /// Every edge shared by exactly two triangles
    pub is_watertight: bool,
}

impl GeometryStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            centroid: [0.0; 3],
            vertex_count: 0,
            triangle_count: 0,
            edge_count: 0,
            min_edge_length: 0.0,
            max_edge_length: 0.0,
            mean_edge_length: 0.0,
            boundary_edges: 0,
            non_manifold_edges: 0,
            degenerate_triangles: 0,
            euler_characteristic: 0,
            is_watertight: false,
        }
    }

    /// Pretty print statistics
    pub fn print(&self) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              MESH ANALYTICS                              ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║ Volume:          {:>12.4}                            ║", self.volume);
        println!("║ Surface Area:    {:>12.4}                            ║", self.surface_area);
        println!(
            "║ Centroid:        ({:>7.2}, {:>7.2}, {:>7.2})            ║",
            self.centroid[0], self.centroid[1], self.centroid[2]
        );
        println!("║                                                          ║");
        println!("║ Bounding Box:                                            ║");
        println!(
            "║   Min: ({:>7.2}, {:>7.2}, {:>7.2})                      ║",
            self.bbox[0], self.bbox[1], self.bbox[2]
        );
        println!(
            "║   Max: ({:>7.2}, {:>7.2}, {:>7.2})                      ║",
            self.bbox[3], self.bbox[4], self.bbox[5]
        );
        println!("║                                                          ║");
        println!("║ Vertices:        {:>10}                              ║", self.vertex_count);
        println!("║ Edges:           {:>10}                              ║", self.edge_count);
        println!("║ Triangles:       {:>10}                              ║", self.triangle_count);
        println!(
            "║ Euler char.:     {:>10}                              ║",
            self.euler_characteristic
        );
        println!(
            "║ Edge length:     {:>9.4} / {:>9.4} / {:>9.4}       ║",
            self.min_edge_length, self.mean_edge_length, self.max_edge_length
        );
        println!("║ Boundary edges:  {:>10}                              ║", self.boundary_edges);
        println!(
            "║ Non-manifold:    {:>10}                              ║",
            self.non_manifold_edges
        );
        println!(
            "║ Degenerate:      {:>10}                              ║",
            self.degenerate_triangles
        );
        println!(
            "║ Watertight:      {:>10}                              ║",
            if self.is_watertight { "Yes" } else { "No" }
        );
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &TriangleMesh) -> GeometryStats {
    let vertex_count = mesh.vertex_count();
    let triangle_count = mesh.triangle_count();

    if vertex_count == 0 || triangle_count == 0 {
        return GeometryStats {
            vertex_count,
            triangle_count,
            ..GeometryStats::empty()
        };
    }

    let bounds = mesh.bounding_box();
    let edge_count = mesh.edge_count();
    let (mut max_edge_length, mut total_length) = (0.0_f64, 0.0);
    let (mut boundary_edges, mut non_manifold_edges) = (0, 0);
    for edge in mesh.edges() {
        max_edge_length = max_edge_length.max(edge.length);
        total_length += edge.length;
        if edge.is_boundary() {
            boundary_edges += 1;
        }
        if !edge.is_manifold() {
            non_manifold_edges += 1;
        }
    }

    GeometryStats {
        volume: calculate_volume(mesh),
        surface_area: mesh.triangles().map(|(_, t)| t.geometry.area).sum(),
        bbox: [
            bounds.min.x,
            bounds.min.y,
            bounds.min.z,
            bounds.max.x,
            bounds.max.y,
            bounds.max.z,
        ],
        centroid: calculate_centroid(mesh),
        vertex_count,
        triangle_count,
        edge_count,
        min_edge_length: mesh.min_edge_length(),
        max_edge_length,
        mean_edge_length: if edge_count > 0 {
            total_length / edge_count as f64
        } else {
            0.0
        },
        boundary_edges,
        non_manifold_edges,
        degenerate_triangles: count_degenerate(mesh),
        euler_characteristic: vertex_count as i64 - edge_count as i64 + triangle_count as i64,
        is_watertight: edge_count > 0 && boundary_edges == 0 && non_manifold_edges == 0,
    }
}

/// Signed volume using the divergence theorem
fn calculate_volume(mesh: &TriangleMesh) -> f64 {
    let mut volume = 0.0;
    for (_, triangle) in mesh.triangles() {
        let [a, b, c] = triangle.vertices;
        if let (Ok(v0), Ok(v1), Ok(v2)) = (mesh.position(a), mesh.position(b), mesh.position(c)) {
            volume += v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0;
        }
    }
    volume.abs()
}

fn calculate_centroid(mesh: &TriangleMesh) -> [f64; 3] {
    let count = mesh.vertex_count() as f64;
    let sum = mesh
        .vertices()
        .fold(nalgebra::Vector3::zeros(), |acc, (_, v)| acc + v.position.coords);
    [sum.x / count, sum.y / count, sum.z / count]
}

/// Mesh validation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshValidation {
    /// No edge has more than two incident triangles
    pub is_manifold: bool,
    /// Every edge has exactly two incident triangles
    pub is_closed: bool,
    /// Every interior edge is traversed in opposite directions by its triangles
    pub has_consistent_winding: bool,
    pub edge_count: usize,
    pub boundary_edge_count: usize,
}

impl MeshValidation {
    pub fn is_valid(&self) -> bool {
        self.is_manifold && self.is_closed && self.has_consistent_winding
    }
}

/// Check that no edge has more than two incident triangles
pub fn is_manifold(mesh: &TriangleMesh) -> bool {
    mesh.edges().all(|e| e.is_manifold())
}

/// Check that every edge is shared by exactly two triangles
pub fn is_closed(mesh: &TriangleMesh) -> bool {
    mesh.edge_count() > 0 && mesh.edges().all(|e| e.incident_triangles.len() == 2)
}

fn traverses(triangle: &Triangle, from: VertexId, to: VertexId) -> bool {
    (0..3).any(|i| triangle.corner(i) == from && triangle.corner(i + 1) == to)
}

/// Check that neighbouring triangles agree on orientation
pub fn has_consistent_winding(mesh: &TriangleMesh) -> bool {
    mesh.edges()
        .filter(|e| e.incident_triangles.len() == 2)
        .all(|edge| {
            let [a, b] = edge.vertices();
            match (
                mesh.triangle(edge.incident_triangles[0]),
                mesh.triangle(edge.incident_triangles[1]),
            ) {
                (Some(first), Some(second)) => {
                    traverses(first, a, b) != traverses(second, a, b)
                }
                _ => false,
            }
        })
}

pub fn validate_mesh(mesh: &TriangleMesh) -> MeshValidation {
    MeshValidation {
        is_manifold: is_manifold(mesh),
        is_closed: is_closed(mesh),
        has_consistent_winding: has_consistent_winding(mesh),
        edge_count: mesh.edge_count(),
        boundary_edge_count: mesh.edges().filter(|e| e.is_boundary()).count(),
    }
}

/// Count triangles whose corners do not span a proper triangle
pub fn count_degenerate(mesh: &TriangleMesh) -> usize {
    mesh.triangles()
        .filter(|(_, t)| {
            let [a, b, c] = t.vertices;
            match (mesh.position(a), mesh.position(b), mesh.position(c)) {
                (Ok(p0), Ok(p1), Ok(p2)) => !is_triangle(&p0, &p1, &p2),
                _ => true,
            }
        })
        .count()
}
