// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle record and per-face geometry

use super::vector::{face_normal, unit_x};
use super::{BoundingBox, EdgeKey, VertexId};
use crate::utils::math::heron_area;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Angular distance from 0 or π below which two spanning edges count as collinear
pub const COLLINEAR_ANGLE_THRESHOLD: f64 = PI / 360.0;

/// Triangle defined by three vertex handles; the order fixes the winding
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [VertexId; 3],
    /// Cached geometry, valid after the last successful rebuild
    pub geometry: TriangleGeometry,
}

impl Triangle {
    pub fn new(vertices: [VertexId; 3]) -> Self {
        Self {
            vertices,
            geometry: TriangleGeometry::default(),
        }
    }

    pub fn corner(&self, i: usize) -> VertexId {
        self.vertices[i % 3]
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Corner slot (0..3) occupied by `vertex`
    pub fn corner_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Edge `i` runs from corner `i` to corner `i + 1`
    pub fn edge_keys(&self) -> [EdgeKey; 3] {
        let [v0, v1, v2] = self.vertices;
        [EdgeKey::new(v0, v1), EdgeKey::new(v1, v2), EdgeKey::new(v2, v0)]
    }

    /// Reverse the winding, keeping corner 0 in place
    pub fn flip(&mut self) {
        self.vertices.swap(1, 2);
    }

    /// Two corners share a vertex
    pub fn has_repeated_vertex(&self) -> bool {
        let [v0, v1, v2] = self.vertices;
        v0 == v1 || v1 == v2 || v2 == v0
    }
}

/// Geometry derived from the three corner positions
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGeometry {
    pub centroid: Point3<f64>,
    /// Unit face normal following the winding
    pub normal: Vector3<f64>,
    /// Area from Heron's formula
    pub area: f64,
    /// Voronoi-style share of `area` attributed to each corner
    pub corner_areas: [f64; 3],
    /// Interior angle at each corner, in radians
    pub angles: [f64; 3],
    /// `edge_lengths[i]` spans corner `i` to corner `i + 1`
    pub edge_lengths: [f64; 3],
    pub bounds: BoundingBox,
}

impl Default for TriangleGeometry {
    fn default() -> Self {
        Self {
            centroid: Point3::origin(),
            normal: unit_x(),
            area: 0.0,
            corner_areas: [0.0; 3],
            angles: [0.0; 3],
            edge_lengths: [0.0; 3],
            bounds: BoundingBox::empty(),
        }
    }
}

impl TriangleGeometry {
    pub fn compute(p: [&Point3<f64>; 3]) -> Self {
        let edge_lengths = [
            (p[1] - p[0]).norm(),
            (p[2] - p[1]).norm(),
            (p[0] - p[2]).norm(),
        ];
        let area = heron_area(edge_lengths[0], edge_lengths[1], edge_lengths[2]);

        let angles = [0, 1, 2].map(|i| {
            let u = p[(i + 1) % 3] - p[i];
            let v = p[(i + 2) % 3] - p[i];
            u.angle(&v)
        });

        Self {
            centroid: Point3::from((p[0].coords + p[1].coords + p[2].coords) / 3.0),
            normal: face_normal(p[0], p[1], p[2]),
            area,
            corner_areas: corner_areas(p, area),
            angles,
            edge_lengths,
            bounds: BoundingBox::from_points(p),
        }
    }

    /// Lengths of the two edges meeting at `corner`
    pub fn adjacent_edge_lengths(&self, corner: usize) -> (f64, f64) {
        let corner = corner % 3;
        (self.edge_lengths[corner], self.edge_lengths[(corner + 2) % 3])
    }
}

/// Split `area` between the three corners.
///
/// Acute triangles use the circumcentre (Voronoi) partition. When a corner
/// is right or obtuse its two neighbours keep only the part of their Voronoi
/// cell inside the triangle, which is proportional to the squared edge
/// towards that corner, and the corner itself takes the rest.
fn corner_areas(p: [&Point3<f64>; 3], area: f64) -> [f64; 3] {
    if !(area > 0.0) {
        return [0.0; 3];
    }

    // Squared length of the edge opposite each corner
    let sq = [0, 1, 2].map(|i| (p[(i + 2) % 3] - p[(i + 1) % 3]).norm_squared());
    let weights = [0, 1, 2].map(|i| sq[i] * (sq[(i + 1) % 3] + sq[(i + 2) % 3] - sq[i]));

    match weights.iter().position(|&w| w <= 0.0) {
        None => {
            let total: f64 = weights.iter().sum();
            let lambda = weights.map(|w| w / total);
            let a0 = area * (lambda[1] + lambda[2]) / 2.0;
            let a1 = area * (lambda[2] + lambda[0]) / 2.0;
            [a0, a1, area - a0 - a1]
        }
        Some(k) => {
            let i = (k + 1) % 3;
            let j = (k + 2) % 3;
            // |ik|² is opposite j, |jk|² is opposite i
            let share = |towards_k: f64, other: f64, opposite: f64| {
                let twice_dot = towards_k + other - opposite;
                if twice_dot > 0.0 {
                    area * towards_k / (2.0 * twice_dot)
                } else {
                    0.0
                }
            };
            let mut result = [0.0; 3];
            result[i] = share(sq[j], sq[k], sq[i]);
            result[j] = share(sq[i], sq[k], sq[j]);
            result[k] = area - result[i] - result[j];
            result
        }
    }
}

/// Whether three points span a proper (non-degenerate, non-collinear) triangle
pub fn is_triangle(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> bool {
    let u = p1 - p0;
    let v = p2 - p0;
    if u.norm() == 0.0 || v.norm() == 0.0 {
        return false;
    }
    let angle = u.angle(&v);
    angle > COLLINEAR_ANGLE_THRESHOLD && angle < PI - COLLINEAR_ANGLE_THRESHOLD
}
