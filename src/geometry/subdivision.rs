// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 1-to-4 midpoint subdivision

use super::events::MeshEvent;
use super::vector::midpoint;
use super::{TriangleId, TriangleMesh, VertexId};
use crate::error::{MeshError, MeshResult};
use ahash::AHashMap;
use nalgebra::Point3;
use tracing::info;

/// Bit pattern of a position with `-0.0` folded into `0.0`
type PositionKey = [u64; 3];

fn position_key(p: &Point3<f64>) -> PositionKey {
    [p.x, p.y, p.z].map(|c| (c + 0.0).to_bits())
}

/// Children of `[v0, v1, v2]` given the midpoints of edges 01, 12 and 20
fn children(corners: [VertexId; 3], m01: VertexId, m12: VertexId, m20: VertexId) -> [[VertexId; 3]; 4] {
    let [v0, v1, v2] = corners;
    [[v0, m01, m20], [m01, v1, m12], [m20, m12, v2], [m01, m12, m20]]
}

impl TriangleMesh {
    fn corner_positions(&self, id: TriangleId) -> MeshResult<([VertexId; 3], [Point3<f64>; 3])> {
        let triangle = self
            .triangle(id)
            .ok_or_else(|| MeshError::StaleHandle(format!("triangle {id}")))?;
        let corners = triangle.vertices;
        let mut positions = [Point3::origin(); 3];
        for (position, &vertex) in positions.iter_mut().zip(&corners) {
            *position = self
                .vertex(vertex)
                .map(|v| v.position)
                .ok_or(MeshError::IndexOutOfRange {
                    triangle: id,
                    vertex,
                })?;
        }
        Ok((corners, positions))
    }

    /// Split one triangle into four and rebuild
    ///
    /// Midpoints reuse a vertex already sitting at that exact position, so
    /// splitting both triangles of a shared edge yields a single midpoint.
    pub fn subdivide_triangle(&mut self, id: TriangleId) -> MeshResult<[TriangleId; 4]> {
        let (corners, p) = self.corner_positions(id)?;
        self.check_handles()?;

        let vertex_at = |mesh: &mut Self, position: Point3<f64>| -> VertexId {
            let existing = mesh
                .vertices()
                .find(|(_, v)| v.position == position)
                .map(|(vid, _)| vid);
            existing.unwrap_or_else(|| mesh.add_vertex(position))
        };
        let m01 = vertex_at(self, midpoint(&p[0], &p[1]));
        let m12 = vertex_at(self, midpoint(&p[1], &p[2]));
        let m20 = vertex_at(self, midpoint(&p[2], &p[0]));

        self.remove_triangle(id)?;
        let added = children(corners, m01, m12, m20).map(|child| self.add_triangle(child));
        self.rebuild()?;
        Ok(added)
    }

    /// Subdivide every triangle `steps` times, rebuilding once at the end
    ///
    /// On a closed manifold each step maps `V, E, T` to `V + E, 2E + 3T, 4T`.
    pub fn subdivide(&mut self, steps: u32) -> MeshResult<Vec<MeshEvent>> {
        // Storage is left untouched when any triangle is dangling
        self.check_handles()?;
        for step in 1..=steps {
            let mut cache: AHashMap<PositionKey, VertexId> = AHashMap::new();
            let ids = self.triangle_ids();

            for &id in &ids {
                let (corners, p) = self.corner_positions(id)?;
                let mut split = |a: usize, b: usize, mesh: &mut Self| {
                    let m = midpoint(&p[a], &p[b]);
                    *cache
                        .entry(position_key(&m))
                        .or_insert_with(|| mesh.add_vertex(m))
                };
                let m01 = split(0, 1, self);
                let m12 = split(1, 2, self);
                let m20 = split(2, 0, self);

                self.remove_triangle(id)?;
                for child in children(corners, m01, m12, m20) {
                    self.add_triangle(child);
                }
            }

            info!(
                step,
                steps,
                vertices = self.vertex_count(),
                triangles = self.triangle_count(),
                "subdivision step complete"
            );
        }
        self.rebuild()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    #[test]
    fn test_position_key_folds_negative_zero() {
        assert_eq!(
            position_key(&Point3::new(-0.0, 1.0, 0.0)),
            position_key(&Point3::new(0.0, 1.0, -0.0))
        );
        assert_ne!(
            position_key(&Point3::new(1.0, 0.0, 0.0)),
            position_key(&Point3::new(0.0, 1.0, 0.0))
        );
    }

    #[test]
    fn test_dangling_triangle_leaves_storage_untouched() {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let gone = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.remove_vertex(gone).unwrap();
        let good = mesh.add_triangle([a, b, c]);
        mesh.add_triangle([b, gone, c]);
        let before = mesh.to_indexed();

        assert!(matches!(
            mesh.subdivide(1),
            Err(MeshError::IndexOutOfRange { vertex, .. }) if vertex == gone
        ));
        assert!(matches!(
            mesh.subdivide_triangle(good),
            Err(MeshError::IndexOutOfRange { .. })
        ));
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.triangle(good).is_some());
        assert_eq!(mesh.to_indexed(), before);
    }

    #[test]
    fn test_subdivide_single_triangle() {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 2.0, 0.0));
        let t = mesh.add_triangle([a, b, c]);
        mesh.rebuild().unwrap();

        let children = mesh.subdivide_triangle(t).unwrap();
        assert!(mesh.triangle(t).is_none());
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.is_consistent());
        assert_eq!(mesh.min_edge_length(), 1.0);

        let total: f64 = children
            .iter()
            .map(|&id| mesh.triangle(id).unwrap().geometry.area)
            .sum();
        assert_relative_eq!(total, 2.0, epsilon = 1e-12);
        // Children keep the parent's orientation
        for id in children {
            assert_eq!(mesh.triangle(id).unwrap().geometry.normal.z, 1.0);
        }
    }

    #[test]
    fn test_adjacent_single_splits_share_midpoint() {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let t0 = mesh.add_triangle([a, b, c]);
        let t1 = mesh.add_triangle([a, c, d]);

        mesh.subdivide_triangle(t0).unwrap();
        mesh.subdivide_triangle(t1).unwrap();
        // Two triangles, 5 distinct edge midpoints with the diagonal shared
        assert_eq!(mesh.vertex_count(), 4 + 5);
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn test_subdivide_closed_mesh_counts() {
        let mut mesh = Primitive::octahedron(1.0).to_mesh();
        let (v, e, t) = (mesh.vertex_count(), mesh.edge_count(), mesh.triangle_count());

        mesh.subdivide(1).unwrap();
        assert_eq!(mesh.triangle_count(), 4 * t);
        assert_eq!(mesh.vertex_count(), v + e);
        assert_eq!(mesh.edge_count(), 2 * e + 3 * t);
        assert!(mesh.edges().all(|edge| edge.incident_triangles.len() == 2));
    }

    #[test]
    fn test_subdivide_zero_steps_only_rebuilds() {
        let mut mesh = Primitive::tetrahedron(1.0).to_mesh();
        mesh.subdivide(0).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.is_consistent());
    }
}
