// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle mesh with deferred consistency
//!
//! Mutations only touch the vertex and triangle stores. Everything else
//! (edges, 1-rings, incident triangles, per-face geometry, vertex areas and
//! normals, bounding data) is derived from scratch by [`TriangleMesh::rebuild`]
//! and is stale between a mutation and the next rebuild.

use super::events::{ListenerId, Listeners, MeshEvent};
use super::normals::NormalStrategy;
use super::triangle::is_triangle;
use super::{
    Arena, BoundingBox, Edge, EdgeKey, Triangle, TriangleGeometry, TriangleId, Vertex, VertexId,
};
use crate::error::{MeshError, MeshResult};
use ahash::AHashMap;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Caller-controlled parts of the rebuild
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildOptions {
    /// Run the vertex normal strategy at the end of every rebuild
    pub compute_normals: bool,
    pub normal_strategy: NormalStrategy,
    /// Log zero-area triangles found during rebuild
    pub warn_on_degenerate: bool,
}

impl Default for RebuildOptions {
    fn default() -> Self {
        Self {
            compute_normals: true,
            normal_strategy: NormalStrategy::default(),
            warn_on_degenerate: true,
        }
    }
}

/// Triangular mesh
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: Arena<Vertex>,
    triangles: Arena<Triangle>,
    edges: BTreeMap<EdgeKey, Edge>,
    bounds: BoundingBox,
    center: Point3<f64>,
    scale: f64,
    min_edge_length: f64,
    options: RebuildOptions,
    consistent: bool,
    listeners: Listeners,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::with_options(RebuildOptions::default())
    }

    pub fn with_options(options: RebuildOptions) -> Self {
        let bounds = BoundingBox::unit();
        Self {
            vertices: Arena::new(),
            triangles: Arena::new(),
            edges: BTreeMap::new(),
            bounds,
            center: bounds.center(),
            scale: bounds.max_extent(),
            min_edge_length: 0.0,
            options,
            consistent: true,
            listeners: Listeners::default(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        let mut mesh = Self::new();
        mesh.vertices = Arena::with_capacity(vertex_count);
        mesh.triangles = Arena::with_capacity(triangle_count);
        mesh
    }

    /// Build from dense positions and index triples, then rebuild
    pub fn from_indexed(positions: &[Point3<f64>], indices: &[[usize; 3]]) -> MeshResult<Self> {
        let mut mesh = Self::with_capacity(positions.len(), indices.len());
        let ids: Vec<VertexId> = positions.iter().map(|p| mesh.add_vertex(*p)).collect();
        let lookup = |index: usize| {
            ids.get(index).copied().ok_or(MeshError::DenseIndexOutOfRange {
                index,
                len: ids.len(),
            })
        };
        for &[a, b, c] in indices {
            mesh.add_triangle([lookup(a)?, lookup(b)?, lookup(c)?]);
        }
        mesh.rebuild()?;
        Ok(mesh)
    }

    /// Dense copy: live vertex positions in slot order and triangles indexing into them
    pub fn to_indexed(&self) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut dense: AHashMap<VertexId, usize> = AHashMap::with_capacity(self.vertices.len());
        let positions = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, (id, vertex))| {
                dense.insert(id, i);
                vertex.position
            })
            .collect();
        let indices = self
            .triangles
            .values()
            .filter_map(|t| {
                let [a, b, c] = t.vertices;
                Some([*dense.get(&a)?, *dense.get(&b)?, *dense.get(&c)?])
            })
            .collect();
        (positions, indices)
    }

    // ---------------------------------------------------------------------
    // Storage access
    // ---------------------------------------------------------------------

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn triangle(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.get(id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter()
    }

    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles.iter()
    }

    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.handles().collect()
    }

    pub fn triangle_ids(&self) -> Vec<TriangleId> {
        self.triangles.handles().collect()
    }

    pub fn position(&self, id: VertexId) -> MeshResult<Point3<f64>> {
        self.vertices
            .get(id)
            .map(|v| v.position)
            .ok_or_else(|| stale_vertex(id))
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Edge count as of the last rebuild
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    /// Whether derived state reflects the current storage
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    // ---------------------------------------------------------------------
    // Derived state (valid after rebuild)
    // ---------------------------------------------------------------------

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn edge(&self, a: VertexId, b: VertexId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Edges ordered by length, ties broken by vertex pair
    pub fn edges_by_length(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.values().collect();
        edges.sort_by(|x, y| {
            x.length
                .total_cmp(&y.length)
                .then_with(|| x.key().cmp(&y.key()))
        });
        edges
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Largest axis extent of the bounding box
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn min_edge_length(&self) -> f64 {
        self.min_edge_length
    }

    pub fn options(&self) -> RebuildOptions {
        self.options
    }

    pub fn set_options(&mut self, options: RebuildOptions) {
        self.options = options;
    }

    pub fn normal_strategy(&self) -> NormalStrategy {
        self.options.normal_strategy
    }

    pub fn set_normal_strategy(&mut self, strategy: NormalStrategy) {
        self.options.normal_strategy = strategy;
    }

    // ---------------------------------------------------------------------
    // Change notifications
    // ---------------------------------------------------------------------

    pub fn subscribe(&mut self, callback: impl FnMut(&MeshEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Add a vertex and return its handle
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        self.consistent = false;
        self.vertices.insert(Vertex::new(position))
    }

    /// Add a triangle; handles are checked by the next rebuild
    pub fn add_triangle(&mut self, vertices: [VertexId; 3]) -> TriangleId {
        self.consistent = false;
        self.triangles.insert(Triangle::new(vertices))
    }

    pub fn set_vertex_position(&mut self, id: VertexId, position: Point3<f64>) -> MeshResult<()> {
        let vertex = self.vertices.get_mut(id).ok_or_else(|| stale_vertex(id))?;
        vertex.position = position;
        self.consistent = false;
        Ok(())
    }

    pub fn move_vertex(&mut self, id: VertexId, delta: Vector3<f64>) -> MeshResult<()> {
        let position = self.position(id)?;
        self.set_vertex_position(id, position + delta)
    }

    pub fn remove_triangle(&mut self, id: TriangleId) -> MeshResult<Triangle> {
        let triangle = self
            .triangles
            .remove(id)
            .ok_or_else(|| MeshError::StaleHandle(format!("triangle {id}")))?;
        self.consistent = false;
        Ok(triangle)
    }

    /// Triangles (live, in slot order) that use `vertex` as a corner
    pub fn triangles_using(&self, vertex: VertexId) -> Vec<TriangleId> {
        self.triangles
            .iter()
            .filter(|(_, t)| t.contains(vertex))
            .map(|(id, _)| id)
            .collect()
    }

    /// Remove a vertex no triangle refers to any more
    pub fn remove_vertex(&mut self, id: VertexId) -> MeshResult<Vertex> {
        if !self.vertices.contains(id) {
            return Err(stale_vertex(id));
        }
        let in_use = self.triangles_using(id).len();
        if in_use > 0 {
            return Err(MeshError::VertexInUse {
                vertex: id,
                triangles: in_use,
            });
        }
        self.consistent = false;
        self.vertices.remove(id).ok_or_else(|| stale_vertex(id))
    }

    /// Remove a vertex together with every triangle using it
    ///
    /// Returns the vertex and the number of triangles removed.
    pub fn remove_vertex_and_triangles(&mut self, id: VertexId) -> MeshResult<(Vertex, usize)> {
        if !self.vertices.contains(id) {
            return Err(stale_vertex(id));
        }
        let incident = self.triangles_using(id);
        for &tid in &incident {
            self.triangles.remove(tid);
        }
        let vertex = self.remove_vertex(id)?;
        Ok((vertex, incident.len()))
    }

    /// Redirect every use of `remove` to `keep`, then drop `remove`
    ///
    /// Triangles that end up with a repeated corner are removed; their count is
    /// returned.
    pub fn merge_vertices(&mut self, keep: VertexId, remove: VertexId) -> MeshResult<usize> {
        if !self.vertices.contains(keep) {
            return Err(stale_vertex(keep));
        }
        if !self.vertices.contains(remove) {
            return Err(stale_vertex(remove));
        }
        if keep == remove {
            return Ok(0);
        }

        let mut collapsed = Vec::new();
        for (tid, triangle) in self.triangles.iter_mut() {
            if !triangle.contains(remove) {
                continue;
            }
            for corner in &mut triangle.vertices {
                if *corner == remove {
                    *corner = keep;
                }
            }
            if triangle.has_repeated_vertex() {
                collapsed.push(tid);
            }
        }
        for &tid in &collapsed {
            self.triangles.remove(tid);
        }
        self.vertices.remove(remove);
        self.consistent = false;
        Ok(collapsed.len())
    }

    /// Weld vertices that lie within `epsilon` of an earlier vertex
    ///
    /// Returns the number of vertices removed.
    pub fn weld_vertices(&mut self, epsilon: f64) -> MeshResult<usize> {
        if self.vertices.is_empty() || !(epsilon > 0.0) {
            return Ok(0);
        }

        let cell = |p: &Point3<f64>| -> [i64; 3] {
            [
                (p.x / epsilon).floor() as i64,
                (p.y / epsilon).floor() as i64,
                (p.z / epsilon).floor() as i64,
            ]
        };

        let mut grid: AHashMap<[i64; 3], Vec<(VertexId, Point3<f64>)>> = AHashMap::new();
        let mut merges = Vec::new();
        for (id, vertex) in self.vertices.iter() {
            let p = vertex.position;
            let [cx, cy, cz] = cell(&p);
            let mut target = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        if let Some(bucket) = grid.get(&[cx + dx, cy + dy, cz + dz]) {
                            if let Some((keep, _)) =
                                bucket.iter().find(|(_, q)| (p - q).norm() < epsilon)
                            {
                                target = Some(*keep);
                                break 'search;
                            }
                        }
                    }
                }
            }
            match target {
                Some(keep) => merges.push((keep, id)),
                None => grid.entry([cx, cy, cz]).or_default().push((id, p)),
            }
        }

        for &(keep, remove) in &merges {
            self.merge_vertices(keep, remove)?;
        }
        Ok(merges.len())
    }

    /// Remove vertices not referenced by any triangle
    pub fn remove_orphaned_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.handles().map(|h| h.index() + 1).max().unwrap_or(0)];
        for triangle in self.triangles.values() {
            for v in triangle.vertices {
                if let Some(flag) = used.get_mut(v.index()) {
                    *flag = true;
                }
            }
        }
        let orphans: Vec<VertexId> = self
            .vertices
            .handles()
            .filter(|id| !used[id.index()])
            .collect();
        for &id in &orphans {
            self.vertices.remove(id);
        }
        if !orphans.is_empty() {
            self.consistent = false;
        }
        orphans.len()
    }

    /// Remove triangles that repeat a corner or fail [`is_triangle`]
    pub fn remove_degenerate_triangles(&mut self) -> usize {
        let degenerate: Vec<TriangleId> = self
            .triangles
            .iter()
            .filter(|(_, t)| {
                t.has_repeated_vertex() || !matches!(self.triangle_is_proper(t), Ok(true))
            })
            .map(|(id, _)| id)
            .collect();
        for &id in &degenerate {
            self.triangles.remove(id);
        }
        if !degenerate.is_empty() {
            self.consistent = false;
        }
        degenerate.len()
    }

    /// Append another mesh's live vertices and triangles
    pub fn merge(&mut self, other: &TriangleMesh) {
        let mut remap: AHashMap<VertexId, VertexId> = AHashMap::with_capacity(other.vertex_count());
        for (id, vertex) in other.vertices() {
            remap.insert(id, self.add_vertex(vertex.position));
        }
        for (_, triangle) in other.triangles() {
            let [a, b, c] = triangle.vertices;
            if let (Some(&a), Some(&b), Some(&c)) = (remap.get(&a), remap.get(&b), remap.get(&c)) {
                self.add_triangle([a, b, c]);
            }
        }
    }

    /// Transform all vertex positions by a matrix
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for (_, vertex) in self.vertices.iter_mut() {
            vertex.position = matrix.transform_point(&vertex.position);
        }
        self.consistent = false;
    }

    pub fn translate(&mut self, delta: Vector3<f64>) {
        self.transform(&Matrix4::new_translation(&delta));
    }

    /// Scale uniformly about the origin
    pub fn scale_uniform(&mut self, factor: f64) {
        self.transform(&Matrix4::new_scaling(factor));
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Whether three vertices span a proper triangle
    pub fn is_triangle(&self, vertices: [VertexId; 3]) -> MeshResult<bool> {
        let [a, b, c] = vertices;
        Ok(is_triangle(
            &self.position(a)?,
            &self.position(b)?,
            &self.position(c)?,
        ))
    }

    /// Whether a stored triangle is proper
    pub fn is_triangle_at(&self, id: TriangleId) -> MeshResult<bool> {
        let triangle = self
            .triangles
            .get(id)
            .ok_or_else(|| MeshError::StaleHandle(format!("triangle {id}")))?;
        self.triangle_is_proper(triangle)
    }

    fn triangle_is_proper(&self, triangle: &Triangle) -> MeshResult<bool> {
        self.is_triangle(triangle.vertices)
    }

    // ---------------------------------------------------------------------
    // Flipping
    // ---------------------------------------------------------------------

    /// Reverse one triangle's winding and rebuild
    pub fn flip_triangle(&mut self, id: TriangleId) -> MeshResult<Vec<MeshEvent>> {
        let triangle = self
            .triangles
            .get_mut(id)
            .ok_or_else(|| MeshError::StaleHandle(format!("triangle {id}")))?;
        triangle.flip();
        self.consistent = false;
        self.rebuild()
    }

    /// Reverse every triangle's winding and rebuild once
    pub fn flip_all_triangles(&mut self) -> MeshResult<Vec<MeshEvent>> {
        for (_, triangle) in self.triangles.iter_mut() {
            triangle.flip();
        }
        self.consistent = false;
        self.rebuild()
    }

    // ---------------------------------------------------------------------
    // Consistency rebuild
    // ---------------------------------------------------------------------

    /// Alias for [`TriangleMesh::rebuild`]
    pub fn finish(&mut self) -> MeshResult<Vec<MeshEvent>> {
        self.rebuild()
    }

    /// Derive all topology and geometry from the current vertices and triangles
    ///
    /// Fails with [`MeshError::IndexOutOfRange`] when a triangle references a
    /// vertex that is not live; derived state is left untouched in that case.
    /// Returns the change notifications that were sent to listeners.
    pub fn rebuild(&mut self) -> MeshResult<Vec<MeshEvent>> {
        let started = Instant::now();
        self.check_handles()?;

        for (_, vertex) in self.vertices.iter_mut() {
            vertex.clear_derived();
        }
        self.edges.clear();

        let mut degenerate = 0usize;
        for (tid, triangle) in self.triangles.iter_mut() {
            let corners = triangle.vertices;
            let mut positions = [Point3::origin(); 3];
            for (position, &id) in positions.iter_mut().zip(&corners) {
                *position = self
                    .vertices
                    .get(id)
                    .map(|v| v.position)
                    .ok_or(MeshError::IndexOutOfRange {
                        triangle: tid,
                        vertex: id,
                    })?;
            }
            let geometry = TriangleGeometry::compute([&positions[0], &positions[1], &positions[2]]);
            if geometry.area == 0.0 {
                degenerate += 1;
            }

            for i in 0..3 {
                let id = corners[i];
                let next = corners[(i + 1) % 3];
                if let Some(vertex) = self.vertices.get_mut(id) {
                    vertex.incident_triangles.insert(tid);
                    vertex.area += geometry.corner_areas[i];
                    for &other in &[next, corners[(i + 2) % 3]] {
                        if other != id {
                            vertex.neighbors.insert(other);
                        }
                    }
                }

                let key = EdgeKey::new(id, next);
                if key.is_loop() {
                    continue;
                }
                self.edges
                    .entry(key)
                    .or_insert_with(|| Edge::new(id, next, geometry.edge_lengths[i]))
                    .incident_triangles
                    .push(tid);
            }

            triangle.geometry = geometry;
        }

        let bounds = if self.vertices.is_empty() {
            BoundingBox::unit()
        } else {
            BoundingBox::from_points(self.vertices.values().map(|v| &v.position))
        };
        let scale = bounds.max_extent();
        let min_edge_length = self
            .edges
            .values()
            .map(|e| e.length)
            .reduce(f64::min)
            .unwrap_or(0.0);

        let mut events = Vec::new();
        if scale != self.scale {
            events.push(MeshEvent::ScaleChanged {
                previous: self.scale,
                current: scale,
            });
        }
        if min_edge_length != self.min_edge_length {
            events.push(MeshEvent::MinEdgeLengthChanged {
                previous: self.min_edge_length,
                current: min_edge_length,
            });
        }

        self.bounds = bounds;
        self.center = bounds.center();
        self.scale = scale;
        self.min_edge_length = min_edge_length;

        if self.options.compute_normals {
            self.apply_vertex_normals();
        }
        self.consistent = true;

        let non_manifold = self.edges.values().filter(|e| !e.is_manifold()).count();
        if non_manifold > 0 {
            warn!(non_manifold, "mesh has edges shared by more than two triangles");
        }
        if degenerate > 0 && self.options.warn_on_degenerate {
            warn!(degenerate, "mesh has zero-area triangles");
        }
        debug!(
            vertices = self.vertices.len(),
            triangles = self.triangles.len(),
            edges = self.edges.len(),
            scale,
            min_edge_length,
            elapsed_us = started.elapsed().as_micros() as u64,
            "mesh rebuilt"
        );

        for event in &events {
            self.listeners.notify(event);
        }
        Ok(events)
    }

    /// Fail with [`MeshError::IndexOutOfRange`] on the first triangle that
    /// references a vertex which is not live
    pub(crate) fn check_handles(&self) -> MeshResult<()> {
        for (tid, triangle) in self.triangles.iter() {
            if let Some(&vertex) = triangle.vertices.iter().find(|&&v| !self.vertices.contains(v)) {
                return Err(MeshError::IndexOutOfRange {
                    triangle: tid,
                    vertex,
                });
            }
        }
        Ok(())
    }

    /// Rerun the active normal strategy without touching other derived state
    pub fn recompute_vertex_normals(&mut self) {
        self.apply_vertex_normals();
    }

    fn apply_vertex_normals(&mut self) {
        let normals = self.options.normal_strategy.compute(self);
        for (id, normal) in normals {
            if let Some(vertex) = self.vertices.get_mut(id) {
                vertex.normal = normal;
            }
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

fn stale_vertex(id: VertexId) -> MeshError {
    MeshError::StaleHandle(format!("vertex {id}"))
}
