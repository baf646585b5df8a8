// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flat draw buffers for a renderer

use super::{TriangleMesh, VertexId};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// How normals are attached to the emitted vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    /// Shared vertices carrying the vertex normals
    #[default]
    Smooth,
    /// Three vertices per triangle carrying the face normal
    Flat,
}

/// Interleaving-free vertex, normal and index buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderArrays {
    /// xyz per emitted vertex
    pub positions: Vec<f32>,
    /// xyz per emitted vertex
    pub normals: Vec<f32>,
    /// Three per triangle
    pub indices: Vec<u32>,
    /// Two per mesh edge, into the same vertex buffer
    pub edge_indices: Vec<u32>,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl RenderArrays {
    pub fn from_mesh(mesh: &TriangleMesh, shading: Shading) -> Self {
        let mut arrays = Self::default();
        match shading {
            Shading::Smooth => arrays.fill_smooth(mesh),
            Shading::Flat => arrays.fill_flat(mesh),
        }
        arrays.calculate_bounds();
        arrays
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: &Point3<f64>, normal: &Vector3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions
            .extend_from_slice(&[position.x as f32, position.y as f32, position.z as f32]);
        self.normals
            .extend_from_slice(&[normal.x as f32, normal.y as f32, normal.z as f32]);
        index
    }

    fn fill_smooth(&mut self, mesh: &TriangleMesh) {
        let mut slots: AHashMap<VertexId, u32> = AHashMap::with_capacity(mesh.vertex_count());
        for (id, vertex) in mesh.vertices() {
            let slot = self.push_vertex(&vertex.position, &vertex.normal);
            slots.insert(id, slot);
        }

        for (_, triangle) in mesh.triangles() {
            let [a, b, c] = triangle.vertices;
            if let (Some(&a), Some(&b), Some(&c)) = (slots.get(&a), slots.get(&b), slots.get(&c)) {
                self.indices.extend_from_slice(&[a, b, c]);
            }
        }
        for edge in mesh.edges() {
            let [a, b] = edge.vertices();
            if let (Some(&a), Some(&b)) = (slots.get(&a), slots.get(&b)) {
                self.edge_indices.extend_from_slice(&[a, b]);
            }
        }
    }

    fn fill_flat(&mut self, mesh: &TriangleMesh) {
        for (_, triangle) in mesh.triangles() {
            let normal = triangle.geometry.normal;
            let mut corners = [0u32; 3];
            for (slot, &id) in corners.iter_mut().zip(&triangle.vertices) {
                let Some(vertex) = mesh.vertex(id) else {
                    continue;
                };
                *slot = self.push_vertex(&vertex.position, &normal);
            }
            self.indices.extend_from_slice(&corners);
            // Outline every triangle edge since nothing is shared
            let [a, b, c] = corners;
            self.edge_indices.extend_from_slice(&[a, b, b, c, c, a]);
        }
    }

    fn calculate_bounds(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for xyz in self.positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(xyz[axis]);
                max[axis] = max[axis].max(xyz[axis]);
            }
        }
        self.min = min;
        self.max = max;
    }
}
