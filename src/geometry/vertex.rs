// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex record

use super::{TriangleId, VertexId};
use nalgebra::{Point3, Vector3};
use std::collections::BTreeSet;

/// Vertex with position and the neighbourhood data derived by rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
    /// Unit normal from the active normal strategy
    pub normal: Vector3<f64>,
    /// Sum of this vertex's corner areas over all incident triangles
    pub area: f64,
    pub incident_triangles: BTreeSet<TriangleId>,
    /// The 1-ring
    pub neighbors: BTreeSet<VertexId>,
}

impl Vertex {
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::new(1.0, 0.0, 0.0),
            area: 0.0,
            incident_triangles: BTreeSet::new(),
            neighbors: BTreeSet::new(),
        }
    }

    /// Number of incident triangles
    pub fn valence(&self) -> usize {
        self.incident_triangles.len()
    }

    pub fn is_isolated(&self) -> bool {
        self.incident_triangles.is_empty()
    }

    pub(crate) fn clear_derived(&mut self) {
        self.area = 0.0;
        self.incident_triangles.clear();
        self.neighbors.clear();
    }
}
